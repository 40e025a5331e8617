//! Header selection for the origin fetch.
//!
//! The origin fetch must carry exactly the caller headers that (a) were
//! signed into the pre-signed URL, or (b) are conditional headers that
//! drive caching semantics. Everything else is dropped: `Host` is
//! endpoint-specific and recomputed by the transport, and `Range` is
//! applied after transformation, never at the origin.

use std::collections::HashMap;

use http::HeaderMap;
use http::header::{HeaderName, HeaderValue};
use tracing::debug;

use crate::event::query_param;

/// Query parameter on the pre-signed URL listing the signed header names.
pub const SIGNED_HEADERS_PARAM: &str = "X-Amz-SignedHeaders";

/// Conditional headers forwarded to the origin even when unsigned.
const CONDITIONAL_HEADERS: [&str; 4] = [
    "if-match",
    "if-modified-since",
    "if-none-match",
    "if-unmodified-since",
];

/// Extract the signed header names from a pre-signed URL.
///
/// The `X-Amz-SignedHeaders` query parameter is a semicolon-delimited
/// list; each entry is returned lower-cased. Returns an empty vector if
/// the parameter is absent.
///
/// # Examples
///
/// ```
/// use objectlambda_core::headers::signed_headers_from_url;
///
/// let url = "https://origin/obj?X-Amz-SignedHeaders=Host;x-amz-date";
/// assert_eq!(signed_headers_from_url(url), vec!["host", "x-amz-date"]);
/// ```
#[must_use]
pub fn signed_headers_from_url(url: &str) -> Vec<String> {
    query_param(url, SIGNED_HEADERS_PARAM)
        .map(|list| {
            list.split(';')
                .filter(|s| !s.is_empty())
                .map(str::to_ascii_lowercase)
                .collect()
        })
        .unwrap_or_default()
}

/// Build the header set that accompanies the origin fetch.
///
/// Includes every caller header whose lower-cased name is in the signed
/// set of `presigned_url`, plus the four conditional headers; the `Host`
/// header is always excluded regardless of signing. Headers that fail
/// HTTP name/value validation are skipped (the validator rejects them
/// earlier in the pipeline).
#[must_use]
pub fn build_forwarded_headers(
    user_headers: &HashMap<String, String>,
    presigned_url: &str,
) -> HeaderMap {
    let signed_headers = signed_headers_from_url(presigned_url);

    let mut headers = HeaderMap::new();
    for (name, value) in user_headers {
        let lower = name.to_ascii_lowercase();
        if lower == "host" {
            continue;
        }
        let signed = signed_headers.iter().any(|s| s == &lower);
        let conditional = CONDITIONAL_HEADERS.contains(&lower.as_str());
        if !signed && !conditional {
            continue;
        }
        if let (Ok(header_name), Ok(header_value)) = (
            HeaderName::from_bytes(lower.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(header_name, header_value);
        }
    }

    debug!(
        forwarded = headers.len(),
        signed = signed_headers.len(),
        "built forwarded header set"
    );

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_should_parse_signed_headers_lower_cased() {
        let url = "https://origin/obj?X-Amz-SignedHeaders=Host;X-Amz-Date;x-amz-content-sha256";
        assert_eq!(
            signed_headers_from_url(url),
            vec!["host", "x-amz-date", "x-amz-content-sha256"],
        );
    }

    #[test]
    fn test_should_return_empty_signed_headers_when_param_absent() {
        assert!(signed_headers_from_url("https://origin/obj").is_empty());
        assert!(signed_headers_from_url("https://origin/obj?versionId=1").is_empty());
    }

    #[test]
    fn test_should_forward_signed_headers() {
        let user = header_map(&[("x-amz-date", "20260830T000000Z"), ("x-custom", "v")]);
        let headers = build_forwarded_headers(
            &user,
            "https://origin/obj?X-Amz-SignedHeaders=x-amz-date",
        );
        assert_eq!(headers.get("x-amz-date").map(|v| v.to_str().ok()), Some(Some("20260830T000000Z")));
        assert!(!headers.contains_key("x-custom"));
    }

    #[test]
    fn test_should_forward_conditional_headers_even_when_unsigned() {
        let user = header_map(&[("If-None-Match", "\"abc\"")]);
        let headers = build_forwarded_headers(&user, "https://origin/obj");
        assert!(headers.contains_key("if-none-match"));
    }

    #[test]
    fn test_should_never_forward_host_even_when_signed() {
        let user = header_map(&[("Host", "accesspoint.example.com")]);
        let headers = build_forwarded_headers(
            &user,
            "https://origin/obj?X-Amz-SignedHeaders=host",
        );
        assert!(!headers.contains_key("host"));
        assert!(headers.is_empty());
    }

    #[test]
    fn test_should_drop_range_header() {
        // Range is applied after transformation, never sent to the origin.
        let user = header_map(&[("Range", "bytes=0-4"), ("If-Match", "*")]);
        let headers = build_forwarded_headers(&user, "https://origin/obj");
        assert!(!headers.contains_key("range"));
        assert!(headers.contains_key("if-match"));
    }

    #[test]
    fn test_should_match_signed_headers_case_insensitively() {
        let user = header_map(&[("X-Amz-Security-Token", "tok")]);
        let headers = build_forwarded_headers(
            &user,
            "https://origin/obj?X-Amz-SignedHeaders=x-amz-security-token",
        );
        assert!(headers.contains_key("x-amz-security-token"));
    }
}
