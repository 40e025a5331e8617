//! Validation for inbound GetObject requests.
//!
//! Structural checks only; everything here runs before any origin I/O so
//! a malformed request never costs a network round trip.

use http::Uri;
use http::header::{HeaderName, HeaderValue};

use crate::error::{GetObjectError, GetObjectResult};
use crate::event::UserRequest;

/// Validate the structural well-formedness of a caller request.
///
/// Checks that the request URL parses as an absolute URI (scheme and
/// authority present) and that every header name/value pair is a legal
/// HTTP header.
///
/// # Errors
///
/// Returns [`GetObjectError::Validation`] naming the offending field.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use objectlambda_core::event::UserRequest;
/// use objectlambda_core::validator::validate_user_request;
///
/// let request = UserRequest {
///     url: "https://accesspoint.example.com/obj".to_owned(),
///     headers: HashMap::new(),
/// };
/// assert!(validate_user_request(&request).is_ok());
/// ```
pub fn validate_user_request(request: &UserRequest) -> GetObjectResult<()> {
    let uri: Uri = request.url.parse().map_err(|_| GetObjectError::Validation {
        message: format!("request URL is not a valid URI: {}", request.url),
    })?;

    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(GetObjectError::Validation {
            message: format!("request URL must be absolute: {}", request.url),
        });
    }

    for (name, value) in &request.headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            return Err(GetObjectError::Validation {
                message: format!("invalid header name: {name}"),
            });
        }
        if HeaderValue::from_str(value).is_err() {
            return Err(GetObjectError::Validation {
                message: format!("invalid value for header {name}"),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn request(url: &str, headers: &[(&str, &str)]) -> UserRequest {
        UserRequest {
            url: url.to_owned(),
            headers: headers
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        }
    }

    #[test]
    fn test_should_accept_well_formed_request() {
        let req = request(
            "https://accesspoint.example.com/obj?partNumber=2",
            &[("Range", "bytes=0-4"), ("If-None-Match", "\"abc\"")],
        );
        assert!(validate_user_request(&req).is_ok());
    }

    #[test]
    fn test_should_reject_unparseable_url() {
        let req = request("http://[broken", &[]);
        let err = validate_user_request(&req).expect_err("test expect error");
        assert!(err.to_string().contains("not a valid URI"));
    }

    #[test]
    fn test_should_reject_relative_url() {
        let req = request("/obj-without-authority", &[]);
        let err = validate_user_request(&req).expect_err("test expect error");
        assert!(err.to_string().contains("must be absolute"));
    }

    #[test]
    fn test_should_reject_invalid_header_name() {
        let req = request("https://x.example.com/y", &[("bad header", "v")]);
        let err = validate_user_request(&req).expect_err("test expect error");
        assert!(err.to_string().contains("invalid header name"));
    }

    #[test]
    fn test_should_reject_invalid_header_value() {
        let req = request("https://x.example.com/y", &[("x-ok", "line\nbreak")]);
        let err = validate_user_request(&req).expect_err("test expect error");
        assert!(err.to_string().contains("invalid value for header"));
    }

    #[test]
    fn test_should_accept_empty_header_map() {
        let req = UserRequest {
            url: "https://x.example.com/y".to_owned(),
            headers: HashMap::new(),
        };
        assert!(validate_user_request(&req).is_ok());
    }
}
