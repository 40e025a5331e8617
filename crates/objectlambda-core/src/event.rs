//! Gateway event model.
//!
//! Serde types for the JSON invocation event delivered by the storage
//! gateway. All entities here are created fresh per request and discarded
//! once the response has been written; nothing is shared across
//! invocations.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The invocation event for a GetObject request.
///
/// # Examples
///
/// ```
/// use objectlambda_core::event::GetObjectEvent;
///
/// let json = r#"{
///     "getObjectContext": {
///         "inputS3Url": "https://origin/obj?X-Amz-SignedHeaders=host",
///         "outputRoute": "route-1",
///         "outputToken": "token-1"
///     },
///     "userRequest": {
///         "url": "https://accesspoint/obj",
///         "headers": { "Range": "bytes=0-4" }
///     }
/// }"#;
/// let event: GetObjectEvent = serde_json::from_str(json).unwrap();
/// assert_eq!(event.get_object_context.output_route, "route-1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetObjectEvent {
    /// Pre-signed origin URL and response routing tokens.
    pub get_object_context: GetObjectContext,
    /// The caller's original request as seen by the gateway.
    pub user_request: UserRequest,
}

/// Routing context for a single GetObject invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetObjectContext {
    /// Pre-signed URL for fetching the original object from the backing
    /// store.
    #[serde(rename = "inputS3Url")]
    pub input_s3_url: String,
    /// Route token identifying where the response must be delivered.
    pub output_route: String,
    /// One-time token authorizing the response delivery.
    pub output_token: String,
}

/// The caller's original GET request.
///
/// Header names are case-insensitive per RFC 9110; lookups must normalize
/// case, which [`UserRequest::header`] does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRequest {
    /// The request URL, possibly carrying `partNumber` and/or `Range`
    /// query parameters.
    pub url: String,
    /// Caller-supplied headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl UserRequest {
    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Look up a query parameter on the request URL by case-insensitive
    /// name.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        query_param(&self.url, name)
    }
}

/// Get a query parameter from a URL by case-insensitive name.
///
/// Returns `None` if the URL has no query string or the parameter is
/// absent.
#[must_use]
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.into_owned())
}
