//! Post-transform extraction.
//!
//! Once the transformed object exists, the caller may have asked for only
//! a subset of it: an HTTP byte range or a fixed-size part. This module
//! owns the selector precedence rule and the two coordinate mappers.

pub mod part;
pub mod range;

use bytes::Bytes;

use crate::error::{GetObjectError, GetObjectResult};
use crate::event::UserRequest;

/// Query parameter carrying a 1-based part index.
pub const PART_NUMBER_PARAM: &str = "partNumber";

/// Header (or query parameter) carrying an HTTP byte-range expression.
pub const RANGE_PARAM: &str = "Range";

/// The portion of the transformed object addressed by the caller.
///
/// Part-number and range semantics are mutually exclusive use cases; when
/// both are syntactically present, the part number is the more specific
/// intent and wins. Modeling the choice as a variant makes that
/// precedence a single decision point instead of a scattered convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectPart {
    /// No selector: serve the whole transformed object.
    Whole,
    /// An HTTP byte-range expression, e.g. `bytes=0-499`.
    Range(String),
    /// A 1-based index into fixed-size parts of the transformed object.
    PartNumber(i64),
}

/// Decide which selector applies to a request.
///
/// A `partNumber` query parameter takes priority over any range value,
/// even if both are present and regardless of the range's validity. The
/// range is read from the `Range` header, falling back to the `range`
/// query parameter when the header is absent.
///
/// # Errors
///
/// Returns [`GetObjectError::InvalidPartNumber`] if `partNumber` is
/// present but not an integer.
pub fn select(request: &UserRequest) -> GetObjectResult<ObjectPart> {
    if let Some(raw) = request.query_param(PART_NUMBER_PARAM) {
        let n: i64 = raw.parse().map_err(|_| GetObjectError::InvalidPartNumber {
            message: format!("partNumber must be an integer, got: {raw}"),
        })?;
        return Ok(ObjectPart::PartNumber(n));
    }

    if let Some(range) = request.header(RANGE_PARAM) {
        return Ok(ObjectPart::Range(range.to_owned()));
    }
    if let Some(range) = request.query_param(RANGE_PARAM) {
        return Ok(ObjectPart::Range(range));
    }

    Ok(ObjectPart::Whole)
}

/// Apply a selector to the transformed object, producing the payload to
/// serve.
///
/// # Errors
///
/// Returns the mapper's error when the selector is malformed or does not
/// address any bytes of the object.
pub fn apply(
    object: &Bytes,
    selector: &ObjectPart,
    part_size: usize,
) -> GetObjectResult<Bytes> {
    match selector {
        ObjectPart::Whole => Ok(object.clone()),
        ObjectPart::Range(spec) => range::map_range(object, spec),
        ObjectPart::PartNumber(n) => part::map_part_number(object, *n, part_size),
    }
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
    fn test_should_select_whole_without_selectors() {
        let req = request("https://x/y", &[]);
        assert_eq!(select(&req).expect("test select"), ObjectPart::Whole);
    }

    #[test]
    fn test_should_select_range_from_header() {
        let req = request("https://x/y", &[("Range", "bytes=0-4")]);
        assert_eq!(
            select(&req).expect("test select"),
            ObjectPart::Range("bytes=0-4".to_owned()),
        );
    }

    #[test]
    fn test_should_fall_back_to_range_query_param() {
        let req = request("https://x/y?range=bytes%3D5-9", &[]);
        assert_eq!(
            select(&req).expect("test select"),
            ObjectPart::Range("bytes=5-9".to_owned()),
        );
    }

    #[test]
    fn test_should_prefer_range_header_over_query_param() {
        let req = request("https://x/y?range=bytes%3D5-9", &[("Range", "bytes=0-4")]);
        assert_eq!(
            select(&req).expect("test select"),
            ObjectPart::Range("bytes=0-4".to_owned()),
        );
    }

    #[test]
    fn test_should_prefer_part_number_over_range() {
        // Part number wins even when the range would be invalid.
        let req = request(
            "https://x/y?partNumber=2",
            &[("Range", "bytes=nonsense")],
        );
        assert_eq!(
            select(&req).expect("test select"),
            ObjectPart::PartNumber(2),
        );
    }

    #[test]
    fn test_should_reject_non_integer_part_number() {
        let req = request("https://x/y?partNumber=two", &[]);
        let err = select(&req).expect_err("test expect error");
        assert!(err.to_string().contains("must be an integer"));
    }

    #[test]
    fn test_should_apply_whole_selector() {
        let obj = Bytes::from_static(b"hello world");
        let out = apply(&obj, &ObjectPart::Whole, 4).expect("test apply");
        assert_eq!(out, obj);
    }

    #[test]
    fn test_should_apply_range_selector() {
        let obj = Bytes::from_static(b"hello world");
        let out = apply(&obj, &ObjectPart::Range("bytes=0-4".to_owned()), 4)
            .expect("test apply");
        assert_eq!(out.as_ref(), b"hello");
    }

    #[test]
    fn test_should_apply_part_number_selector() {
        let obj = Bytes::from_static(b"abcdefgh");
        let out = apply(&obj, &ObjectPart::PartNumber(2), 4).expect("test apply");
        assert_eq!(out.as_ref(), b"efgh");
    }
}
