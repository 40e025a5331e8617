//! HTTP byte-range resolution against the transformed object.
//!
//! Supports the three RFC 9110 byte-range-spec forms:
//!
//! - `bytes=0-499` -- an inclusive start-end span
//! - `bytes=500-` -- from an offset to the end
//! - `bytes=-500` -- the final N bytes (suffix form)
//!
//! Multi-range expressions (`bytes=0-1,5-9`) are not supported.

use bytes::Bytes;

use crate::error::{GetObjectError, GetObjectResult};

/// Resolve a `Range` expression into the addressed slice of `object`.
///
/// The range applies to the *transformed* object, so all bounds are
/// checked against its length, not the original object's. A suffix
/// longer than the object clamps to the whole object; an `end` beyond the
/// last byte clamps to the last byte.
///
/// # Errors
///
/// Returns [`GetObjectError::InvalidRange`] if the expression is
/// malformed, the start lies at or beyond the object length, the start
/// exceeds the end, or the object is empty (every range request on a
/// zero-length object is unsatisfiable).
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use objectlambda_core::extract::range::map_range;
///
/// let obj = Bytes::from_static(b"hello world");
/// assert_eq!(map_range(&obj, "bytes=0-4").unwrap().as_ref(), b"hello");
/// assert_eq!(map_range(&obj, "bytes=-5").unwrap().as_ref(), b"world");
/// ```
pub fn map_range(object: &Bytes, spec: &str) -> GetObjectResult<Bytes> {
    let length = object.len();

    let range = spec
        .strip_prefix("bytes=")
        .ok_or_else(|| invalid_range(format!("range must start with \"bytes=\": {spec}")))?;

    if length == 0 {
        return Err(invalid_range(
            "object is empty; no range is satisfiable".to_owned(),
        ));
    }

    let (start, end) = if let Some(suffix) = range.strip_prefix('-') {
        // bytes=-N  (last N bytes); a suffix longer than the object
        // clamps to the whole object.
        let n: usize = parse_component(suffix, spec)?;
        if n == 0 {
            return Err(invalid_range(format!(
                "suffix length must be positive: {spec}"
            )));
        }
        (length.saturating_sub(n), length - 1)
    } else if let Some(prefix) = range.strip_suffix('-') {
        // bytes=N-  (from N to end)
        let start: usize = parse_component(prefix, spec)?;
        if start >= length {
            return Err(invalid_range(format!(
                "range start {start} is beyond the object length {length}"
            )));
        }
        (start, length - 1)
    } else {
        // bytes=N-M (inclusive)
        let (start_str, end_str) = range
            .split_once('-')
            .ok_or_else(|| invalid_range(format!("malformed range expression: {spec}")))?;
        let start: usize = parse_component(start_str, spec)?;
        let end: usize = parse_component(end_str, spec)?;
        if start > end {
            return Err(invalid_range(format!(
                "range start {start} exceeds range end {end}"
            )));
        }
        if start >= length {
            return Err(invalid_range(format!(
                "range start {start} is beyond the object length {length}"
            )));
        }
        (start, end.min(length - 1))
    };

    Ok(object.slice(start..=end))
}

/// Parse a single numeric range component, rejecting signs and non-digits.
fn parse_component(s: &str, spec: &str) -> GetObjectResult<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_range(format!(
            "range component is not a non-negative integer: {spec}"
        )));
    }
    s.parse()
        .map_err(|_| invalid_range(format!("range component out of bounds: {spec}")))
}

fn invalid_range(message: String) -> GetObjectError {
    GetObjectError::InvalidRange { message }
}
