//! Part-number resolution against the transformed object.
//!
//! A part number is a 1-based index into fixed-size, contiguous,
//! non-overlapping chunks of the transformed object. The chunk sequence
//! exactly tiles the object; the final part may be shorter than the
//! configured part size.

use bytes::Bytes;

use crate::error::{GetObjectError, GetObjectResult};

/// Resolve a 1-based part number into the addressed slice of `object`.
///
/// Part `n` covers bytes `[(n-1) * part_size, min(n * part_size, len))`.
///
/// # Errors
///
/// Returns [`GetObjectError::InvalidPartNumber`] if `part_number` is less
/// than 1 or addresses a part beyond the end of the object.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use objectlambda_core::extract::part::map_part_number;
///
/// let obj = Bytes::from_static(b"abcdefgh");
/// assert_eq!(map_part_number(&obj, 2, 4).unwrap().as_ref(), b"efgh");
/// ```
pub fn map_part_number(
    object: &Bytes,
    part_number: i64,
    part_size: usize,
) -> GetObjectResult<Bytes> {
    if part_number < 1 {
        return Err(GetObjectError::InvalidPartNumber {
            message: format!("partNumber must be 1 or greater, got: {part_number}"),
        });
    }

    let length = object.len();
    let index = usize::try_from(part_number - 1).map_err(|_| GetObjectError::InvalidPartNumber {
        message: format!("partNumber out of bounds: {part_number}"),
    })?;

    let start = index
        .checked_mul(part_size)
        .ok_or_else(|| GetObjectError::InvalidPartNumber {
            message: format!("partNumber out of bounds: {part_number}"),
        })?;

    if start >= length {
        return Err(GetObjectError::InvalidPartNumber {
            message: format!(
                "part {part_number} does not exist: object has {length} bytes with part size {part_size}"
            ),
        });
    }

    let end = start.saturating_add(part_size).min(length);
    Ok(object.slice(start..end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(data: &'static [u8]) -> Bytes {
        Bytes::from_static(data)
    }

    #[test]
    fn test_should_map_first_part() {
        let out = map_part_number(&obj(b"abcdefgh"), 1, 4).expect("test map");
        assert_eq!(out.as_ref(), b"abcd");
    }

    #[test]
    fn test_should_map_second_part() {
        let out = map_part_number(&obj(b"abcdefgh"), 2, 4).expect("test map");
        assert_eq!(out.as_ref(), b"efgh");
    }

    #[test]
    fn test_should_map_short_final_part() {
        let out = map_part_number(&obj(b"abcdefghij"), 3, 4).expect("test map");
        assert_eq!(out.as_ref(), b"ij");
    }

    #[test]
    fn test_should_map_whole_object_when_part_size_exceeds_length() {
        let out = map_part_number(&obj(b"abc"), 1, 1024).expect("test map");
        assert_eq!(out.as_ref(), b"abc");
    }

    #[test]
    fn test_should_reject_part_beyond_object() {
        // Object of 8 bytes with part size 4 has exactly two parts.
        let err = map_part_number(&obj(b"abcdefgh"), 3, 4).expect_err("test expect error");
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_should_reject_far_out_of_range_part() {
        assert!(map_part_number(&obj(b"abcdefgh"), 5, 4).is_err());
    }

    #[test]
    fn test_should_reject_zero_part_number() {
        let err = map_part_number(&obj(b"abcdefgh"), 0, 4).expect_err("test expect error");
        assert!(err.to_string().contains("1 or greater"));
    }

    #[test]
    fn test_should_reject_negative_part_number() {
        assert!(map_part_number(&obj(b"abcdefgh"), -2, 4).is_err());
    }

    #[test]
    fn test_should_reject_any_part_of_empty_object() {
        assert!(map_part_number(&obj(b""), 1, 4).is_err());
    }

    #[test]
    fn test_should_tile_object_exactly() {
        let data = b"0123456789ab";
        let parts: Vec<Bytes> = (1..=3)
            .map(|n| map_part_number(&obj(data), n, 4).expect("test map"))
            .collect();
        let rebuilt: Vec<u8> = parts.iter().flat_map(|p| p.iter().copied()).collect();
        assert_eq!(rebuilt, data);
    }
}
