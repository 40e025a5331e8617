//! Content transformation.
//!
//! The transformation runs on the *whole* fetched object before any range
//! or part extraction, so caller coordinates always address the
//! transformed byte sequence. Implement [`ObjectTransformer`] with your
//! own transformation logic; the pipeline treats it as a total function.

use bytes::Bytes;

use crate::error::GetObjectResult;

/// A content transformation applied to the fetched object.
pub trait ObjectTransformer: Send + Sync {
    /// Transform the original object bytes into the bytes served to the
    /// caller (before range/part extraction).
    ///
    /// # Errors
    ///
    /// Implementations may fail; the pipeline surfaces the failure as an
    /// internal error.
    fn transform(&self, object: Bytes) -> GetObjectResult<Bytes>;
}

/// The identity transformation: serves the object unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransformer;

impl ObjectTransformer for IdentityTransformer {
    fn transform(&self, object: Bytes) -> GetObjectResult<Bytes> {
        Ok(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_pass_object_through_identity_transformer() {
        let obj = Bytes::from_static(b"hello world");
        let out = IdentityTransformer.transform(obj.clone()).expect("test transform");
        assert_eq!(out, obj);
    }

    #[test]
    fn test_should_support_custom_transformers() {
        struct Uppercase;
        impl ObjectTransformer for Uppercase {
            fn transform(&self, object: Bytes) -> GetObjectResult<Bytes> {
                Ok(Bytes::from(object.to_ascii_uppercase()))
            }
        }

        let out = Uppercase
            .transform(Bytes::from_static(b"hello"))
            .expect("test transform");
        assert_eq!(out.as_ref(), b"HELLO");
    }
}
