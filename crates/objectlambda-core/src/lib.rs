//! GetObject transformation pipeline core.
//!
//! This crate implements the handler side of an object-transformation
//! access point: a GetObject request arrives as a gateway event carrying
//! the caller's original request plus a pre-signed URL for the backing
//! store. The pipeline validates the caller request, fetches the original
//! object through the pre-signed URL with the correct subset of forwarded
//! headers, applies a content transformation, and then serves only the
//! byte subset the caller asked for (an HTTP byte range or a fixed-size
//! part) together with an integrity checksum.
//!
//! # Architecture
//!
//! ```text
//! Gateway event (GetObjectEvent)
//!        |
//!        v
//! GetObjectPipeline (validate -> fetch -> transform -> extract -> checksum)
//!        |                |                                 |
//!        v                v                                 v
//!   OriginFetch      ObjectTransformer              ResponseWriter
//!   (injected)          (injected)                    (injected)
//! ```
//!
//! The core is pure computation; all network I/O lives behind the
//! [`pipeline::OriginFetch`] and [`pipeline::ResponseWriter`] capability
//! traits so the whole state machine is testable without a network.

pub mod checksums;
pub mod config;
pub mod error;
pub mod event;
pub mod extract;
pub mod headers;
pub mod pipeline;
pub mod transform;
pub mod validator;

pub use config::LambdaConfig;
pub use error::GetObjectError;
pub use event::GetObjectEvent;
pub use pipeline::GetObjectPipeline;
