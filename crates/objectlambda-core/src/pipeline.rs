//! GetObject pipeline orchestration.
//!
//! [`GetObjectPipeline`] sequences validation, the origin fetch, the
//! content transformation, range/part extraction, and checksum
//! computation, and maps every failure to exactly one caller-facing
//! response shape. The origin fetch and the response delivery are
//! injected capabilities so the state machine itself performs no I/O and
//! is testable without a network.
//!
//! No retries happen here: every I/O failure becomes a terminal state,
//! and retry policy (if any) belongs to the fetch collaborator. One
//! invocation processes exactly one request; nothing is shared across
//! invocations.

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use tracing::{debug, info, warn};

use crate::checksums::{Checksum, compute_checksum};
use crate::config::LambdaConfig;
use crate::error::INVALID_REQUEST;
use crate::event::{GetObjectContext, GetObjectEvent};
use crate::extract;
use crate::headers::build_forwarded_headers;
use crate::transform::ObjectTransformer;
use crate::validator::validate_user_request;

/// Error code used for failures on our side of the fetch/transform
/// boundary (transport errors, transformation errors).
const SERVER_ERROR: &str = "ServerError";

/// The origin's answer to the pre-signed GET.
#[derive(Debug, Clone)]
pub struct OriginResponse {
    /// The origin's HTTP status code.
    pub status: StatusCode,
    /// The raw response body.
    pub body: Bytes,
}

/// Capability for fetching the original object from the backing store.
#[async_trait]
pub trait OriginFetch: Send + Sync {
    /// Perform a GET against the pre-signed URL with the forwarded
    /// headers.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport-level failures; HTTP error
    /// statuses are reported inside [`OriginResponse`].
    async fn get(&self, url: &str, headers: &HeaderMap) -> anyhow::Result<OriginResponse>;
}

/// Capability for delivering the response back through the gateway.
#[async_trait]
pub trait ResponseWriter: Send + Sync {
    /// Deliver a successful payload with its checksum metadata.
    async fn write_object(
        &self,
        ctx: &GetObjectContext,
        body: Bytes,
        checksum: &Checksum,
    ) -> anyhow::Result<()>;

    /// Echo a status code with no body and no metadata (304).
    async fn write_status(&self, ctx: &GetObjectContext, status: StatusCode)
    -> anyhow::Result<()>;

    /// Deliver a caller-facing error with a code and a specific message.
    async fn write_error(
        &self,
        ctx: &GetObjectContext,
        code: &str,
        message: &str,
    ) -> anyhow::Result<()>;

    /// Pass an origin failure through with the origin's own status and
    /// body.
    async fn write_origin_error(
        &self,
        ctx: &GetObjectContext,
        status: StatusCode,
        body: Bytes,
    ) -> anyhow::Result<()>;
}

/// Terminal state of one pipeline invocation.
///
/// Returned alongside the response delivery so tests can assert the
/// state machine without inspecting the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The extracted payload was delivered with checksum metadata.
    Success {
        /// The bytes that were served.
        payload: Bytes,
        /// The checksum attached as metadata.
        checksum: Checksum,
    },
    /// The origin answered 304; the status was echoed with no body.
    NotModified,
    /// The caller's request or selector was invalid; no payload.
    InvalidRequest {
        /// The specific message delivered to the caller.
        message: String,
    },
    /// The origin answered with a non-2xx, non-304 status, passed
    /// through.
    OriginError {
        /// The origin's status code.
        status: StatusCode,
    },
    /// A fetch transport failure or transformation failure on our side.
    ServerError {
        /// The message delivered to the caller.
        message: String,
    },
}

impl PipelineOutcome {
    /// Short name of the terminal state, for logging.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::NotModified => "not_modified",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::OriginError { .. } => "origin_error",
            Self::ServerError { .. } => "server_error",
        }
    }
}

/// The GetObject pipeline.
///
/// Generic over the fetch capability `F`, the transformer `T`, and the
/// response sink `W`; construct one per process and invoke
/// [`GetObjectPipeline::handle`] once per event.
#[derive(Debug)]
pub struct GetObjectPipeline<F, T, W> {
    fetcher: F,
    transformer: T,
    writer: W,
    config: LambdaConfig,
}

impl<F, T, W> GetObjectPipeline<F, T, W>
where
    F: OriginFetch,
    T: ObjectTransformer,
    W: ResponseWriter,
{
    /// Create a pipeline from its collaborators and configuration.
    pub fn new(fetcher: F, transformer: T, writer: W, config: LambdaConfig) -> Self {
        Self {
            fetcher,
            transformer,
            writer,
            config,
        }
    }

    /// Handle one GetObject invocation end to end.
    ///
    /// Every failure is converted into a caller-facing response at this
    /// boundary; the returned [`PipelineOutcome`] mirrors what was
    /// written.
    ///
    /// # Errors
    ///
    /// Returns an error only when the response sink itself fails;
    /// validation, extraction, and origin failures are terminal outcomes,
    /// not errors.
    pub async fn handle(&self, event: &GetObjectEvent) -> anyhow::Result<PipelineOutcome> {
        let ctx = &event.get_object_context;
        let request = &event.user_request;

        // 1. Validate before any origin I/O.
        if let Err(err) = validate_user_request(request) {
            let message = err.to_string();
            warn!(%message, "rejecting malformed request");
            self.writer.write_error(ctx, INVALID_REQUEST, &message).await?;
            return Ok(PipelineOutcome::InvalidRequest { message });
        }

        // 2. Forwarded headers: signed + conditional, minus Host.
        let forwarded = build_forwarded_headers(&request.headers, &ctx.input_s3_url);

        // 3. Fetch the original object through the pre-signed URL.
        let origin = match self.fetcher.get(&ctx.input_s3_url, &forwarded).await {
            Ok(response) => response,
            Err(err) => {
                let message = format!("error while fetching the object: {err}");
                warn!(%message, "origin fetch failed");
                self.writer.write_error(ctx, SERVER_ERROR, &message).await?;
                return Ok(PipelineOutcome::ServerError { message });
            }
        };

        if origin.status == StatusCode::NOT_MODIFIED {
            // 304 carries no body and no metadata; echo the status only.
            debug!("origin answered 304, echoing status");
            self.writer.write_status(ctx, origin.status).await?;
            return Ok(PipelineOutcome::NotModified);
        }

        if !origin.status.is_success() {
            info!(status = %origin.status, "passing origin error through");
            self.writer
                .write_origin_error(ctx, origin.status, origin.body)
                .await?;
            return Ok(PipelineOutcome::OriginError {
                status: origin.status,
            });
        }

        // 4. Transform the whole object before applying any selector.
        let transformed = match self.transformer.transform(origin.body) {
            Ok(bytes) => bytes,
            Err(err) => {
                let message = format!("error while transforming the object: {err}");
                warn!(%message, "transformation failed");
                self.writer.write_error(ctx, SERVER_ERROR, &message).await?;
                return Ok(PipelineOutcome::ServerError { message });
            }
        };

        // 5. Select and extract against the transformed coordinates.
        let payload = match extract::select(request)
            .and_then(|selector| extract::apply(&transformed, &selector, self.config.part_size))
        {
            Ok(payload) => payload,
            Err(err) => {
                let message = err.to_string();
                warn!(%message, "extraction failed");
                self.writer.write_error(ctx, INVALID_REQUEST, &message).await?;
                return Ok(PipelineOutcome::InvalidRequest { message });
            }
        };

        // 6. Checksum the exact bytes being served.
        let checksum = compute_checksum(self.config.checksum_algorithm, &payload);

        info!(
            payload_len = payload.len(),
            transformed_len = transformed.len(),
            algorithm = %checksum.algorithm,
            "serving extracted payload"
        );

        self.writer
            .write_object(ctx, payload.clone(), &checksum)
            .await?;

        Ok(PipelineOutcome::Success { payload, checksum })
    }
}
