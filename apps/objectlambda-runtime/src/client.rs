//! HTTP collaborators: the origin fetch over the pre-signed URL and the
//! `WriteGetObjectResponse` delivery back through the access point.
//!
//! Both are thin `reqwest` adapters over the capability traits; nothing
//! here makes retry or policy decisions.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use tracing::debug;

use objectlambda_core::checksums::{CHECKSUM_ALGORITHM_KEY, CHECKSUM_DIGEST_KEY, Checksum};
use objectlambda_core::error::INVALID_REQUEST;
use objectlambda_core::event::GetObjectContext;
use objectlambda_core::pipeline::{OriginFetch, OriginResponse, ResponseWriter};

/// Header carrying the routing token for the response channel.
const REQUEST_ROUTE_HEADER: &str = "x-amz-request-route";
/// Header carrying the opaque single-use output token.
const REQUEST_TOKEN_HEADER: &str = "x-amz-request-token";
/// Header carrying the status code to surface to the caller.
const FWD_STATUS_HEADER: &str = "x-amz-fwd-status";
/// Header carrying the error code to surface to the caller.
const FWD_ERROR_CODE_HEADER: &str = "x-amz-fwd-error-code";
/// Header carrying the error message to surface to the caller.
const FWD_ERROR_MESSAGE_HEADER: &str = "x-amz-fwd-error-message";

/// Fetches the original object through the pre-signed URL.
#[derive(Debug, Clone)]
pub struct HttpOriginClient {
    client: reqwest::Client,
}

impl HttpOriginClient {
    /// Build a client with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build origin HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl OriginFetch for HttpOriginClient {
    async fn get(&self, url: &str, headers: &HeaderMap) -> Result<OriginResponse> {
        let response = self
            .client
            .get(url)
            .headers(headers.clone())
            .send()
            .await
            .context("origin GET request failed")?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .context("failed to read origin response body")?;

        debug!(%status, body_len = body.len(), "fetched origin object");

        Ok(OriginResponse { status, body })
    }
}

/// Delivers responses via the `WriteGetObjectResponse` endpoint for the
/// invocation's output route.
#[derive(Debug, Clone)]
pub struct S3ResponseWriter {
    client: reqwest::Client,
    region: String,
    /// When set, overrides the per-route endpoint entirely (used against
    /// local emulators).
    endpoint_override: Option<String>,
}

impl S3ResponseWriter {
    /// Build a writer for the given region.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(region: impl Into<String>, endpoint_override: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build response HTTP client")?;
        Ok(Self {
            client,
            region: region.into(),
            endpoint_override,
        })
    }

    /// Build a writer from `AWS_REGION` (default `us-east-1`) and the
    /// optional `WRITE_RESPONSE_ENDPOINT` override.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be
    /// constructed.
    pub fn from_env() -> Result<Self> {
        let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_owned());
        let endpoint_override = std::env::var("WRITE_RESPONSE_ENDPOINT").ok();
        Self::new(region, endpoint_override)
    }

    fn endpoint(&self, route: &str) -> String {
        match &self.endpoint_override {
            Some(base) => format!("{}/WriteGetObjectResponse", base.trim_end_matches('/')),
            None => format!(
                "https://{route}.s3-object-lambda.{}.amazonaws.com/WriteGetObjectResponse",
                self.region
            ),
        }
    }

    fn request(&self, ctx: &GetObjectContext, status: StatusCode) -> reqwest::RequestBuilder {
        self.client
            .post(self.endpoint(&ctx.output_route))
            .header(REQUEST_ROUTE_HEADER, &ctx.output_route)
            .header(REQUEST_TOKEN_HEADER, &ctx.output_token)
            .header(FWD_STATUS_HEADER, status.as_str())
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<()> {
        let response = request
            .send()
            .await
            .context("WriteGetObjectResponse request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("WriteGetObjectResponse rejected with status {status}");
        }
        debug!(%status, "response delivered");
        Ok(())
    }
}

/// Status surfaced to the caller for a given error code.
fn error_status(code: &str) -> StatusCode {
    if code == INVALID_REQUEST {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[async_trait]
impl ResponseWriter for S3ResponseWriter {
    async fn write_object(
        &self,
        ctx: &GetObjectContext,
        body: Bytes,
        checksum: &Checksum,
    ) -> Result<()> {
        let request = self
            .request(ctx, StatusCode::OK)
            .header(
                format!("x-amz-meta-{CHECKSUM_ALGORITHM_KEY}"),
                &checksum.algorithm,
            )
            .header(format!("x-amz-meta-{CHECKSUM_DIGEST_KEY}"), &checksum.digest)
            .body(body);
        self.send(request).await
    }

    async fn write_status(&self, ctx: &GetObjectContext, status: StatusCode) -> Result<()> {
        self.send(self.request(ctx, status)).await
    }

    async fn write_error(&self, ctx: &GetObjectContext, code: &str, message: &str) -> Result<()> {
        let request = self
            .request(ctx, error_status(code))
            .header(FWD_ERROR_CODE_HEADER, code)
            .header(FWD_ERROR_MESSAGE_HEADER, message);
        self.send(request).await
    }

    async fn write_origin_error(
        &self,
        ctx: &GetObjectContext,
        status: StatusCode,
        body: Bytes,
    ) -> Result<()> {
        self.send(self.request(ctx, status).body(body)).await
    }
}
