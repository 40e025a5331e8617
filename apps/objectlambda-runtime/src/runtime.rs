//! Lambda custom-runtime invocation loop.
//!
//! Polls the runtime interface for invocation events, drives one
//! pipeline run per event, and acknowledges the invocation. The actual
//! caller-facing response travels through `WriteGetObjectResponse`; the
//! acknowledgement body here only tells the runtime interface that the
//! invocation completed.

use anyhow::{Context, Result};
use serde_json::json;
use tracing::{error, info, warn};

use objectlambda_core::event::GetObjectEvent;
use objectlambda_core::pipeline::{GetObjectPipeline, OriginFetch, ResponseWriter};
use objectlambda_core::transform::ObjectTransformer;

/// Header identifying the invocation on the next-invocation response.
const REQUEST_ID_HEADER: &str = "Lambda-Runtime-Aws-Request-Id";
/// API version prefix of the runtime interface.
const RUNTIME_API_VERSION: &str = "2018-06-01";

/// One pending invocation taken from the runtime interface.
#[derive(Debug)]
pub struct Invocation {
    /// The invocation id used to acknowledge completion.
    pub request_id: String,
    /// The raw event payload.
    pub payload: bytes::Bytes,
}

/// Client for the Lambda runtime interface.
#[derive(Debug, Clone)]
pub struct RuntimeClient {
    client: reqwest::Client,
    base: String,
}

impl RuntimeClient {
    /// Build a client against the given `host:port` of the runtime
    /// interface.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(api: impl AsRef<str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed to build runtime interface client")?;
        Ok(Self {
            client,
            base: format!("http://{}/{RUNTIME_API_VERSION}/runtime", api.as_ref()),
        })
    }

    /// Build a client from `AWS_LAMBDA_RUNTIME_API`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or the client cannot be
    /// constructed.
    pub fn from_env() -> Result<Self> {
        let api = std::env::var("AWS_LAMBDA_RUNTIME_API")
            .context("AWS_LAMBDA_RUNTIME_API is not set")?;
        Self::new(api)
    }

    /// Block until the next invocation is available.
    async fn next_invocation(&self) -> Result<Invocation> {
        let response = self
            .client
            .get(format!("{}/invocation/next", self.base))
            .send()
            .await
            .context("failed to poll for the next invocation")?;

        let request_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned)
            .context("invocation response is missing the request id header")?;

        let payload = response
            .bytes()
            .await
            .context("failed to read the invocation payload")?;

        Ok(Invocation {
            request_id,
            payload,
        })
    }

    /// Acknowledge a completed invocation.
    async fn post_response(&self, request_id: &str, body: &serde_json::Value) -> Result<()> {
        self.client
            .post(format!("{}/invocation/{request_id}/response", self.base))
            .json(body)
            .send()
            .await
            .with_context(|| format!("failed to acknowledge invocation {request_id}"))?;
        Ok(())
    }

    /// Report an invocation-level failure.
    async fn post_error(&self, request_id: &str, error_type: &str, message: &str) -> Result<()> {
        self.client
            .post(format!("{}/invocation/{request_id}/error", self.base))
            .json(&error_payload(error_type, message))
            .send()
            .await
            .with_context(|| format!("failed to report an error for invocation {request_id}"))?;
        Ok(())
    }
}

/// Error document posted to the runtime interface.
fn error_payload(error_type: &str, message: &str) -> serde_json::Value {
    json!({
        "errorType": error_type,
        "errorMessage": message,
    })
}

/// Run the invocation loop until the poll itself fails.
///
/// Event decode failures and pipeline failures are reported per
/// invocation and do not stop the loop.
///
/// # Errors
///
/// Returns an error when the runtime interface becomes unreachable.
pub async fn run<F, T, W>(
    runtime: &RuntimeClient,
    pipeline: &GetObjectPipeline<F, T, W>,
) -> Result<()>
where
    F: OriginFetch,
    T: ObjectTransformer,
    W: ResponseWriter,
{
    loop {
        let invocation = runtime.next_invocation().await?;
        let request_id = invocation.request_id;

        let event: GetObjectEvent = match serde_json::from_slice(&invocation.payload) {
            Ok(event) => event,
            Err(err) => {
                warn!(%request_id, error = %err, "undecodable invocation event");
                runtime
                    .post_error(&request_id, "InvalidEvent", &err.to_string())
                    .await?;
                continue;
            }
        };

        info!(
            %request_id,
            route = %event.get_object_context.output_route,
            "handling invocation"
        );

        match pipeline.handle(&event).await {
            Ok(outcome) => {
                info!(%request_id, outcome = outcome.label(), "invocation completed");
                runtime
                    .post_response(&request_id, &json!({ "status_code": 200 }))
                    .await?;
            }
            Err(err) => {
                error!(%request_id, error = %err, "invocation failed");
                runtime
                    .post_error(&request_id, "HandlerError", &err.to_string())
                    .await?;
            }
        }
    }
}
