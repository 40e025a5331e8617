//! Object transformation GetObject runtime.
//!
//! This binary wires the pure pipeline from `objectlambda-core` to real
//! HTTP collaborators and drives it from the Lambda custom-runtime
//! interface. Each invocation carries a `getObjectContext` with a
//! pre-signed origin URL and an output route/token pair; the response is
//! delivered through `WriteGetObjectResponse`.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AWS_LAMBDA_RUNTIME_API` | *(required)* | Runtime interface `host:port` |
//! | `AWS_REGION` | `us-east-1` | Region for the response endpoint |
//! | `WRITE_RESPONSE_ENDPOINT` | *(unset)* | Response endpoint override for local emulators |
//! | `PART_SIZE` | `5242880` | Part size in bytes for `partNumber` tiling |
//! | `CHECKSUM_ALGORITHM` | `SHA256` | Algorithm for payload checksum metadata |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod client;
mod runtime;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use objectlambda_core::transform::IdentityTransformer;
use objectlambda_core::{GetObjectPipeline, LambdaConfig};

use crate::client::{HttpOriginClient, S3ResponseWriter};
use crate::runtime::RuntimeClient;

/// Runtime version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL`
/// config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = LambdaConfig::from_env();

    init_tracing(&config.log_level)?;

    info!(
        part_size = config.part_size,
        checksum_algorithm = %config.checksum_algorithm,
        version = VERSION,
        "starting object transformation runtime",
    );

    let fetcher = HttpOriginClient::new()?;
    let writer = S3ResponseWriter::from_env()?;
    let pipeline = GetObjectPipeline::new(fetcher, IdentityTransformer, writer, config);

    let runtime = RuntimeClient::from_env()?;

    runtime::run(&runtime, &pipeline).await
}
