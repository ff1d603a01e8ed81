//! # Lambdafai Lambda
//!
//! AWS Lambda runtime adapter for Lambdafai applications.
//!
//! One deployed function serves every trigger wired to it: API Gateway proxy requests, S3
//! uploads, schedules, authorizers, Cognito triggers, DynamoDB streams, log subscriptions, SQS
//! batches and direct invocations all go through the same
//! [`Application`](lambdafai_core::Application).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lambdafai_core::{Application, DispatchConfig};
//! use lambdafai_lambda::LambdaRuntime;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lambda_runtime::Error> {
//!     lambdafai_lambda::init_tracing();
//!
//!     let mut app = Application::builder("hello-world")?;
//!     app.lambda("hello")?
//!         .get("/hello/:name", |req, res| {
//!             Box::pin(async move {
//!                 let name = req.param("name").unwrap_or("world").to_string();
//!                 Ok(res.send(format!("Hello, {}!", name)))
//!             })
//!         })?;
//!
//!     let app = app.build(DispatchConfig::from_env()?);
//!     LambdaRuntime::new(app).run().await
//! }
//! ```
//!
//! ## Replies
//!
//! HTTP requests always get an API Gateway proxy response; failures are carried in the status
//! code. Every other trigger gets the response body, or an invocation error when the chain
//! failed, so the platform's retry and dead-letter handling applies.

mod error;
mod runtime;

pub use error::{LambdaError, Result};
pub use runtime::{LambdaRuntime, RuntimeConfig, context_from, handle_invocation};

// Re-export lambda types
pub use lambda_runtime;

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing for Lambda/CloudWatch.
///
/// Structured JSON, one object per line. `RUST_LOG` overrides the default `info` filter.
/// Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = try_init_with_filter(filter);
}

/// Initialize tracing with a custom log level or filter directive.
pub fn init_tracing_with_level(level: &str) -> std::result::Result<(), TryInitError> {
    try_init_with_filter(EnvFilter::new(level))
}

fn try_init_with_filter(filter: EnvFilter) -> std::result::Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
        .try_init()
}
