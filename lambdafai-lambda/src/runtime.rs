//! Lambda runtime for Lambdafai applications.

use lambda_runtime::{Context, Error, LambdaEvent, run, service_fn};
use lambdafai_core::{Application, EventSource, InvocationContext};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::LambdaError;

/// Lambda runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Log each invocation at debug level.
    pub log_requests: bool,
    /// Log each reply at debug level.
    pub log_responses: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_requests: true,
            log_responses: false,
        }
    }
}

impl RuntimeConfig {
    pub fn log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    pub fn log_responses(mut self, enabled: bool) -> Self {
        self.log_responses = enabled;
        self
    }
}

/// Runs an [`Application`] on the Lambda runtime.
///
/// Every invocation payload is handed to [`handle_invocation`], whatever the trigger.
pub struct LambdaRuntime {
    app: Arc<Application>,
    config: RuntimeConfig,
}

impl LambdaRuntime {
    pub fn new(app: Application) -> Self {
        Self::from_arc(Arc::new(app))
    }

    pub fn from_arc(app: Arc<Application>) -> Self {
        Self {
            app,
            config: RuntimeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the Lambda runtime.
    ///
    /// This function never returns under normal operation.
    pub async fn run(self) -> Result<(), Error> {
        info!(app = self.app.name(), "Starting Lambdafai Lambda runtime");

        let app = self.app;
        let config = self.config;

        run(service_fn(move |event: LambdaEvent<Value>| {
            let app = app.clone();
            let config = config.clone();
            async move {
                let ctx = context_from(&event.context);
                handle_invocation(&app, &config, event.payload, ctx)
                    .await
                    .map_err(Error::from)
            }
        }))
        .await
    }
}

/// Convert the runtime's invocation context.
pub fn context_from(context: &Context) -> InvocationContext {
    let mut ctx = InvocationContext::new();
    if !context.request_id.is_empty() {
        ctx = ctx.with_request_id(context.request_id.clone());
    }
    if !context.invoked_function_arn.is_empty() {
        ctx = ctx.with_function_arn(context.invoked_function_arn.clone());
    }
    ctx
}

/// Handle one invocation payload.
///
/// HTTP-gateway invocations always succeed with a proxy response, error outcomes included
/// (a gateway request whose body or verb is rejected gets a 400 response).
/// Other triggers have no status code to carry a failure, so an error outcome (or an event that
/// could not be normalized) becomes an invocation error, and a success returns the body.
pub async fn handle_invocation(
    app: &Application,
    config: &RuntimeConfig,
    payload: Value,
    ctx: InvocationContext,
) -> Result<Value, LambdaError> {
    if config.log_requests {
        debug!(
            request_id = ?ctx.request_id,
            function_arn = ?ctx.invoked_function_arn,
            "Handling Lambda invocation"
        );
    }

    let invocation = app.handle_event(&payload, &ctx).await;
    let outcome = invocation.outcome;

    if config.log_responses {
        debug!(
            source = ?invocation.source,
            status = outcome.status_code,
            violations = outcome.completion_violations,
            "Lambda response"
        );
    }

    match invocation.source {
        Some(EventSource::HttpGateway) => {
            Ok(serde_json::to_value(outcome.into_gateway_response())?)
        }
        Some(_) => match outcome.error {
            Some(err) => Err(LambdaError::Application(err.message())),
            None => Ok(outcome.body.unwrap_or(Value::Null)),
        },
        None => {
            let message = outcome
                .error
                .map(|err| err.message())
                .unwrap_or_else(|| "unrecognized event".to_string());
            Err(LambdaError::Event(message))
        }
    }
}
