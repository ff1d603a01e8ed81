// Lambdafai - named lambdas, route handlers and middleware for serverless applications
//
// One application value describes every lambda, its routes and its middleware. Each invocation,
// whatever triggered it, is normalized into a request and answered by exactly one outcome.

// Re-export core functionality
pub use lambdafai_core::*;

// Re-export the runtime adapter
#[cfg(feature = "lambda")]
pub use lambdafai_lambda as lambda;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Application,
        ApplicationBuilder,
        DispatchConfig,
        Error,
        ErrorKind,
        Extensions,
        Handler,
        HandlerResult,
        InvocationContext,
        LambdaBuilder,
        Method,
        Next,
        Outcome,
        RegistrationError,
        Request,
        Response,
        RouteOptions,
    };

    #[cfg(feature = "lambda")]
    pub use crate::lambda::{LambdaRuntime, RuntimeConfig};

    pub use async_trait::async_trait;
}
