// Core library for the Lambdafai serverless framework
// Event normalization, routing, and the middleware/handler chain that answers each invocation

pub mod application;
pub mod chain;
pub mod config;
pub mod error;
pub mod events;
pub mod extensions;
pub mod handler;
pub mod lambda;
pub mod logging;
pub mod method;
pub mod paths;
pub mod request;
pub mod response;
pub mod router;

// Re-export commonly used types
pub use application::*;
pub use chain::ChainExecutor;
pub use config::DispatchConfig;
pub use error::*;
pub use events::{EventNormalizer, InboundEvent, InvocationContext};
pub use extensions::Extensions;
pub use handler::*;
pub use lambda::*;
pub use method::*;
pub use paths::Params;
pub use request::*;
pub use response::*;
pub use router::{Route, RouteMatch, RouteOptions, Router};
