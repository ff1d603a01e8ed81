// Handler and middleware entries of a dispatch chain
//
// Middleware and route handlers share one shape: they receive the request and the response,
// and must return a `Next` obtained from the response (finalize, send, fail, redirect or
// pass_through). Returning `Err` is treated as finalizing with that error.

use crate::error::Error;
use crate::request::Request;
use crate::response::{Next, Response};
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by closure handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What every chain entry returns.
pub type HandlerResult = Result<Next, Error>;

/// A chain entry: route handler or middleware.
///
/// ```rust
/// use async_trait::async_trait;
/// use lambdafai_core::{Handler, HandlerResult, Request, Response};
///
/// struct Hello;
///
/// #[async_trait]
/// impl Handler for Hello {
///     async fn call(&self, _req: &mut Request, res: &mut Response) -> HandlerResult {
///         Ok(res.send("hello"))
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn call(&self, req: &mut Request, res: &mut Response) -> HandlerResult;
}

#[async_trait]
impl<F> Handler for F
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response) -> BoxFuture<'a, HandlerResult>
        + Send
        + Sync
        + 'static,
{
    async fn call(&self, req: &mut Request, res: &mut Response) -> HandlerResult {
        (self)(req, res).await
    }
}

/// Type-erased handler as stored in a lambda or application.
pub type BoxedHandler = Arc<dyn Handler>;
