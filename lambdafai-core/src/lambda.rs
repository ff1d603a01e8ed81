// Lambdas: named units of route handlers and middleware

use crate::application::ApplicationBuilder;
use crate::error::RegistrationError;
use crate::handler::{BoxFuture, BoxedHandler, Handler, HandlerResult};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::router::RouteOptions;
use std::fmt;
use std::sync::Arc;

const DEFAULT_MEMORY_MB: u32 = 128;
const DEFAULT_TIMEOUT_SECS: u32 = 10;

/// Check that `value` only contains `A-Z a-z 0-9 - _`.
pub fn check_identifier(value: &str, description: &'static str) -> Result<(), RegistrationError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RegistrationError::InvalidIdentifier {
            value: value.to_string(),
            description,
        })
    }
}

/// What an entry of a lambda is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Route { method: Method, template: String },
    Middleware,
}

/// One entry of a lambda, in registration order.
#[derive(Clone)]
pub struct LambdaEntry {
    kind: EntryKind,
    handler: BoxedHandler,
}

impl LambdaEntry {
    pub fn kind(&self) -> &EntryKind {
        &self.kind
    }

    pub(crate) fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for LambdaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LambdaEntry")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A named compute unit. Deployment settings are read by external tooling only.
#[derive(Debug, Clone)]
pub struct Lambda {
    name: String,
    description: String,
    memory_mb: u32,
    timeout_secs: u32,
    entries: Vec<LambdaEntry>,
}

impl Lambda {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: format!("{} (generated by Lambdafai)", name),
            memory_mb: DEFAULT_MEMORY_MB,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn memory_mb(&self) -> u32 {
        self.memory_mb
    }

    pub fn timeout_secs(&self) -> u32 {
        self.timeout_secs
    }

    pub fn entries(&self) -> &[LambdaEntry] {
        &self.entries
    }
}

macro_rules! route_verbs {
    ($($(#[$doc:meta])* $name:ident => $method:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name<F>(
                &mut self,
                template: &str,
                handler: F,
            ) -> Result<&mut Self, RegistrationError>
            where
                F: for<'r> Fn(&'r mut Request, &'r mut Response) -> BoxFuture<'r, HandlerResult>
                    + Send
                    + Sync
                    + 'static,
            {
                self.route(Method::$method, template, handler)
            }
        )*
    };
}

/// Registers entries on one lambda of an [`ApplicationBuilder`].
///
/// ```rust
/// use lambdafai_core::{Application, DispatchConfig, Error};
///
/// # fn main() -> Result<(), lambdafai_core::RegistrationError> {
/// let mut app = Application::builder("todo-app")?;
/// app.lambda("todos")?
///     .use_fn(|_req, res| Box::pin(async move { Ok(res.pass_through()) }))
///     .get("/todos/:id", |req, res| {
///         Box::pin(async move {
///             let id = req.param("id").unwrap_or_default().to_string();
///             Ok(res.send(serde_json::json!({ "id": id })))
///         })
///     })?
///     .delete("/todos/:id", |_req, res| {
///         Box::pin(async move { Ok(res.fail(Error::forbidden(None))) })
///     })?;
/// let app = app.build(DispatchConfig::default());
/// assert_eq!(app.router().len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct LambdaBuilder<'a> {
    app: &'a mut ApplicationBuilder,
    index: usize,
}

impl<'a> LambdaBuilder<'a> {
    pub(crate) fn new(app: &'a mut ApplicationBuilder, index: usize) -> Self {
        Self { app, index }
    }

    fn lambda_mut(&mut self) -> &mut Lambda {
        &mut self.app.lambdas[self.index]
    }

    pub fn name(&self) -> &str {
        &self.app.lambdas[self.index].name
    }

    pub fn description(&mut self, description: impl Into<String>) -> &mut Self {
        self.lambda_mut().description = description.into();
        self
    }

    pub fn memory_mb(&mut self, memory_mb: u32) -> &mut Self {
        self.lambda_mut().memory_mb = memory_mb;
        self
    }

    pub fn timeout_secs(&mut self, timeout_secs: u32) -> &mut Self {
        self.lambda_mut().timeout_secs = timeout_secs;
        self
    }

    route_verbs! {
        get => Get,
        post => Post,
        put => Put,
        delete => Delete,
        options => Options,
        patch => Patch,
        head => Head,
        /// Object created in a bucket; the template matches `/` + the object key.
        object_put => ObjectPut,
        /// Scheduled rule; the template is `/` + the rule name.
        scheduled => Scheduled,
        /// Token authorizer; the template is `/<verb>/<resource>`.
        authorizer => Authorizer,
        /// User-directory trigger; the template is `/` + the trigger source.
        directory_event => DirectoryEvent,
        /// New table item; the template is `/` + the table name.
        stream_insert => StreamInsert,
        /// Modified table item; the template is `/` + the table name.
        stream_modify => StreamModify,
        /// Log subscription batch; the template is `/` + the subscription filter name.
        log_subscription => LogSubscription,
        /// Queue batch; the template is `/` + the queue name.
        queue_message => QueueMessage,
        direct_invoke => DirectInvoke,
    }

    /// Register a closure route for any method.
    pub fn route<F>(
        &mut self,
        method: Method,
        template: &str,
        handler: F,
    ) -> Result<&mut Self, RegistrationError>
    where
        F: for<'r> Fn(&'r mut Request, &'r mut Response) -> BoxFuture<'r, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.add_route(method, template, RouteOptions::default(), Arc::new(handler))
    }

    /// Register a closure route with deployment options.
    pub fn route_with<F>(
        &mut self,
        method: Method,
        template: &str,
        options: RouteOptions,
        handler: F,
    ) -> Result<&mut Self, RegistrationError>
    where
        F: for<'r> Fn(&'r mut Request, &'r mut Response) -> BoxFuture<'r, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.add_route(method, template, options, Arc::new(handler))
    }

    /// Register a [`Handler`] implementation as a route.
    pub fn route_handler<H: Handler>(
        &mut self,
        method: Method,
        template: &str,
        options: RouteOptions,
        handler: H,
    ) -> Result<&mut Self, RegistrationError> {
        self.add_route(method, template, options, Arc::new(handler))
    }

    /// Add closure middleware at the current position.
    pub fn use_fn<F>(&mut self, middleware: F) -> &mut Self
    where
        F: for<'r> Fn(&'r mut Request, &'r mut Response) -> BoxFuture<'r, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.use_middleware(middleware)
    }

    /// Add middleware at the current position.
    pub fn use_middleware<H: Handler>(&mut self, middleware: H) -> &mut Self {
        self.lambda_mut().entries.push(LambdaEntry {
            kind: EntryKind::Middleware,
            handler: Arc::new(middleware),
        });
        self
    }

    fn add_route(
        &mut self,
        method: Method,
        template: &str,
        options: RouteOptions,
        handler: BoxedHandler,
    ) -> Result<&mut Self, RegistrationError> {
        let index = self.index;
        let app = &mut *self.app;
        let lambda = &mut app.lambdas[index];
        let entry = lambda.entries.len();

        app.router
            .register(index, &lambda.name, entry, method, template, options)?;
        lambda.entries.push(LambdaEntry {
            kind: EntryKind::Route {
                method,
                template: template.to_string(),
            },
            handler,
        });
        Ok(self)
    }
}
