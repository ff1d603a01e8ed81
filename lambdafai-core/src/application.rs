// Application: the immutable registry that every dispatch runs against

use crate::chain::ChainExecutor;
use crate::config::DispatchConfig;
use crate::error::{NormalizationError, RegistrationError};
use crate::events::{EventNormalizer, InboundEvent, InvocationContext};
use crate::handler::{BoxFuture, BoxedHandler, Handler, HandlerResult};
use crate::lambda::{Lambda, LambdaBuilder, check_identifier};
use crate::request::{EventSource, Request};
use crate::response::{Outcome, Response};
use crate::router::Router;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// A top-level chain entry, kept in registration order.
#[derive(Clone)]
pub enum AppEntry {
    Middleware(BoxedHandler),
    /// Index into [`Application::lambdas`].
    Lambda(usize),
}

impl fmt::Debug for AppEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppEntry::Middleware(_) => f.write_str("Middleware"),
            AppEntry::Lambda(index) => f.debug_tuple("Lambda").field(index).finish(),
        }
    }
}

/// Collects lambdas, routes and middleware before freezing them into an [`Application`].
pub struct ApplicationBuilder {
    name: String,
    pub(crate) lambdas: Vec<Lambda>,
    entries: Vec<AppEntry>,
    pub(crate) router: Router,
}

impl ApplicationBuilder {
    /// Declare a new lambda and start registering its entries.
    ///
    /// The lambda takes its place in the top-level chain now: application middleware added
    /// later runs after it.
    pub fn lambda(&mut self, name: &str) -> Result<LambdaBuilder<'_>, RegistrationError> {
        check_identifier(name, "lambda name")?;
        if self.lambdas.iter().any(|l| l.name() == name) {
            return Err(RegistrationError::DuplicateName {
                kind: "lambdas",
                name: name.to_string(),
            });
        }

        let index = self.lambdas.len();
        self.lambdas.push(Lambda::new(name));
        self.entries.push(AppEntry::Lambda(index));
        debug!(app = %self.name, lambda = name, "Registered lambda");
        Ok(LambdaBuilder::new(self, index))
    }

    /// Add application middleware at the current position.
    pub fn use_fn<F>(&mut self, middleware: F) -> &mut Self
    where
        F: for<'r> Fn(&'r mut Request, &'r mut Response) -> BoxFuture<'r, HandlerResult>
            + Send
            + Sync
            + 'static,
    {
        self.use_middleware(middleware)
    }

    pub fn use_middleware<H: Handler>(&mut self, middleware: H) -> &mut Self {
        self.entries.push(AppEntry::Middleware(Arc::new(middleware)));
        self
    }

    /// Freeze the registry.
    pub fn build(self, config: DispatchConfig) -> Application {
        Application {
            name: self.name,
            lambdas: self.lambdas,
            entries: self.entries,
            router: self.router,
            config,
        }
    }
}

/// Result of handling one raw event.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Recognized source, or `None` if the event could not be normalized.
    pub source: Option<EventSource>,
    pub outcome: Outcome,
}

/// An immutable set of lambdas, routes and middleware. Share it with `Arc`.
pub struct Application {
    name: String,
    lambdas: Vec<Lambda>,
    entries: Vec<AppEntry>,
    router: Router,
    config: DispatchConfig,
}

impl Application {
    /// Start building an application. Names may only contain `A-Z a-z 0-9 - _`.
    pub fn builder(name: &str) -> Result<ApplicationBuilder, RegistrationError> {
        check_identifier(name, "app name")?;
        Ok(ApplicationBuilder {
            name: name.to_string(),
            lambdas: Vec::new(),
            entries: Vec::new(),
            router: Router::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lambdas(&self) -> &[Lambda] {
        &self.lambdas
    }

    pub fn lambda(&self, name: &str) -> Option<&Lambda> {
        self.lambdas.iter().find(|l| l.name() == name)
    }

    pub fn entries(&self) -> &[AppEntry] {
        &self.entries
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Run an already normalized request through the chain.
    pub async fn dispatch(&self, req: Request) -> Outcome {
        ChainExecutor::new(self).dispatch(req).await
    }

    /// Normalize a raw event and dispatch it.
    ///
    /// Events that cannot be normalized produce a bad-request outcome without running any entry.
    /// The source is kept whenever the event was recognized, so a gateway request with a bad
    /// body is still answered as a gateway response.
    pub async fn handle_event(&self, raw: &Value, ctx: &InvocationContext) -> Invocation {
        let event = match InboundEvent::classify(raw) {
            Ok(event) => event,
            Err(err) => return rejected(None, err, ctx),
        };
        let source = event.source();

        let normalizer = EventNormalizer::new(&self.router, &self.config.default_environment);
        let request = normalizer
            .normalize_event(event, raw, ctx)
            .and_then(Request::from_fields);

        match request {
            Ok(req) => Invocation {
                source: Some(source),
                outcome: self.dispatch(req).await,
            },
            Err(err) => rejected(Some(source), err, ctx),
        }
    }
}

fn rejected(
    source: Option<EventSource>,
    err: NormalizationError,
    ctx: &InvocationContext,
) -> Invocation {
    warn!(error = %err, ?source, request_id = ?ctx.request_id, "Failed to normalize event");
    Invocation {
        source,
        outcome: Outcome::from_error(err.into()),
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("name", &self.name)
            .field("lambdas", &self.lambdas)
            .field("entries", &self.entries)
            .field("routes", &self.router.len())
            .finish()
    }
}
