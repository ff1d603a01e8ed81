// Sequential execution of application and lambda entries for one request
//
// Entries run strictly one after another against a single Response. An entry hands control on
// by returning the `Next` token it got from the response; finalizing also continues, so
// trailing entries can inspect (not undo) the result.

use crate::application::{AppEntry, Application};
use crate::error::Error;
use crate::handler::Handler;
use crate::lambda::EntryKind;
use crate::request::Request;
use crate::response::{Outcome, Response};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, trace};

/// Runs the chain of an [`Application`].
#[derive(Debug, Clone, Copy)]
pub struct ChainExecutor<'a> {
    app: &'a Application,
}

impl<'a> ChainExecutor<'a> {
    pub fn new(app: &'a Application) -> Self {
        Self { app }
    }

    /// Dispatch `req` and return its single outcome.
    ///
    /// Lambdas without a route for the request are skipped. If nothing finalizes the response,
    /// the outcome is a not-found error with no body.
    pub async fn dispatch(&self, mut req: Request) -> Outcome {
        let config = self.app.config();
        if config.log_requests {
            debug!(
                method = %req.method(),
                path = req.path(),
                environment = req.environment(),
                invocation = ?req.invocation_ref(),
                "Dispatching request"
            );
        }

        // At most one route can match, so resolve once up front.
        let target = self
            .app
            .router()
            .resolve(req.method(), req.path())
            .map(|m| {
                let target = (m.route.lambda_index(), m.route.entry_index());
                req.merge_params(m.params);
                target
            });

        let mut res = Response::new();

        for entry in self.app.entries() {
            match entry {
                AppEntry::Middleware(handler) => {
                    run_entry(handler.as_ref(), &mut req, &mut res).await;
                }
                AppEntry::Lambda(index) => {
                    let route_entry = match target {
                        Some((lambda, route_entry)) if lambda == *index => route_entry,
                        _ => continue,
                    };
                    let lambda = &self.app.lambdas()[*index];
                    if res.is_done() {
                        trace!(lambda = lambda.name(), "Response already final; skipping lambda");
                        continue;
                    }
                    trace!(lambda = lambda.name(), "Running lambda");

                    for (position, lambda_entry) in lambda.entries().iter().enumerate() {
                        let runs = match lambda_entry.kind() {
                            EntryKind::Middleware => true,
                            EntryKind::Route { .. } => position == route_entry,
                        };
                        if runs {
                            run_entry(lambda_entry.handler(), &mut req, &mut res).await;
                        }
                    }
                }
            }
        }

        if !res.is_done() {
            trace!(method = %req.method(), path = req.path(), "No entry finalized the response");
            let _ = res.fail(Error::not_found(None));
        }

        if config.is_production(req.environment()) {
            res.redact();
        }

        let outcome = res.into_outcome();
        if config.log_requests {
            debug!(
                status = outcome.status_code,
                error = outcome.error.is_some(),
                "Dispatch complete"
            );
        }
        outcome
    }
}

/// Run a single entry. Errors and panics become an error finalization, or are dropped if the
/// response is already final.
async fn run_entry(handler: &dyn Handler, req: &mut Request, res: &mut Response) {
    let result = AssertUnwindSafe(handler.call(req, res))
        .catch_unwind()
        .await;

    let failure = match result {
        Ok(Ok(_next)) => return,
        Ok(Err(err)) => err,
        Err(panic) => {
            let err = Error::from_panic(panic);
            error!(error = %err, "Handler panicked");
            err
        }
    };

    if res.is_done() {
        error!(error = %failure, "Entry failed after the response was finalized; dropping error");
        res.record_violation();
    } else {
        let _ = res.fail(failure);
    }
}
