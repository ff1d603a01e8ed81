// Application-wide route table with registration-time conflict detection
//
// At most one route can match any (method, path): conflicting templates are rejected when they
// are registered, so lookup order never decides which handler runs.

use crate::error::RegistrationError;
use crate::method::Method;
use crate::paths::{self, Params};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Deployment-facing options attached to a route. Not interpreted during dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorizer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integration_type: Option<String>,
    #[serde(default)]
    pub cors: bool,
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authorization_type(mut self, value: impl Into<String>) -> Self {
        self.authorization_type = Some(value.into());
        self
    }

    /// Reference to a custom authorizer guarding this route.
    pub fn authorizer_id(mut self, value: impl Into<String>) -> Self {
        self.authorizer_id = Some(value.into());
        self
    }

    pub fn integration_type(mut self, value: impl Into<String>) -> Self {
        self.integration_type = Some(value.into());
        self
    }

    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }
}

/// A registered route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    method: Method,
    template: String,
    options: RouteOptions,
    lambda: usize,
    lambda_name: String,
    entry: usize,
}

impl Route {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn options(&self) -> &RouteOptions {
        &self.options
    }

    /// Name of the lambda owning this route.
    pub fn lambda_name(&self) -> &str {
        &self.lambda_name
    }

    pub(crate) fn lambda_index(&self) -> usize {
        self.lambda
    }

    /// Position of the route among its lambda's entries.
    pub fn entry_index(&self) -> usize {
        self.entry
    }
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: Params,
}

/// Every route of an application, across all lambdas.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route owned by `lambda_name` (at position `lambda`) as its `entry`-th entry.
    ///
    /// Fails if the template is malformed or conflicts with a route of the same method.
    pub fn register(
        &mut self,
        lambda: usize,
        lambda_name: &str,
        entry: usize,
        method: Method,
        template: &str,
        options: RouteOptions,
    ) -> Result<&Route, RegistrationError> {
        validate_template(template)?;

        if let Some(existing) = self
            .routes
            .iter()
            .find(|r| r.method == method && paths::conflicts(&r.template, template))
        {
            return Err(RegistrationError::RouteConflict {
                method,
                existing: existing.template.clone(),
                new: template.to_string(),
            });
        }

        debug!(lambda = lambda_name, %method, template, "Registered route");

        self.routes.push(Route {
            method,
            template: template.to_string(),
            options,
            lambda,
            lambda_name: lambda_name.to_string(),
            entry,
        });
        Ok(&self.routes[self.routes.len() - 1])
    }

    /// The route matching `(method, path)`, with its bindings.
    pub fn resolve(&self, method: Method, path: &str) -> Option<RouteMatch<'_>> {
        let found = self
            .routes
            .iter()
            .filter(|r| r.method == method)
            .find_map(|route| {
                paths::match_path(&route.template, path).map(|params| RouteMatch { route, params })
            });

        match &found {
            Some(m) => trace!(%method, path, template = %m.route.template, "Route resolved"),
            None => trace!(%method, path, "No route matched"),
        }
        found
    }

    /// The route matching `(method, path)`.
    pub fn find(&self, method: Method, path: &str) -> Option<&Route> {
        self.resolve(method, path).map(|m| m.route)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn validate_template(template: &str) -> Result<(), RegistrationError> {
    let invalid = |reason| RegistrationError::InvalidTemplate {
        template: template.to_string(),
        reason,
    };

    if !template.starts_with('/') {
        return Err(invalid("must start with '/'"));
    }

    let mut seen = HashSet::new();
    for name in paths::placeholders(template) {
        if !seen.insert(name) {
            return Err(invalid("placeholder names must be unique"));
        }
    }
    Ok(())
}
