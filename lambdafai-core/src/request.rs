//! The canonical request handed to every middleware and handler.

use crate::error::NormalizationError;
use crate::extensions::Extensions;
use crate::method::Method;
use crate::paths::Params;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Which recognizer produced a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    HttpGateway,
    ObjectStorage,
    Scheduled,
    Authorizer,
    Directory,
    ChangeStream,
    LogSubscription,
    Queue,
    DirectInvoke,
}

/// Trigger-specific metadata carried along but never interpreted by the dispatch engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawContext {
    pub stage_variables: HashMap<String, String>,
    /// The gateway's raw `requestContext`, or `Null`.
    pub request_context: Value,
    /// Authorizer claims, or `Null`.
    pub claims: Value,
}

/// Output record of event normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestFields {
    pub method: Method,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub params: Params,
    pub query: HashMap<String, String>,
    pub body: Value,
    pub environment: String,
    pub invocation_ref: Option<String>,
    pub raw_context: RawContext,
    pub source: EventSource,
}

impl RequestFields {
    pub fn new(method: Method, path: impl Into<String>, source: EventSource) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            params: Params::new(),
            query: HashMap::new(),
            body: Value::Null,
            environment: String::new(),
            invocation_ref: None,
            raw_context: RawContext::default(),
            source,
        }
    }
}

/// A normalized, source-independent request.
///
/// Canonical fields are read-only once built. Values that middleware want to pass down the
/// chain go into [`Request::extensions_mut`].
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    headers: HashMap<String, String>,
    params: Params,
    query: HashMap<String, String>,
    body: Value,
    environment: String,
    invocation_ref: Option<String>,
    raw_context: RawContext,
    source: EventSource,
    extensions: Extensions,
}

impl Request {
    /// Build a request from normalized fields. Fails if the path is empty.
    pub fn from_fields(fields: RequestFields) -> Result<Self, NormalizationError> {
        if fields.path.is_empty() {
            return Err(NormalizationError::MissingField("path"));
        }
        Ok(Self {
            method: fields.method,
            path: fields.path,
            headers: fields.headers,
            params: fields.params,
            query: fields.query,
            body: fields.body,
            environment: fields.environment,
            invocation_ref: fields.invocation_ref,
            raw_context: fields.raw_context,
            source: fields.source,
            extensions: Extensions::new(),
        })
    }

    /// Start building a request directly, bypassing event normalization.
    pub fn builder(method: Method, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder {
            fields: RequestFields::new(method, path, EventSource::DirectInvoke),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Look up a header, trying the exact name first and then ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| {
                self.headers
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Deployment stage the invocation runs under, e.g. `dev`.
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Identifier of the underlying compute invocation, for diagnostics.
    pub fn invocation_ref(&self) -> Option<&str> {
        self.invocation_ref.as_deref()
    }

    pub fn raw_context(&self) -> &RawContext {
        &self.raw_context
    }

    pub fn source(&self) -> EventSource {
        self.source
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Add router bindings. Parameters already present on the request are kept.
    pub(crate) fn merge_params(&mut self, bound: Params) {
        for (name, value) in bound {
            self.params.entry(name).or_insert(value);
        }
    }
}

/// Builder for [`Request`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    fields: RequestFields,
}

impl RequestBuilder {
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.headers.insert(name.into(), value.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.params.insert(name.into(), value.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.query.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.fields.body = body;
        self
    }

    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.fields.environment = environment.into();
        self
    }

    pub fn invocation_ref(mut self, invocation_ref: impl Into<String>) -> Self {
        self.fields.invocation_ref = Some(invocation_ref.into());
        self
    }

    pub fn raw_context(mut self, raw_context: RawContext) -> Self {
        self.fields.raw_context = raw_context;
        self
    }

    pub fn source(mut self, source: EventSource) -> Self {
        self.fields.source = source;
        self
    }

    pub fn build(self) -> Result<Request, NormalizationError> {
        Request::from_fields(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_populates_fields() {
        let req = Request::builder(Method::Post, "/items/7")
            .header("Content-Type", "application/json")
            .param("id", "7")
            .query("verbose", "1")
            .body(json!({"name": "x"}))
            .environment("dev")
            .invocation_ref("arn:aws:lambda:us-east-1:1:function:f:dev")
            .build()
            .unwrap();

        assert_eq!(req.method(), Method::Post);
        assert_eq!(req.path(), "/items/7");
        assert_eq!(req.param("id"), Some("7"));
        assert_eq!(req.query_param("verbose"), Some("1"));
        assert_eq!(req.body()["name"], "x");
        assert_eq!(req.environment(), "dev");
        assert_eq!(req.source(), EventSource::DirectInvoke);
        assert!(req.invocation_ref().is_some());
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let err = Request::builder(Method::Get, "").build().unwrap_err();
        assert_eq!(err, NormalizationError::MissingField("path"));
    }

    #[test]
    fn test_header_lookup_falls_back_to_case_insensitive() {
        let req = Request::builder(Method::Get, "/")
            .header("Content-Type", "text/plain")
            .build()
            .unwrap();
        assert_eq!(req.header("Content-Type"), Some("text/plain"));
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.header("Accept"), None);
    }

    #[test]
    fn test_merge_params_keeps_existing() {
        let mut req = Request::builder(Method::Get, "/a/b")
            .param("x", "given")
            .build()
            .unwrap();
        let mut bound = Params::new();
        bound.insert("x".to_string(), "bound".to_string());
        bound.insert("y".to_string(), "b".to_string());
        req.merge_params(bound);
        assert_eq!(req.param("x"), Some("given"));
        assert_eq!(req.param("y"), Some("b"));
    }

    #[test]
    fn test_extensions_are_mutable() {
        let mut req = Request::builder(Method::Get, "/").build().unwrap();
        req.extensions_mut().insert(5u8);
        assert_eq!(req.extensions().get::<u8>(), Some(&5));
    }
}
