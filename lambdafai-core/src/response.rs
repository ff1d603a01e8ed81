//! The response threaded through a handler chain, and the outcome it finalizes into.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::error;

const CONTENT_TYPE: &str = "Content-Type";
const LOCATION: &str = "Location";

/// Proof that a handler either finalized the response or passed control on.
///
/// Only [`Response`] can create one, so every handler has to go through it to return.
#[must_use = "return the Next token from the handler to continue the chain"]
#[derive(Debug)]
pub struct Next {
    _private: (),
}

impl Next {
    fn new() -> Self {
        Self { _private: () }
    }
}

/// Mutable per-request response. Finalized at most once.
#[derive(Debug, Default)]
pub struct Response {
    done: bool,
    error: Option<Error>,
    body: Option<Value>,
    status: Option<u16>,
    headers: HashMap<String, String>,
    violations: usize,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once some entry has finalized the response.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Amend the finalized body, e.g. from trailing middleware. Finality is unaffected.
    pub fn body_mut(&mut self) -> Option<&mut Value> {
        self.body.as_mut()
    }

    /// Status the response will carry: the error's status, the explicit status, or 200.
    pub fn status_code(&self) -> u16 {
        match &self.error {
            Some(error) => error.status_code(),
            None => self.status.unwrap_or(200),
        }
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Explicit status for the success path.
    pub fn set_status(&mut self, status: u16) -> &mut Self {
        if self.done {
            error!(status, "set_status called on a finalized response; ignoring");
            self.violations += 1;
        } else {
            self.status = Some(status);
        }
        self
    }

    /// Number of rejected attempts to finalize an already finalized response.
    pub fn completion_violations(&self) -> usize {
        self.violations
    }

    /// Finalize with either an error or a body, then continue the chain.
    ///
    /// A second finalization is logged and ignored.
    pub fn finalize(&mut self, error: Option<Error>, body: Option<Value>) -> Next {
        if self.done {
            self.violations += 1;
            error!(
                status = self.status_code(),
                "finalize called more than once on a response; ignoring"
            );
            return Next::new();
        }
        self.done = true;
        match error {
            Some(error) => self.error = Some(error),
            None => self.body = body,
        }
        Next::new()
    }

    /// Finalize successfully with `body`.
    pub fn send(&mut self, body: impl Into<Value>) -> Next {
        self.finalize(None, Some(body.into()))
    }

    /// Serialize `body` and finalize with it. Serialization failures finalize with a server error.
    pub fn send_json<T: Serialize>(&mut self, body: &T) -> Next {
        match serde_json::to_value(body) {
            Ok(value) => self.finalize(None, Some(value)),
            Err(err) => self.fail(Error::wrap(err)),
        }
    }

    pub fn fail(&mut self, error: Error) -> Next {
        self.finalize(Some(error), None)
    }

    /// Finalize with `302 Found` and a `Location` header.
    pub fn redirect(&mut self, location: impl Into<String>) -> Next {
        self.redirect_with_status(302, location)
    }

    pub fn redirect_with_status(&mut self, status: u16, location: impl Into<String>) -> Next {
        if !self.done {
            self.status = Some(status);
            self.headers.insert(LOCATION.to_string(), location.into());
        }
        self.finalize(None, None)
    }

    /// Hand control to the next entry without finalizing.
    pub fn pass_through(&mut self) -> Next {
        Next::new()
    }

    pub(crate) fn record_violation(&mut self) {
        self.violations += 1;
    }

    pub(crate) fn redact(&mut self) {
        if let Some(error) = self.error.as_mut() {
            error.redact();
        }
    }

    pub(crate) fn into_outcome(self) -> Outcome {
        Outcome {
            status_code: self.status_code(),
            headers: self.headers,
            error: self.error,
            body: self.body,
            completion_violations: self.violations,
        }
    }
}

/// Final result of one dispatch: `(error, body)` plus status and headers.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub error: Option<Error>,
    pub body: Option<Value>,
    /// Times an entry tried to finalize an already final response.
    pub completion_violations: usize,
}

impl Outcome {
    /// Outcome for a request that failed before reaching any handler.
    pub fn from_error(error: Error) -> Self {
        Self {
            status_code: error.status_code(),
            headers: HashMap::new(),
            error: Some(error),
            body: None,
            completion_violations: 0,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE))
            .map(|(_, value)| value.as_str())
    }

    /// Shape the outcome the way an HTTP gateway expects it.
    pub fn into_gateway_response(self) -> GatewayResponse {
        let raw_text = self
            .content_type()
            .map(|ct| !ct.to_ascii_lowercase().contains("json"))
            .unwrap_or(false);

        let body = match (&self.error, &self.body) {
            (Some(error), _) => Some(error.to_body().to_string()),
            (None, Some(Value::String(text))) if raw_text => Some(text.clone()),
            (None, Some(value)) => Some(value.to_string()),
            (None, None) => None,
        };

        let mut headers = self.headers;
        let has_content_type = headers.keys().any(|k| k.eq_ignore_ascii_case(CONTENT_TYPE));
        if body.is_some() && !raw_text && !has_content_type {
            headers.insert(CONTENT_TYPE.to_string(), "application/json".to_string());
        }

        GatewayResponse {
            status_code: self.status_code,
            body,
            headers,
        }
    }
}

/// Wire shape returned to an HTTP gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub headers: HashMap<String, String>,
}
