// Error types for the Lambdafai dispatch engine

use crate::Method;
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use thiserror::Error;

/// Result type for handler and dispatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Closed set of error kinds a request can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    ServerError,
    ServiceUnavailable,
}

impl ErrorKind {
    /// Get the HTTP status code for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::ServerError => 500,
            ErrorKind::ServiceUnavailable => 503,
        }
    }

    /// Map a status code back onto a kind.
    pub fn from_status(code: u16) -> Option<Self> {
        match code {
            400 => Some(ErrorKind::BadRequest),
            401 => Some(ErrorKind::Unauthorized),
            403 => Some(ErrorKind::Forbidden),
            404 => Some(ErrorKind::NotFound),
            409 => Some(ErrorKind::Conflict),
            500 => Some(ErrorKind::ServerError),
            503 => Some(ErrorKind::ServiceUnavailable),
            _ => None,
        }
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

/// An error carried through the handler chain and out to the caller.
///
/// Renders as `HTTP <status>` or `HTTP <status>: <details>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    details: Option<Value>,
    trace: Option<String>,
}

impl Error {
    /// Create an error of the given kind.
    pub fn new(kind: ErrorKind, details: Option<Value>) -> Self {
        Self {
            kind,
            details,
            trace: None,
        }
    }

    pub fn bad_request(details: impl Into<Option<Value>>) -> Self {
        Self::new(ErrorKind::BadRequest, details.into())
    }

    pub fn unauthorized(details: impl Into<Option<Value>>) -> Self {
        Self::new(ErrorKind::Unauthorized, details.into())
    }

    pub fn forbidden(details: impl Into<Option<Value>>) -> Self {
        Self::new(ErrorKind::Forbidden, details.into())
    }

    pub fn not_found(details: impl Into<Option<Value>>) -> Self {
        Self::new(ErrorKind::NotFound, details.into())
    }

    pub fn conflict(details: impl Into<Option<Value>>) -> Self {
        Self::new(ErrorKind::Conflict, details.into())
    }

    pub fn server_error(details: impl Into<Option<Value>>) -> Self {
        Self::new(ErrorKind::ServerError, details.into())
    }

    pub fn service_unavailable(details: impl Into<Option<Value>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, details.into())
    }

    /// Create an error for a status code. Unknown codes become server errors.
    pub fn for_status(code: u16, details: impl Into<Option<Value>>) -> Self {
        let kind = ErrorKind::from_status(code).unwrap_or(ErrorKind::ServerError);
        Self::new(kind, details.into())
    }

    /// Attach a diagnostic trace.
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Wrap an arbitrary error as a server error.
    ///
    /// Wrapping is idempotent: a boxed [`Error`] comes back unchanged.
    pub fn wrap<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match error.into().downcast::<Error>() {
            Ok(error) => *error,
            Err(other) => {
                let mut trace = format!("{:?}", other);
                let mut source = other.source();
                while let Some(cause) = source {
                    trace.push_str(&format!("\ncaused by: {}", cause));
                    source = cause.source();
                }
                Self::server_error(Value::String(other.to_string())).with_trace(trace)
            }
        }
    }

    /// Convert a caught panic payload into a server error.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "handler panicked".to_string()
        };
        Self::server_error(Value::String(message.clone()))
            .with_trace(format!("panicked at handler: {}", message))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    /// Strip everything that must not leave a production environment.
    ///
    /// The trace always goes; server-class errors also lose their details.
    pub fn redact(&mut self) {
        self.trace = None;
        if self.kind.is_server_error() {
            self.details = None;
        }
    }

    /// Human-readable message, e.g. `HTTP 404: no such todo`.
    pub fn message(&self) -> String {
        match &self.details {
            None | Some(Value::Null) => format!("HTTP {}", self.status_code()),
            Some(Value::String(s)) => format!("HTTP {}: {}", self.status_code(), s),
            Some(other) => format!("HTTP {}: {}", self.status_code(), other),
        }
    }

    /// JSON body sent to callers: `message`, plus `details` and `trace` when present.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("message".to_string(), Value::String(self.message()));
        if let Some(details) = &self.details {
            body.insert("details".to_string(), details.clone());
        }
        if let Some(trace) = &self.trace {
            body.insert("trace".to_string(), Value::String(trace.clone()));
        }
        Value::Object(body)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for Error {}

/// Configuration-time failures. These are fatal: the application cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("\"{value}\" is not a valid {description} (must contain only A-Z, a-z, 0-9, -, _)")]
    InvalidIdentifier {
        value: String,
        description: &'static str,
    },

    #[error("Multiple {kind} are named \"{name}\" in application")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Invalid route template \"{template}\": {reason}")]
    InvalidTemplate {
        template: String,
        reason: &'static str,
    },

    #[error("Route conflict: {method} {existing} and {method} {new}")]
    RouteConflict {
        method: Method,
        existing: String,
        new: String,
    },
}

/// Failures converting a raw trigger event into a canonical request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("Unrecognized event shape")]
    Unrecognized,

    #[error("Normalized request is missing its {0}")]
    MissingField(&'static str),

    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Malformed log subscription payload: {0}")]
    MalformedLogPayload(String),

    #[error("Malformed ARN: {0}")]
    MalformedArn(String),
}

/// Invalid dispatch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: &'static str,
    },

    #[error("Failed to load configuration: {0}")]
    LoadError(String),
}

impl From<NormalizationError> for Error {
    fn from(err: NormalizationError) -> Self {
        Error::bad_request(Value::String(err.to_string()))
    }
}
