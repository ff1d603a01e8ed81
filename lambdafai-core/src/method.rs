// Request methods: HTTP verbs plus synthetic event-kind tags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The `method` of a canonical request.
///
/// HTTP-gateway events carry a real verb; every other trigger source is mapped onto a synthetic
/// tag so that all events can be routed by `(method, path)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Options,
    Patch,
    Head,
    /// Object-storage creation notification.
    ObjectPut,
    /// Scheduled rule trigger.
    Scheduled,
    /// Custom-authorizer token event.
    Authorizer,
    /// User-directory lifecycle trigger.
    DirectoryEvent,
    /// Change-data-capture record of a newly inserted item.
    StreamInsert,
    /// Change-data-capture record of a modified item.
    StreamModify,
    /// Log-subscription batch.
    LogSubscription,
    /// Message-queue batch.
    QueueMessage,
    /// Direct function invocation carrying its own method/path.
    DirectInvoke,
}

impl Method {
    pub const ALL: [Method; 16] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Options,
        Method::Patch,
        Method::Head,
        Method::ObjectPut,
        Method::Scheduled,
        Method::Authorizer,
        Method::DirectoryEvent,
        Method::StreamInsert,
        Method::StreamModify,
        Method::LogSubscription,
        Method::QueueMessage,
        Method::DirectInvoke,
    ];

    /// Canonical upper-case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::ObjectPut => "OBJECT_PUT",
            Method::Scheduled => "SCHEDULED",
            Method::Authorizer => "AUTHORIZER",
            Method::DirectoryEvent => "DIRECTORY_EVENT",
            Method::StreamInsert => "STREAM_INSERT",
            Method::StreamModify => "STREAM_MODIFY",
            Method::LogSubscription => "LOG_SUBSCRIPTION",
            Method::QueueMessage => "QUEUE_MESSAGE",
            Method::DirectInvoke => "DIRECT_INVOKE",
        }
    }

    /// True for methods that arrive through the HTTP gateway.
    pub fn is_http(&self) -> bool {
        matches!(
            self,
            Method::Get
                | Method::Post
                | Method::Put
                | Method::Delete
                | Method::Options
                | Method::Patch
                | Method::Head
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known method tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown method: {0}")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}
