//! Classification and normalization of inbound trigger events.
//!
//! A raw invocation payload is tried against a fixed, ordered list of typed recognizers. Each
//! recognizer is a serde struct whose required fields are the shape it accepts, plus a few
//! value checks (an `eventSource`, a record count). The first recognizer that accepts the payload
//! wins and converts it into [`RequestFields`].
//!
//! | Order | Source                | Method                            | Path                        |
//! |-------|-----------------------|-----------------------------------|-----------------------------|
//! | 1     | HTTP gateway proxy    | request verb                      | concrete request path       |
//! | 2     | Object created        | `OBJECT_PUT`                      | `/` + object key            |
//! | 3     | Scheduled rule        | `SCHEDULED`                       | `/` + rule name             |
//! | 4     | Token authorizer      | `AUTHORIZER`                      | `/<verb>/<resource>`        |
//! | 5     | User directory        | `DIRECTORY_EVENT`                 | `/` + trigger source        |
//! | 6     | Table stream record   | `STREAM_INSERT` / `STREAM_MODIFY` | `/` + table name            |
//! | 7     | Log subscription      | `LOG_SUBSCRIPTION`                | `/` + subscription filter   |
//! | 8     | Queue batch           | `QUEUE_MESSAGE`                   | `/` + queue name            |
//! | 9     | Direct invocation     | `DIRECT_INVOKE`                   | as given                    |

use crate::error::NormalizationError;
use crate::method::Method;
use crate::paths;
use crate::request::{EventSource, RawContext, RequestFields};
use crate::router::Router;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use flate2::read::GzDecoder;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::io::Read;
use tracing::{trace, warn};

/// Metadata the hosting platform supplies alongside each event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: Option<String>,
    pub invoked_function_arn: Option<String>,
}

impl InvocationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_function_arn(mut self, arn: impl Into<String>) -> Self {
        self.invoked_function_arn = Some(arn.into());
        self
    }
}

/// Environment (alias) of an invoked function ARN:
/// `arn:aws:lambda:<region>:<account>:function:<name>:<alias>`.
pub fn environment_from_function_arn(arn: &str) -> Result<&str, NormalizationError> {
    if arn.starts_with("arn:aws:lambda:") {
        if let Some(alias) = arn.split(':').nth(7) {
            if !alias.is_empty() {
                return Ok(alias);
            }
        }
    }
    Err(NormalizationError::MalformedArn(arn.to_string()))
}

// ===== Recognized shapes =====

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpEvent {
    pub http_method: String,
    pub resource: String,
    pub path: String,
    pub request_context: GatewayRequestContext,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub path_parameters: Option<HashMap<String, String>>,
    #[serde(default)]
    pub stage_variables: Option<HashMap<String, String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayRequestContext {
    pub stage: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Records<R> {
    records: Vec<R>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectCreatedRecord {
    pub event_source: String,
    pub event_name: String,
    pub s3: ObjectEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectEntity {
    pub bucket: Bucket,
    pub object: StoredObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoredObject {
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduledEvent {
    #[serde(rename = "detail-type")]
    pub detail_type: String,
    pub source: String,
    pub resources: Vec<String>,
    #[serde(default)]
    pub detail: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub authorization_token: String,
    pub method_arn: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEvent {
    pub user_pool_id: String,
    pub trigger_source: String,
    pub request: Map<String, Value>,
    pub response: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRecord {
    pub event_name: String,
    #[serde(rename = "eventSourceARN")]
    pub event_source_arn: String,
    pub dynamodb: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSubscriptionEvent {
    pub awslogs: AwsLogs,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsLogs {
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRecord {
    pub message_id: String,
    pub event_source: String,
    #[serde(rename = "eventSourceARN")]
    pub event_source_arn: String,
    pub body: String,
    #[serde(default)]
    pub attributes: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectInvokeEvent {
    pub method: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub body: Value,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub query: HashMap<String, String>,
}

/// A raw payload classified by shape.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    Http(HttpEvent),
    ObjectCreated(ObjectCreatedRecord),
    Scheduled(ScheduledEvent),
    Authorizer(AuthorizerEvent),
    Directory(DirectoryEvent),
    Stream(StreamRecord),
    LogSubscription(LogSubscriptionEvent),
    Queue(Vec<QueueRecord>),
    DirectInvoke(DirectInvokeEvent),
}

fn shape<T: DeserializeOwned>(raw: &Value) -> Option<T> {
    T::deserialize(raw).ok()
}

fn single<R>(records: Records<R>) -> Option<R> {
    let mut records = records.records;
    if records.len() == 1 { records.pop() } else { None }
}

impl InboundEvent {
    /// Classify a payload, trying each recognizer in order.
    pub fn classify(raw: &Value) -> Result<Self, NormalizationError> {
        if !raw.is_object() {
            return Err(NormalizationError::Unrecognized);
        }

        if let Some(event) = shape::<HttpEvent>(raw) {
            return Ok(InboundEvent::Http(event));
        }

        if let Some(record) = shape::<Records<ObjectCreatedRecord>>(raw).and_then(single) {
            if record.event_source == "aws:s3" && record.event_name.starts_with("ObjectCreated:") {
                return Ok(InboundEvent::ObjectCreated(record));
            }
        }

        if let Some(event) = shape::<ScheduledEvent>(raw) {
            if event.detail_type == "Scheduled Event"
                && event.source == "aws.events"
                && event.resources.len() == 1
            {
                return Ok(InboundEvent::Scheduled(event));
            }
        }

        if let Some(event) = shape::<AuthorizerEvent>(raw) {
            return Ok(InboundEvent::Authorizer(event));
        }

        if let Some(event) = shape::<DirectoryEvent>(raw) {
            return Ok(InboundEvent::Directory(event));
        }

        if let Some(record) = shape::<Records<StreamRecord>>(raw).and_then(single) {
            if record.event_name == "INSERT" || record.event_name == "MODIFY" {
                return Ok(InboundEvent::Stream(record));
            }
        }

        if let Some(event) = shape::<LogSubscriptionEvent>(raw) {
            return Ok(InboundEvent::LogSubscription(event));
        }

        if let Some(records) = shape::<Records<QueueRecord>>(raw).map(|r| r.records) {
            if let Some(first) = records.first() {
                let queue = &first.event_source_arn;
                if records
                    .iter()
                    .all(|r| r.event_source == "aws:sqs" && &r.event_source_arn == queue)
                {
                    return Ok(InboundEvent::Queue(records));
                }
            }
        }

        if let Some(event) = shape::<DirectInvokeEvent>(raw) {
            if event.method.eq_ignore_ascii_case(Method::DirectInvoke.as_str()) {
                return Ok(InboundEvent::DirectInvoke(event));
            }
        }

        Err(NormalizationError::Unrecognized)
    }

    pub fn source(&self) -> EventSource {
        match self {
            InboundEvent::Http(_) => EventSource::HttpGateway,
            InboundEvent::ObjectCreated(_) => EventSource::ObjectStorage,
            InboundEvent::Scheduled(_) => EventSource::Scheduled,
            InboundEvent::Authorizer(_) => EventSource::Authorizer,
            InboundEvent::Directory(_) => EventSource::Directory,
            InboundEvent::Stream(_) => EventSource::ChangeStream,
            InboundEvent::LogSubscription(_) => EventSource::LogSubscription,
            InboundEvent::Queue(_) => EventSource::Queue,
            InboundEvent::DirectInvoke(_) => EventSource::DirectInvoke,
        }
    }

    /// Convert into request fields. `raw` is the original payload, kept as the body by the
    /// sources that pass the whole event through.
    pub fn into_fields(self, raw: &Value) -> Result<RequestFields, NormalizationError> {
        let source = self.source();
        match self {
            InboundEvent::Http(event) => http_fields(event),

            InboundEvent::ObjectCreated(record) => {
                let key = decode_object_key(&record.s3.object.key)?;
                let mut fields =
                    RequestFields::new(Method::ObjectPut, format!("/{}", key), source);
                fields.body = json!({
                    "bucket": record.s3.bucket.name,
                    "size": record.s3.object.size,
                });
                Ok(fields)
            }

            InboundEvent::Scheduled(event) => {
                let arn = &event.resources[0];
                let rule = arn
                    .rsplit('/')
                    .next()
                    .filter(|rule| !rule.is_empty() && rule.len() < arn.len())
                    .ok_or_else(|| NormalizationError::MalformedArn(arn.clone()))?;
                let mut fields =
                    RequestFields::new(Method::Scheduled, format!("/{}", rule), source);
                fields.body = event.detail;
                Ok(fields)
            }

            InboundEvent::Authorizer(event) => {
                let path = authorizer_path(&event.method_arn)?;
                let mut fields = RequestFields::new(Method::Authorizer, path, source);
                fields
                    .headers
                    .insert("Authorization".to_string(), event.authorization_token);
                fields.body = raw.clone();
                Ok(fields)
            }

            InboundEvent::Directory(event) => {
                let mut fields = RequestFields::new(
                    Method::DirectoryEvent,
                    format!("/{}", event.trigger_source),
                    source,
                );
                fields.body = raw.clone();
                Ok(fields)
            }

            InboundEvent::Stream(record) => {
                let method = if record.event_name == "INSERT" {
                    Method::StreamInsert
                } else {
                    Method::StreamModify
                };
                let table = table_name(&record.event_source_arn)?;
                let mut fields = RequestFields::new(method, format!("/{}", table), source);
                fields.body = record.dynamodb;
                Ok(fields)
            }

            InboundEvent::LogSubscription(event) => {
                let batch = decode_log_batch(&event.awslogs.data)?;
                let filter = batch
                    .get("subscriptionFilters")
                    .and_then(|f| f.get(0))
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        NormalizationError::MalformedLogPayload(
                            "missing subscription filter".to_string(),
                        )
                    })?
                    .to_string();
                let mut fields =
                    RequestFields::new(Method::LogSubscription, format!("/{}", filter), source);
                fields.body = batch;
                Ok(fields)
            }

            InboundEvent::Queue(records) => {
                let arn = &records[0].event_source_arn;
                let queue = arn
                    .rsplit(':')
                    .next()
                    .filter(|name| !name.is_empty() && name.len() < arn.len())
                    .ok_or_else(|| NormalizationError::MalformedArn(arn.clone()))?
                    .to_string();
                let messages = records
                    .into_iter()
                    .map(|record| {
                        let body = serde_json::from_str(&record.body)
                            .unwrap_or(Value::String(record.body));
                        json!({
                            "messageId": record.message_id,
                            "body": body,
                            "attributes": record.attributes,
                        })
                    })
                    .collect();
                let mut fields =
                    RequestFields::new(Method::QueueMessage, format!("/{}", queue), source);
                fields.body = Value::Array(messages);
                Ok(fields)
            }

            InboundEvent::DirectInvoke(event) => {
                let path = event
                    .path
                    .filter(|p| !p.is_empty())
                    .ok_or(NormalizationError::MissingField("path"))?;
                let mut fields = RequestFields::new(Method::DirectInvoke, path, source);
                fields.body = event.body;
                fields.headers = event.headers;
                fields.query = event.query;
                Ok(fields)
            }
        }
    }
}

fn http_fields(event: HttpEvent) -> Result<RequestFields, NormalizationError> {
    let method: Method = event
        .http_method
        .parse()
        .map_err(|_| NormalizationError::UnsupportedMethod(event.http_method.clone()))?;
    if !method.is_http() {
        return Err(NormalizationError::UnsupportedMethod(event.http_method));
    }

    let headers = event.headers.unwrap_or_default();
    let content_type = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("Content-Type"))
        .map(|(_, value)| value.as_str());
    let body = parse_body(
        event.body.as_deref(),
        event.is_base64_encoded.unwrap_or(false),
        content_type,
    )?;

    let claims = event
        .request_context
        .rest
        .get("authorizer")
        .and_then(|a| a.get("claims"))
        .cloned()
        .unwrap_or(Value::Null);
    let environment = event.request_context.stage.clone();
    let mut request_context = event.request_context.rest;
    request_context.insert(
        "stage".to_string(),
        Value::String(event.request_context.stage),
    );

    let mut fields = RequestFields::new(method, event.path, EventSource::HttpGateway);
    fields.headers = headers;
    fields.params = event.path_parameters.unwrap_or_default();
    fields.query = event.query_string_parameters.unwrap_or_default();
    fields.body = body;
    fields.environment = environment;
    fields.raw_context = RawContext {
        stage_variables: event.stage_variables.unwrap_or_default(),
        request_context: Value::Object(request_context),
        claims,
    };
    Ok(fields)
}

/// Decode an HTTP body according to its content type.
///
/// JSON and form bodies are parsed; anything else stays a string. No body is `Null`. A base64
/// body that does not decode to UTF-8 text (an image upload, say) is kept as its base64 text.
pub fn parse_body(
    body: Option<&str>,
    is_base64: bool,
    content_type: Option<&str>,
) -> Result<Value, NormalizationError> {
    let Some(body) = body else {
        return Ok(Value::Null);
    };

    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();
    let structured = mime == "application/json"
        || mime.ends_with("+json")
        || mime == "application/x-www-form-urlencoded";

    let text = if is_base64 {
        let bytes = BASE64
            .decode(body)
            .map_err(|e| NormalizationError::MalformedBody(format!("invalid base64: {}", e)))?;
        match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) if structured => {
                return Err(NormalizationError::MalformedBody(format!("invalid UTF-8: {}", e)));
            }
            Err(_) => return Ok(Value::String(body.to_string())),
        }
    } else {
        body.to_string()
    };

    if mime == "application/json" || mime.ends_with("+json") {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| NormalizationError::MalformedBody(e.to_string()))
    } else if mime == "application/x-www-form-urlencoded" {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(&text)
            .map_err(|e| NormalizationError::MalformedBody(e.to_string()))?;
        Ok(Value::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
        ))
    } else {
        Ok(Value::String(text))
    }
}

/// Object keys arrive form-encoded: `+` is a space, `%XX` an escaped byte.
fn decode_object_key(key: &str) -> Result<String, NormalizationError> {
    urlencoding::decode(&key.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|e| NormalizationError::MalformedBody(format!("object key: {}", e)))
}

/// `arn:aws:execute-api:<region>:<account>:<api-id>/<stage>/<verb>/<resource...>`
/// becomes `/<verb>/<resource...>`
fn authorizer_path(method_arn: &str) -> Result<String, NormalizationError> {
    let resource = method_arn.rsplit(':').next().unwrap_or_default();
    let parts: Vec<&str> = resource.split('/').skip(2).collect();
    if parts.is_empty() || parts[0].is_empty() {
        return Err(NormalizationError::MalformedArn(method_arn.to_string()));
    }
    Ok(format!("/{}", parts.join("/")))
}

/// `arn:aws:dynamodb:<region>:<account>:table/<name>/stream/<label>` → `<name>`
fn table_name(arn: &str) -> Result<&str, NormalizationError> {
    arn.split_once("table/")
        .and_then(|(_, rest)| rest.split('/').next())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| NormalizationError::MalformedArn(arn.to_string()))
}

/// Log subscription data is base64 of gzip of JSON.
fn decode_log_batch(data: &str) -> Result<Value, NormalizationError> {
    let malformed =
        |e: &dyn std::fmt::Display| NormalizationError::MalformedLogPayload(e.to_string());

    let compressed = BASE64.decode(data).map_err(|e| malformed(&e))?;
    let mut json = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut json)
        .map_err(|e| malformed(&e))?;
    serde_json::from_str(&json).map_err(|e| malformed(&e))
}

/// Converts raw events into request fields for one application.
#[derive(Debug, Clone, Copy)]
pub struct EventNormalizer<'a> {
    router: &'a Router,
    default_environment: &'a str,
}

impl<'a> EventNormalizer<'a> {
    pub fn new(router: &'a Router, default_environment: &'a str) -> Self {
        Self {
            router,
            default_environment,
        }
    }

    /// Normalize a raw payload.
    ///
    /// Non-HTTP sources take their environment from the invoked function's alias and their path
    /// parameters from the registered route matching the synthesized path.
    pub fn normalize(
        &self,
        raw: &Value,
        ctx: &InvocationContext,
    ) -> Result<RequestFields, NormalizationError> {
        let event = InboundEvent::classify(raw)?;
        self.normalize_event(event, raw, ctx)
    }

    /// Normalize an already classified payload. `raw` must be the payload `event` came from.
    pub fn normalize_event(
        &self,
        event: InboundEvent,
        raw: &Value,
        ctx: &InvocationContext,
    ) -> Result<RequestFields, NormalizationError> {
        let source = event.source();
        trace!(?source, "Classified inbound event");

        let mut fields = event.into_fields(raw)?;
        fields.invocation_ref = ctx.invoked_function_arn.clone();

        if source != EventSource::HttpGateway {
            fields.environment = self.environment_for(ctx);
            if let Some(route) = self.router.find(fields.method, &fields.path) {
                if let Some(bound) = paths::match_path(route.template(), &fields.path) {
                    for (name, value) in bound {
                        fields.params.entry(name).or_insert(value);
                    }
                }
            }
        }

        if fields.path.is_empty() {
            return Err(NormalizationError::MissingField("path"));
        }
        Ok(fields)
    }

    fn environment_for(&self, ctx: &InvocationContext) -> String {
        match ctx.invoked_function_arn.as_deref() {
            Some(arn) => match environment_from_function_arn(arn) {
                Ok(environment) => environment.to_string(),
                Err(_) => {
                    warn!(arn, "Unable to parse environment from function ARN; using default");
                    self.default_environment.to_string()
                }
            },
            None => {
                warn!("No function ARN in invocation context; using default environment");
                self.default_environment.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_function_arn() {
        assert_eq!(
            environment_from_function_arn(
                "arn:aws:lambda:us-east-1:12345678:function:hello-world-hello:dev"
            ),
            Ok("dev")
        );
        assert!(
            environment_from_function_arn("arn:aws:lambda:us-east-1:12345678:function:hello")
                .is_err()
        );
        assert!(environment_from_function_arn("not-an-arn").is_err());
    }

    #[test]
    fn test_parse_body_by_content_type() {
        assert_eq!(parse_body(None, false, None).unwrap(), Value::Null);
        assert_eq!(
            parse_body(Some(r#"{"a":1}"#), false, Some("application/json; charset=utf-8"))
                .unwrap(),
            json!({"a": 1})
        );
        assert_eq!(
            parse_body(Some("a=1&b=two+words"), false, Some("application/x-www-form-urlencoded"))
                .unwrap(),
            json!({"a": "1", "b": "two words"})
        );
        assert_eq!(
            parse_body(Some(r#"{"a":1}"#), false, None).unwrap(),
            json!(r#"{"a":1}"#)
        );
    }

    #[test]
    fn test_parse_body_base64() {
        let encoded = BASE64.encode(r#"{"size":"large"}"#);
        assert_eq!(
            parse_body(Some(&encoded), true, Some("application/json")).unwrap(),
            json!({"size": "large"})
        );
    }

    #[test]
    fn test_parse_body_binary_base64_stays_encoded() {
        let encoded = BASE64.encode([0xff_u8, 0xd8, 0xff, 0xe0]);
        assert_eq!(
            parse_body(Some(&encoded), true, Some("image/jpeg")).unwrap(),
            Value::String(encoded.clone())
        );
        assert_eq!(
            parse_body(Some(&encoded), true, None).unwrap(),
            Value::String(encoded.clone())
        );
        assert!(matches!(
            parse_body(Some(&encoded), true, Some("application/json")),
            Err(NormalizationError::MalformedBody(_))
        ));

        let text = BASE64.encode("plain text");
        assert_eq!(
            parse_body(Some(&text), true, Some("text/plain")).unwrap(),
            json!("plain text")
        );
    }

    #[test]
    fn test_parse_body_malformed_json() {
        assert!(matches!(
            parse_body(Some("{nope"), false, Some("application/json")),
            Err(NormalizationError::MalformedBody(_))
        ));
    }

    #[test]
    fn test_authorizer_path() {
        assert_eq!(
            authorizer_path("arn:aws:execute-api:us-east-1:123456789012:abcdef/dev/GET/auth")
                .unwrap(),
            "/GET/auth"
        );
        assert_eq!(
            authorizer_path("arn:aws:execute-api:us-east-1:123456789012/dev/POST/a/b").unwrap(),
            "/POST/a/b"
        );
        assert!(authorizer_path("arn:aws:execute-api:us-east-1:1:abcdef/dev").is_err());
    }

    #[test]
    fn test_table_name() {
        assert_eq!(
            table_name("arn:aws:dynamodb:us-west-2:account-id:table/T/stream/2015-06-27T00:48:05")
                .unwrap(),
            "T"
        );
        assert!(table_name("arn:aws:dynamodb:us-west-2:account-id:stream").is_err());
    }

    #[test]
    fn test_decode_object_key() {
        assert_eq!(
            decode_object_key("uploads/Happy+Face%281%29.jpg").unwrap(),
            "uploads/Happy Face(1).jpg"
        );
    }

    #[test]
    fn test_non_objects_are_unrecognized() {
        assert!(matches!(
            InboundEvent::classify(&json!([1, 2])),
            Err(NormalizationError::Unrecognized)
        ));
        assert!(matches!(
            InboundEvent::classify(&json!({"hello": "world"})),
            Err(NormalizationError::Unrecognized)
        ));
    }
}
