//! Normalization of real trigger payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::GzEncoder;
use lambdafai_core::{
    Application, DispatchConfig, EventNormalizer, EventSource, InvocationContext, Method,
    NormalizationError, RequestFields,
};
use serde_json::{Value, json};
use std::io::Write;
use tokio_test::assert_err;

const FUNCTION_ARN: &str = "arn:aws:lambda:us-east-1:12345678:function:hello-world-hello:dev";

fn app() -> Application {
    let mut app = Application::builder("test").unwrap();
    app.lambda("foo")
        .unwrap()
        .object_put("/uploads/:name", |_req, res| Box::pin(async move { Ok(res.send(1)) }))
        .unwrap()
        .scheduled("/my-schedule", |_req, res| Box::pin(async move { Ok(res.send(2)) }))
        .unwrap()
        .authorizer("/GET/auth", |_req, res| Box::pin(async move { Ok(res.send(3)) }))
        .unwrap()
        .queue_message("/:queue", |_req, res| Box::pin(async move { Ok(res.send(4)) }))
        .unwrap();
    app.build(DispatchConfig::default())
}

fn normalize(event: Value) -> Result<RequestFields, NormalizationError> {
    let app = app();
    let ctx = InvocationContext::new().with_function_arn(FUNCTION_ARN);
    EventNormalizer::new(app.router(), "fallback").normalize(&event, &ctx)
}

fn s3_event(event_name: &str, key: &str) -> Value {
    json!({
        "Records": [{
            "eventVersion": "2.0",
            "eventSource": "aws:s3",
            "awsRegion": "us-east-1",
            "eventName": event_name,
            "s3": {
                "configurationId": "testConfigRule",
                "object": { "key": key, "size": 1024, "eTag": "0123456789abcdef" },
                "bucket": { "arn": "arn:aws:s3:::sourcebucket", "name": "sourcebucket" },
                "s3SchemaVersion": "1.0"
            }
        }]
    })
}

fn api_gateway_event() -> Value {
    json!({
        "body": "{\"test\":\"body\"}",
        "resource": "/{proxy+}",
        "requestContext": {
            "resourceId": "123456",
            "apiId": "1234567890",
            "resourcePath": "/{proxy+}",
            "httpMethod": "POST",
            "requestId": "c6af9ac6-7b61-11e6-9a41-93e8deadbeef",
            "accountId": "123456789012",
            "identity": { "sourceIp": "127.0.0.1", "userAgent": "Custom User Agent String" },
            "stage": "prod"
        },
        "queryStringParameters": { "foo": "bar" },
        "headers": {
            "Accept": "text/html",
            "Host": "1234567890.execute-api.us-east-1.amazonaws.com",
            "User-Agent": "Custom User Agent String"
        },
        "pathParameters": { "proxy": "path/to/resource" },
        "httpMethod": "POST",
        "stageVariables": { "baz": "qux" },
        "path": "/path/to/resource"
    })
}

#[test]
fn converts_api_gateway_event() {
    let fields = normalize(api_gateway_event()).unwrap();

    assert_eq!(fields.source, EventSource::HttpGateway);
    assert_eq!(fields.method, Method::Post);
    assert_eq!(fields.path, "/path/to/resource");
    assert_eq!(fields.environment, "prod");
    assert_eq!(fields.headers["Host"], "1234567890.execute-api.us-east-1.amazonaws.com");
    assert_eq!(fields.params["proxy"], "path/to/resource");
    assert_eq!(fields.query["foo"], "bar");
    // No content type: the body stays a raw string.
    assert_eq!(fields.body, json!("{\"test\":\"body\"}"));
    assert_eq!(fields.raw_context.stage_variables["baz"], "qux");
    assert_eq!(fields.raw_context.request_context["stage"], "prod");
    assert_eq!(fields.raw_context.request_context["apiId"], "1234567890");
    assert_eq!(fields.raw_context.claims, Value::Null);
    assert_eq!(fields.invocation_ref.as_deref(), Some(FUNCTION_ARN));
}

#[test]
fn api_gateway_json_body_and_claims() {
    let mut event = api_gateway_event();
    event["headers"]["content-type"] = json!("application/json");
    event["requestContext"]["authorizer"] = json!({ "claims": { "sub": "user-1" } });

    let fields = normalize(event).unwrap();
    assert_eq!(fields.body, json!({"test": "body"}));
    assert_eq!(fields.raw_context.claims, json!({"sub": "user-1"}));
}

#[test]
fn api_gateway_null_maps_become_empty() {
    let mut event = api_gateway_event();
    event["headers"] = Value::Null;
    event["queryStringParameters"] = Value::Null;
    event["pathParameters"] = Value::Null;
    event["stageVariables"] = Value::Null;
    event["body"] = Value::Null;

    let fields = normalize(event).unwrap();
    assert!(fields.headers.is_empty());
    assert!(fields.query.is_empty());
    assert!(fields.params.is_empty());
    assert_eq!(fields.body, Value::Null);
}

#[test]
fn api_gateway_malformed_json_body_fails() {
    let mut event = api_gateway_event();
    event["headers"]["Content-Type"] = json!("application/json");
    event["body"] = json!("{not json");

    let err = assert_err!(normalize(event));
    assert!(matches!(err, NormalizationError::MalformedBody(_)));
}

#[test]
fn api_gateway_unknown_verb_fails() {
    let mut event = api_gateway_event();
    event["httpMethod"] = json!("TRACE");

    assert_eq!(
        normalize(event).unwrap_err(),
        NormalizationError::UnsupportedMethod("TRACE".to_string())
    );
}

#[test]
fn converts_s3_put_event() {
    let fields = normalize(s3_event("ObjectCreated:Put", "uploads/HappyFace.jpg")).unwrap();

    assert_eq!(fields.source, EventSource::ObjectStorage);
    assert_eq!(fields.method, Method::ObjectPut);
    assert_eq!(fields.path, "/uploads/HappyFace.jpg");
    assert_eq!(fields.environment, "dev");
    assert_eq!(fields.params["name"], "HappyFace.jpg");
    assert_eq!(fields.body, json!({"bucket": "sourcebucket", "size": 1024}));
}

#[test]
fn s3_keys_are_url_decoded() {
    let fields = normalize(s3_event("ObjectCreated:Put", "uploads/Happy+Face%21.jpg")).unwrap();
    assert_eq!(fields.path, "/uploads/Happy Face!.jpg");
    assert_eq!(fields.params["name"], "Happy Face!.jpg");
}

#[test]
fn s3_put_without_route_has_no_params() {
    let fields = normalize(s3_event("ObjectCreated:Put", "other/HappyFace.jpg")).unwrap();
    assert_eq!(fields.path, "/other/HappyFace.jpg");
    assert!(fields.params.is_empty());
}

#[test]
fn rejects_s3_delete_event() {
    assert_eq!(
        normalize(s3_event("ObjectRemoved:Delete", "uploads/HappyFace.jpg")).unwrap_err(),
        NormalizationError::Unrecognized
    );
}

#[test]
fn converts_scheduled_event() {
    let fields = normalize(json!({
        "account": "123456789012",
        "region": "us-east-1",
        "detail": {},
        "detail-type": "Scheduled Event",
        "source": "aws.events",
        "time": "1970-01-01T00:00:00Z",
        "id": "cdc73f9d-aea9-11e3-9d5a-835b769c0d9c",
        "resources": ["arn:aws:events:us-east-1:123456789012:rule/my-schedule"]
    }))
    .unwrap();

    assert_eq!(fields.method, Method::Scheduled);
    assert_eq!(fields.path, "/my-schedule");
    assert_eq!(fields.environment, "dev");
    assert_eq!(fields.body, json!({}));
}

#[test]
fn converts_authorizer_event() {
    let event = json!({
        "authorizationToken": "Bearer foo",
        "methodArn": "arn:aws:execute-api:us-east-1:123456789012/dev/GET/auth",
        "type": "TOKEN"
    });
    let fields = normalize(event.clone()).unwrap();

    assert_eq!(fields.method, Method::Authorizer);
    assert_eq!(fields.path, "/GET/auth");
    assert_eq!(fields.environment, "dev");
    assert_eq!(fields.headers["Authorization"], "Bearer foo");
    assert_eq!(fields.body, event);
}

#[test]
fn converts_directory_event() {
    let event = json!({
        "version": 1,
        "triggerSource": "PreSignUp_SignUp",
        "region": "us-east-1",
        "userPoolId": "abc",
        "callerContext": { "awsSdkVersion": "version", "clientId": "client" },
        "request": { "userAttributes": { "name": "bob" } },
        "response": {}
    });
    let fields = normalize(event.clone()).unwrap();

    assert_eq!(fields.method, Method::DirectoryEvent);
    assert_eq!(fields.path, "/PreSignUp_SignUp");
    assert_eq!(fields.body, event);
}

#[test]
fn converts_dynamodb_insert_event() {
    let payload = json!({
        "Keys": { "Id": { "N": "101" } },
        "NewImage": { "Message": { "S": "New item!" }, "Id": { "N": "101" } },
        "StreamViewType": "NEW_AND_OLD_IMAGES",
        "SequenceNumber": "111",
        "SizeBytes": 26
    });
    let fields = normalize(json!({
        "Records": [{
            "eventID": "1",
            "eventVersion": "1.0",
            "dynamodb": payload,
            "awsRegion": "us-west-2",
            "eventName": "INSERT",
            "eventSourceARN":
                "arn:aws:dynamodb:us-west-2:account-id:table/T/stream/2015-06-27T00:48:05",
            "eventSource": "aws:dynamodb"
        }]
    }))
    .unwrap();

    assert_eq!(fields.method, Method::StreamInsert);
    assert_eq!(fields.path, "/T");
    assert_eq!(fields.body, payload);
}

#[test]
fn dynamodb_modify_and_remove() {
    let record = |name: &str| {
        json!({
            "Records": [{
                "dynamodb": {},
                "eventName": name,
                "eventSourceARN": "arn:aws:dynamodb:us-west-2:1:table/Users/stream/x",
                "eventSource": "aws:dynamodb"
            }]
        })
    };
    let fields = normalize(record("MODIFY")).unwrap();
    assert_eq!(fields.method, Method::StreamModify);
    assert_eq!(fields.path, "/Users");

    assert_eq!(normalize(record("REMOVE")).unwrap_err(), NormalizationError::Unrecognized);
}

#[test]
fn converts_log_subscription_event() {
    let batch = json!({
        "messageType": "DATA_MESSAGE",
        "owner": "123456789012",
        "logGroup": "/aws/lambda/app",
        "logStream": "2024/01/01/[$LATEST]abc",
        "subscriptionFilters": ["error-filter"],
        "logEvents": [{ "id": "1", "timestamp": 1, "message": "ERROR boom" }]
    });
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(batch.to_string().as_bytes()).unwrap();
    let data = STANDARD.encode(encoder.finish().unwrap());

    let fields = normalize(json!({ "awslogs": { "data": data } })).unwrap();
    assert_eq!(fields.source, EventSource::LogSubscription);
    assert_eq!(fields.method, Method::LogSubscription);
    assert_eq!(fields.path, "/error-filter");
    assert_eq!(fields.body, batch);
}

#[test]
fn malformed_log_subscription_payload_fails() {
    assert!(matches!(
        normalize(json!({ "awslogs": { "data": "bm90IGd6aXA=" } })),
        Err(NormalizationError::MalformedLogPayload(_))
    ));
}

#[test]
fn converts_queue_batch() {
    let record = |id: &str, body: &str| {
        json!({
            "messageId": id,
            "receiptHandle": "handle",
            "body": body,
            "attributes": { "ApproximateReceiveCount": "1" },
            "messageAttributes": {},
            "eventSource": "aws:sqs",
            "eventSourceARN": "arn:aws:sqs:us-east-1:123456789012:jobs-east",
            "awsRegion": "us-east-1"
        })
    };
    let fields = normalize(json!({
        "Records": [record("m1", "{\"job\":7}"), record("m2", "plain text")]
    }))
    .unwrap();

    assert_eq!(fields.method, Method::QueueMessage);
    assert_eq!(fields.path, "/jobs-east");
    assert_eq!(fields.params["queue"], "jobs-east");
    assert_eq!(
        fields.body,
        json!([
            {
                "messageId": "m1",
                "body": { "job": 7 },
                "attributes": { "ApproximateReceiveCount": "1" }
            },
            {
                "messageId": "m2",
                "body": "plain text",
                "attributes": { "ApproximateReceiveCount": "1" }
            }
        ])
    );
}

#[test]
fn converts_direct_invoke() {
    let fields = normalize(json!({
        "method": "DIRECT_INVOKE",
        "path": "/hello",
        "body": { "foo": "bar" },
        "query": { "dry": "1" }
    }))
    .unwrap();

    assert_eq!(fields.method, Method::DirectInvoke);
    assert_eq!(fields.path, "/hello");
    assert_eq!(fields.body, json!({"foo": "bar"}));
    assert_eq!(fields.query["dry"], "1");
    assert_eq!(fields.environment, "dev");
}

#[test]
fn direct_invoke_without_path_fails() {
    assert_eq!(
        normalize(json!({ "method": "DIRECT_INVOKE" })).unwrap_err(),
        NormalizationError::MissingField("path")
    );
}

#[test]
fn environment_falls_back_to_default() {
    let app = app();
    let normalizer = EventNormalizer::new(app.router(), "fallback");
    let event = json!({ "method": "DIRECT_INVOKE", "path": "/x" });

    let fields = normalizer.normalize(&event, &InvocationContext::new()).unwrap();
    assert_eq!(fields.environment, "fallback");

    let ctx = InvocationContext::new().with_function_arn("arn:aws:lambda:us-east-1:1:function:f");
    let fields = normalizer.normalize(&event, &ctx).unwrap();
    assert_eq!(fields.environment, "fallback");
}

#[test]
fn unrecognized_events_fail() {
    assert_eq!(normalize(json!({})).unwrap_err(), NormalizationError::Unrecognized);
    assert_eq!(normalize(json!("hello")).unwrap_err(), NormalizationError::Unrecognized);
    assert_eq!(
        normalize(json!({ "method": "GET", "path": "/legacy", "headerNames": "[]" })).unwrap_err(),
        NormalizationError::Unrecognized
    );
}
