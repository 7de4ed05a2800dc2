use axum::http::header;
use cucumber::then;
use serde_json::Value;

use crate::bdd::ApiWorld;

fn assert_status(world: &ApiWorld, expected: u16) {
    let response = world.last_response();
    assert_eq!(
        response.status.as_u16(),
        expected,
        "unexpected status, body was: {}",
        response.body
    );
}

#[then(regex = r"^the response should be a (\d+) status code$")]
async fn response_should_be(world: &mut ApiWorld, status: u16) {
    assert_status(world, status);
}

#[then(regex = r"^the response status code should be a (\d+)$")]
async fn status_code_should_be(world: &mut ApiWorld, status: u16) {
    assert_status(world, status);
}

#[then("the response should contain a token")]
async fn response_has_token(world: &mut ApiWorld) {
    let token = world.response_field("/user/token");
    let token = token.as_str().expect("token is a string");
    assert_eq!(token.split('.').count(), 3, "not a JWT: {token}");
}

#[then("the response should be json")]
async fn response_is_json(world: &mut ApiWorld) {
    let content_type = world
        .last_response()
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("application/json"), "{content_type}");
}

/// Strings compare by content, everything else by its JSON rendering.
#[then(regex = r#"^the response field "([^"]*)" should be "([^"]*)"$"#)]
async fn field_should_be(world: &mut ApiWorld, pointer: String, expected: String) {
    let actual = match world.response_field(&pointer) {
        Value::String(s) => s,
        other => other.to_string(),
    };
    assert_eq!(actual, expected, "field {pointer}");
}

#[then(regex = r#"^the response field "([^"]*)" should be null$"#)]
async fn field_should_be_null(world: &mut ApiWorld, pointer: String) {
    assert_eq!(world.response_field(&pointer), Value::Null, "field {pointer}");
}

#[then(regex = r#"^the response field "([^"]*)" should have (\d+) items?$"#)]
async fn field_should_have_items(world: &mut ApiWorld, pointer: String, count: usize) {
    let field = world.response_field(&pointer);
    let items = field.as_array().expect("field is an array");
    assert_eq!(items.len(), count, "field {pointer} was {field}");
}
