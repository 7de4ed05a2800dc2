//! Users, credentials, tokens and raw requests.

use axum::http::Method;
use cucumber::{gherkin::Step, given, when};
use serde_json::{json, Value};

use crate::bdd::ApiWorld;

const DEFAULT_EMAIL: &str = "test@gmail.com";
const DEFAULT_PASSWORD: &str = "password";

#[given(regex = r#"^I have a valid email and password is "([^"]*)" and "([^"]*)"$"#)]
async fn valid_email_and_password(world: &mut ApiWorld, email: String, password: String) {
    world.seed_user("test", &email, &password).await;
    world.credentials = Some((email, password));
}

#[given(regex = r#"^I have a invalid username and password is "([^"]*)" and "([^"]*)"$"#)]
async fn invalid_email_and_password(world: &mut ApiWorld, email: String, password: String) {
    world.credentials = Some((email, password));
}

#[given(regex = r#"^a user "(\w+)" with email "([^"]*)" and password "([^"]*)"$"#)]
async fn a_user(world: &mut ApiWorld, username: String, email: String, password: String) {
    world.seed_user(&username, &email, &password).await;
}

#[given(regex = r#"^I am logged in as "(\w+)"$"#)]
async fn logged_in_as(world: &mut ApiWorld, username: String) {
    let token = world.login(&username).await;
    world.token = Some(token);
}

/// Posts the scenario's credentials, or the default test account, to the login api.
async fn submit_credentials(world: &mut ApiWorld) {
    let (email, password) = world
        .credentials
        .clone()
        .unwrap_or_else(|| (DEFAULT_EMAIL.to_owned(), DEFAULT_PASSWORD.to_owned()));
    world
        .send(
            Method::POST,
            "/api/users/login",
            Some(json!({"user": {"email": email, "password": password}})),
        )
        .await;
}

async fn keep_token(world: &mut ApiWorld) {
    submit_credentials(world).await;
    let token = world.response_field("/user/token");
    world.token = Some(token.as_str().expect("token is a string").to_owned());
}

#[given("I have a valid token")]
async fn valid_token(world: &mut ApiWorld) {
    keep_token(world).await;
}

#[given("I am unauthenticated with invalid token")]
async fn invalid_token(world: &mut ApiWorld) {
    world.token = Some("not.a.token".to_owned());
}

#[given("I am anonymous")]
async fn anonymous(world: &mut ApiWorld) {
    world.token = None;
}

#[when(regex = r"^I send a request to the login api(?: with (?:valid|invalid) credentials)?$")]
async fn login_with_credentials(world: &mut ApiWorld) {
    submit_credentials(world).await;
}

#[when("I login with the valid email and password")]
async fn login_and_keep_token(world: &mut ApiWorld) {
    keep_token(world).await;
}

#[when(regex = r#"^I send a (GET|POST|PUT|DELETE) request to "([^"]*)"$"#)]
async fn send_request(world: &mut ApiWorld, method: String, path: String) {
    world.send(parse_method(&method), &path, None).await;
}

#[when(regex = r#"^I send a (GET|POST|PUT|DELETE) request to "([^"]*)" with body:$"#)]
async fn send_request_with_body(world: &mut ApiWorld, step: &Step, method: String, path: String) {
    let docstring = step.docstring.as_ref().expect("step needs a JSON docstring");
    let body: Value = serde_json::from_str(docstring).expect("docstring is valid JSON");
    world.send(parse_method(&method), &path, Some(body)).await;
}

fn parse_method(method: &str) -> Method {
    method.parse().expect("step regex only admits known methods")
}
