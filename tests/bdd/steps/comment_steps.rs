use axum::http::{Method, StatusCode};
use cucumber::{given, when};
use serde_json::json;

use crate::bdd::ApiWorld;

#[given(regex = r#"^a comment "([^"]*)" by "(\w+)" on "([^"]*)"$"#)]
async fn a_comment(world: &mut ApiWorld, body: String, author: String, slug: String) {
    let token = world.login(&author).await;
    let response = world
        .request_as(
            Some(token),
            Method::POST,
            &format!("/api/articles/{slug}/comments"),
            Some(json!({"comment": {"body": body}})),
        )
        .await;
    assert_eq!(
        response.status,
        StatusCode::CREATED,
        "commenting failed: {}",
        response.body
    );
    let json: serde_json::Value = serde_json::from_str(&response.body).expect("comment json");
    world.comment_id = json["comment"]["id"].as_i64();
}

#[when(regex = r#"^I delete the last comment on "([^"]*)"$"#)]
async fn delete_last_comment(world: &mut ApiWorld, slug: String) {
    let id = world.comment_id.expect("no comment was posted");
    world
        .send(
            Method::DELETE,
            &format!("/api/articles/{slug}/comments/{id}"),
            None,
        )
        .await;
}
