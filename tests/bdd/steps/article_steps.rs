use axum::http::{Method, StatusCode};
use cucumber::{given, when};
use serde_json::json;

use crate::bdd::ApiWorld;

async fn publish(world: &mut ApiWorld, title: &str, author: &str, tags: Vec<String>) {
    let token = world.login(author).await;
    let response = world
        .request_as(
            Some(token),
            Method::POST,
            "/api/articles",
            Some(json!({
                "article": {
                    "title": title,
                    "description": "Ever wonder how?",
                    "body": "You have to believe",
                    "tagList": tags,
                }
            })),
        )
        .await;
    assert_eq!(
        response.status,
        StatusCode::CREATED,
        "publishing failed: {}",
        response.body
    );
    let body: serde_json::Value = serde_json::from_str(&response.body).expect("article json");
    world.slug = body["article"]["slug"].as_str().map(str::to_owned);
}

#[given(regex = r#"^an article "([^"]*)" by "(\w+)"$"#)]
async fn an_article(world: &mut ApiWorld, title: String, author: String) {
    publish(world, &title, &author, Vec::new()).await;
}

#[given(regex = r#"^an article "([^"]*)" by "(\w+)" tagged "([^"]*)"$"#)]
async fn a_tagged_article(world: &mut ApiWorld, title: String, author: String, tags: String) {
    let tags = tags.split(',').map(|tag| tag.trim().to_owned()).collect();
    publish(world, &title, &author, tags).await;
}

/// Acts on the article published in this scenario, or on `/api/articles/1`
/// when there is none.
#[when(regex = r#"^I send a request to "([^"]*)" the article api$"#)]
async fn article_api(world: &mut ApiWorld, action: String) {
    let target = format!("/api/articles/{}", world.slug.as_deref().unwrap_or("1"));
    match action.as_str() {
        "get" => world.send(Method::GET, &target, None).await,
        "create" => {
            let body = json!({
                "article": {
                    "title": "Security check article",
                    "description": "Who may write?",
                    "body": "Only people with a token.",
                    "tagList": ["security"],
                }
            });
            world.send(Method::POST, "/api/articles/", Some(body)).await
        }
        "update" => {
            let body = json!({"article": {"body": "Rewritten by someone"}});
            world.send(Method::PUT, &target, Some(body)).await
        }
        "delete" => world.send(Method::DELETE, &target, None).await,
        other => panic!("unknown article action {other}"),
    }
}
