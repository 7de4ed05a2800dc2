//! Scenario state for the API acceptance tests.

use std::{collections::HashMap, fmt, sync::Arc};

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use cucumber::World;
use realworld_bdd::{hash_password_argon2, init_memory_db, make_router, AppState, JwtKeys};
use serde_json::{json, Value};
use tower::ServiceExt;

/// The application under test, built once per scenario.
pub struct TestApp {
    router: Router,
    state: Arc<AppState>,
}

impl TestApp {
    async fn new() -> Self {
        let pool = init_memory_db()
            .await
            .expect("failed to create scenario database");
        let state = Arc::new(AppState::new(
            pool,
            JwtKeys::new("scenario-secret", time::Duration::days(1)),
        ));
        TestApp {
            router: make_router(state.clone()),
            state,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedResponse {
    pub status: StatusCode,
    pub body: String,
    pub headers: HeaderMap,
}

#[derive(Default, World)]
pub struct ApiWorld {
    app: Option<TestApp>,
    /// Users seeded in this scenario: username -> (email, password).
    users: HashMap<String, (String, String)>,
    /// Credentials the login steps will submit.
    pub credentials: Option<(String, String)>,
    /// Token sent with requests, if any.
    pub token: Option<String>,
    /// Slug of the article the article api steps act on.
    pub slug: Option<String>,
    pub comment_id: Option<i64>,
    pub response: Option<RecordedResponse>,
}

impl fmt::Debug for ApiWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiWorld")
            .field("app_started", &self.app.is_some())
            .field("users", &self.users.keys().collect::<Vec<_>>())
            .field("token", &self.token.is_some())
            .field("slug", &self.slug)
            .field("comment_id", &self.comment_id)
            .field("response", &self.response)
            .finish()
    }
}

impl ApiWorld {
    async fn app(&mut self) -> &TestApp {
        if self.app.is_none() {
            self.app = Some(TestApp::new().await);
        }
        self.app.as_ref().expect("app was just started")
    }

    /// Saves a user straight into the database, like a fixture would.
    pub async fn seed_user(&mut self, username: &str, email: &str, password: &str) -> i64 {
        let hash = hash_password_argon2(password.to_owned())
            .await
            .expect("failed to hash password");
        let pool = self.app().await.state.pool.clone();
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, email, password) VALUES (?1, ?2, ?3) RETURNING id",
        )
        .bind(username)
        .bind(email)
        .bind(hash)
        .fetch_one(&pool)
        .await
        .expect("failed to seed user");
        self.users
            .insert(username.to_owned(), (email.to_owned(), password.to_owned()));
        id
    }

    /// Logs a seeded user in through the API and returns their token.
    pub async fn login(&mut self, username: &str) -> String {
        let (email, password) = self
            .users
            .get(username)
            .cloned()
            .unwrap_or_else(|| panic!("user {username} was not seeded"));
        let response = self
            .request_as(
                None,
                Method::POST,
                "/api/users/login",
                Some(json!({"user": {"email": email, "password": password}})),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        let body: Value = serde_json::from_str(&response.body).expect("login body is json");
        body["user"]["token"]
            .as_str()
            .expect("login returned a token")
            .to_owned()
    }

    /// Sends a request with an explicit token without touching the recorded response.
    pub async fn request_as(
        &mut self,
        token: Option<String>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> RecordedResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }
        let body = match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        };
        let request = builder.body(body).expect("valid request");

        let router = self.app().await.router.clone();
        let response = router.oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = hyper::body::to_bytes(response.into_body())
            .await
            .expect("readable response body");
        RecordedResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
            headers,
        }
    }

    /// Sends a request with the scenario's token and records the response.
    pub async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) {
        let token = self.token.clone();
        let response = self.request_as(token, method, uri, body).await;
        self.response = Some(response);
    }

    pub fn last_response(&self) -> &RecordedResponse {
        self.response.as_ref().expect("no request has been sent")
    }

    pub fn response_json(&self) -> Value {
        let response = self.last_response();
        serde_json::from_str(&response.body)
            .unwrap_or_else(|e| panic!("response is not json ({e}): {}", response.body))
    }

    /// Looks a field up by JSON pointer, e.g. `/article/slug`.
    pub fn response_field(&self, pointer: &str) -> Value {
        let json = self.response_json();
        json.pointer(pointer)
            .cloned()
            .unwrap_or_else(|| panic!("no field {pointer} in {json}"))
    }
}
