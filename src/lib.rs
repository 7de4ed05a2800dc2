mod authentication;
mod config;
mod data_formats;
mod db_helpers;
mod errors;
mod handlers;
mod models;
mod validation;

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use authentication::{hash_password_argon2, AuthUser, JwtKeys, MaybeUser};
pub use config::Config;
pub use data_formats::*;
pub use errors::{RequestError, RequestErrorJsonWrapper};
use handlers::*;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;

pub type JsonResponse<T> = (StatusCode, Json<T>);

/// Shared by every handler through an `Extension` layer.
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt: JwtKeys) -> Self {
        AppState { pool, jwt }
    }
}

pub async fn run_app(config: Config) -> Result<()> {
    let db = init_db(&config.database_url).await?;
    let state = AppState::new(db, JwtKeys::new(&config.jwt_secret, config.token_ttl));
    let app = make_router(Arc::new(state));
    serve(app, config.bind_address).await
}

pub async fn serve(app: Router, address: SocketAddr) -> Result<()> {
    tracing::info!(%address, "server listening");
    axum::Server::bind(&address)
        .serve(app.into_make_service())
        .await
        .context("server error")?;
    Ok(())
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!(db_url, "creating database");
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("Failed to create database {db_url}"))?;
    } else {
        tracing::info!(db_url, "database already exists");
    }
    let pool = SqlitePool::connect(db_url)
        .await
        .context("Failed to connect to database")?;
    migrate(&pool).await?;
    Ok(pool)
}

/// A private, migrated in-memory database.
///
/// Every SQLite connection to `:memory:` opens a separate database, so the pool
/// holds exactly one connection and never recycles it.
pub async fn init_memory_db() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory database")?;
    migrate(&pool).await?;
    Ok(pool)
}

async fn migrate(pool: &SqlitePool) -> Result<()> {
    tracing::info!("running migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("migrations completed");
    Ok(())
}

pub fn slugify(title: &str) -> String {
    slug::slugify(title)
}

pub fn make_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        // users
        .route("/users", post(register_user))
        .route("/users/login", post(login_user))
        .route("/user", get(get_current_user).put(update_user))
        // profiles
        .route("/profiles/:username", get(get_profile))
        .route(
            "/profiles/:username/follow",
            post(follow_profile).delete(unfollow_profile),
        )
        // articles
        .route("/articles", get(list_articles).post(create_article))
        .route("/articles/", get(list_articles).post(create_article))
        .route("/articles/feed", get(feed_articles))
        .route(
            "/articles/:slug",
            get(get_article).put(update_article).delete(delete_article),
        )
        .route(
            "/articles/:slug/favorite",
            post(favorite_article).delete(unfavorite_article),
        )
        .route(
            "/articles/:slug/comments",
            get(list_comments).post(add_comment),
        )
        .route("/articles/:slug/comments/:id", delete(delete_comment))
        // tags
        .route("/tags", get(list_tags));

    Router::new()
        .route("/check_health", get(alive))
        .nest("/api", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}
