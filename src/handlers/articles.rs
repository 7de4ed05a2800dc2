use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    authentication::{AuthUser, MaybeUser},
    data_formats::{
        ArticleQueryParams, ArticleResponse, ArticleWrapper, CreateArticleRequest,
        FeedQueryParams, MultipleArticlesWrapper, UpdateArticleRequest,
    },
    db_helpers::{
        create_article_in_db, delete_article_in_db, favorite_article_in_db,
        get_article_by_slug_in_db, list_articles_feed_in_db, list_articles_in_db,
        unfavorite_article_in_db, update_article_in_db,
    },
    errors::RequestError,
    models::Article,
    validation::Validate,
    AppState,
};

use super::JsonResult;

type ArticleJson = ArticleWrapper<ArticleResponse>;

fn single(article: Article) -> Json<ArticleJson> {
    Json(ArticleWrapper {
        article: ArticleResponse::new(article),
    })
}

fn multiple((articles, articles_count): (Vec<Article>, i64)) -> Json<MultipleArticlesWrapper> {
    Json(MultipleArticlesWrapper {
        articles: articles.into_iter().map(ArticleResponse::new).collect(),
        articles_count,
    })
}

pub async fn list_articles(
    Extension(state): Extension<Arc<AppState>>,
    maybe_user: MaybeUser,
    Query(params): Query<ArticleQueryParams>,
) -> JsonResult<MultipleArticlesWrapper> {
    let mut conn = state.pool.acquire().await?;
    let page = list_articles_in_db(&mut conn, maybe_user.get_id(), params).await?;
    Ok((StatusCode::OK, multiple(page)))
}

pub async fn feed_articles(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<FeedQueryParams>,
) -> JsonResult<MultipleArticlesWrapper> {
    let mut conn = state.pool.acquire().await?;
    let page = list_articles_feed_in_db(&mut conn, user.id, params).await?;
    Ok((StatusCode::OK, multiple(page)))
}

pub async fn get_article(
    Extension(state): Extension<Arc<AppState>>,
    maybe_user: MaybeUser,
    Path(slug): Path<String>,
) -> JsonResult<ArticleJson> {
    let mut conn = state.pool.acquire().await?;
    let article = get_article_by_slug_in_db(&mut conn, &slug, maybe_user.get_id())
        .await?
        .ok_or(RequestError::NotFound("Article not found"))?;
    Ok((StatusCode::OK, single(article)))
}

pub async fn create_article(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthUser,
    Json(ArticleWrapper { article: request }): Json<ArticleWrapper<CreateArticleRequest>>,
) -> JsonResult<ArticleJson> {
    request.validate()?;

    let mut tx = state.pool.begin().await?;
    let article = create_article_in_db(&mut tx, user.id, request).await?;
    tx.commit().await?;

    tracing::info!(slug = %article.slug, author_id = user.id, "created article");
    Ok((StatusCode::CREATED, single(article)))
}

pub async fn update_article(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(ArticleWrapper { article: request }): Json<ArticleWrapper<UpdateArticleRequest>>,
) -> JsonResult<ArticleJson> {
    request.validate()?;

    let mut tx = state.pool.begin().await?;
    let article = update_article_in_db(&mut tx, user.id, &slug, request).await?;
    tx.commit().await?;

    Ok((StatusCode::OK, single(article)))
}

pub async fn delete_article(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> JsonResult<Value> {
    let mut conn = state.pool.acquire().await?;
    delete_article_in_db(&mut conn, user.id, &slug).await?;
    tracing::info!(%slug, author_id = user.id, "deleted article");
    Ok((StatusCode::OK, Json(json!({}))))
}

pub async fn favorite_article(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> JsonResult<ArticleJson> {
    let mut conn = state.pool.acquire().await?;
    let article = favorite_article_in_db(&mut conn, user.id, &slug).await?;
    Ok((StatusCode::OK, single(article)))
}

pub async fn unfavorite_article(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthUser,
    Path(slug): Path<String>,
) -> JsonResult<ArticleJson> {
    let mut conn = state.pool.acquire().await?;
    let article = unfavorite_article_in_db(&mut conn, user.id, &slug).await?;
    Ok((StatusCode::OK, single(article)))
}
