use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use crate::{
    authentication::{AuthUser, MaybeUser},
    data_formats::{CommentRequest, CommentResponse, CommentWrapper, MultipleCommentsWrapper},
    db_helpers::{
        add_comment_to_article_in_db, delete_comment_in_db, get_comments_for_article_in_db,
    },
    validation::Validate,
    AppState,
};

use super::JsonResult;

pub async fn list_comments(
    Extension(state): Extension<Arc<AppState>>,
    maybe_user: MaybeUser,
    Path(slug): Path<String>,
) -> JsonResult<MultipleCommentsWrapper> {
    let mut conn = state.pool.acquire().await?;
    let comments = get_comments_for_article_in_db(&mut conn, maybe_user.get_id(), &slug).await?;
    Ok((
        StatusCode::OK,
        Json(MultipleCommentsWrapper {
            comments: comments.into_iter().map(CommentResponse::new).collect(),
        }),
    ))
}

pub async fn add_comment(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthUser,
    Path(slug): Path<String>,
    Json(CommentWrapper { comment: request }): Json<CommentWrapper<CommentRequest>>,
) -> JsonResult<CommentWrapper<CommentResponse>> {
    request.validate()?;
    let mut conn = state.pool.acquire().await?;
    let comment = add_comment_to_article_in_db(&mut conn, user.id, &slug, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(CommentWrapper {
            comment: CommentResponse::new(comment),
        }),
    ))
}

pub async fn delete_comment(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthUser,
    Path((slug, id)): Path<(String, i64)>,
) -> JsonResult<Value> {
    let mut conn = state.pool.acquire().await?;
    delete_comment_in_db(&mut conn, user.id, &slug, id).await?;
    Ok((StatusCode::OK, Json(json!({}))))
}
