use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};

use crate::{data_formats::TagsWrapper, db_helpers::get_tags_in_db, AppState};

use super::JsonResult;

pub async fn list_tags(Extension(state): Extension<Arc<AppState>>) -> JsonResult<TagsWrapper> {
    let mut conn = state.pool.acquire().await?;
    let tags = get_tags_in_db(&mut conn).await?;
    Ok((StatusCode::OK, Json(TagsWrapper { tags })))
}
