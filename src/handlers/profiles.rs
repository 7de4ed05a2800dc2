use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, Extension, Json};

use crate::{
    authentication::AuthUser,
    data_formats::{ProfileResponse, ProfileWrapper},
    db_helpers::{follow_user_in_db, get_profile_in_db, unfollow_user_in_db},
    AppState,
};

use super::JsonResult;

pub async fn get_profile(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthUser,
    Path(username): Path<String>,
) -> JsonResult<ProfileWrapper> {
    let mut conn = state.pool.acquire().await?;
    let profile = get_profile_in_db(&mut conn, Some(user.id), &username).await?;
    Ok((
        StatusCode::OK,
        Json(ProfileWrapper {
            profile: ProfileResponse::new(profile),
        }),
    ))
}

pub async fn follow_profile(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthUser,
    Path(username): Path<String>,
) -> JsonResult<ProfileWrapper> {
    let mut conn = state.pool.acquire().await?;
    let profile = follow_user_in_db(&mut conn, user.id, &username).await?;
    Ok((
        StatusCode::OK,
        Json(ProfileWrapper {
            profile: ProfileResponse::new(profile),
        }),
    ))
}

pub async fn unfollow_profile(
    Extension(state): Extension<Arc<AppState>>,
    user: AuthUser,
    Path(username): Path<String>,
) -> JsonResult<ProfileWrapper> {
    let mut conn = state.pool.acquire().await?;
    let profile = unfollow_user_in_db(&mut conn, user.id, &username).await?;
    Ok((
        StatusCode::OK,
        Json(ProfileWrapper {
            profile: ProfileResponse::new(profile),
        }),
    ))
}
