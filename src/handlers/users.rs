use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};

use crate::{
    authentication::{hash_password_argon2, verify_password_argon2, AuthUser},
    data_formats::{LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse, UserWrapper},
    db_helpers::{get_user_by_email, get_user_by_id, insert_user, update_user_in_db},
    errors::RequestError,
    validation::Validate,
    AppState,
};

use super::JsonResult;

type UserJson = UserWrapper<UserResponse>;

const INVALID_LOGIN: &str = "email or password is invalid";

pub async fn register_user(
    Extension(state): Extension<Arc<AppState>>,
    Json(UserWrapper { user: request }): Json<UserWrapper<RegisterRequest>>,
) -> JsonResult<UserJson> {
    request.validate()?;
    let password_hash = hash_password_argon2(request.password).await?;

    let mut conn = state.pool.acquire().await?;
    let user = insert_user(&mut conn, &request.username, &request.email, &password_hash).await?;
    let token = state.jwt.issue(user.id)?;

    tracing::info!(user_id = user.id, username = %user.username, "registered user");
    Ok((
        StatusCode::CREATED,
        Json(UserWrapper::wrap_with_user_data(UserResponse::new(
            user, token,
        ))),
    ))
}

pub async fn login_user(
    Extension(state): Extension<Arc<AppState>>,
    Json(UserWrapper { user: request }): Json<UserWrapper<LoginRequest>>,
) -> JsonResult<UserJson> {
    request.validate()?;

    let mut conn = state.pool.acquire().await?;
    let user = get_user_by_email(&mut conn, &request.email)
        .await?
        .ok_or(RequestError::Forbidden(INVALID_LOGIN))?;
    drop(conn);

    let is_password_correct = verify_password_argon2(request.password, user.password.clone()).await?;
    if !is_password_correct {
        tracing::debug!(user_id = user.id, "login with wrong password");
        return Err(RequestError::Forbidden(INVALID_LOGIN));
    }

    let token = state.jwt.issue(user.id)?;
    Ok((
        StatusCode::OK,
        Json(UserWrapper::wrap_with_user_data(UserResponse::new(
            user, token,
        ))),
    ))
}

pub async fn get_current_user(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser { id, token }: AuthUser,
) -> JsonResult<UserJson> {
    let mut conn = state.pool.acquire().await?;
    let user = get_user_by_id(&mut conn, id)
        .await?
        .ok_or(RequestError::NotFound("User not found"))?;
    Ok((
        StatusCode::OK,
        Json(UserWrapper::wrap_with_user_data(UserResponse::new(
            user, token,
        ))),
    ))
}

pub async fn update_user(
    Extension(state): Extension<Arc<AppState>>,
    AuthUser { id, token }: AuthUser,
    Json(UserWrapper { user: mut request }): Json<UserWrapper<UpdateUserRequest>>,
) -> JsonResult<UserJson> {
    request.validate()?;
    if let Some(password) = request.password.take() {
        request.password = Some(hash_password_argon2(password).await?);
    }

    let mut conn = state.pool.acquire().await?;
    let user = update_user_in_db(&mut conn, id, request).await?;
    Ok((
        StatusCode::OK,
        Json(UserWrapper::wrap_with_user_data(UserResponse::new(
            user, token,
        ))),
    ))
}
