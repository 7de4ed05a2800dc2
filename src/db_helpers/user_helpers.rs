use sqlx::SqliteConnection;

use crate::{data_formats::UpdateUserRequest, errors::RequestError, models::User};

use super::USER_COLUMNS;

/// Inserts a user whose password has already been hashed.
pub async fn insert_user(
    conn: &mut SqliteConnection,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, RequestError> {
    let query = format!(
        "INSERT INTO users (username, email, password) VALUES (?1, ?2, ?3) RETURNING {USER_COLUMNS}"
    );
    let user = sqlx::query_as::<_, User>(&query)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *conn)
        .await?;
    Ok(user)
}

/// Applies the fields present in `update`. A provided password must already be hashed.
pub async fn update_user_in_db(
    conn: &mut SqliteConnection,
    id: i64,
    UpdateUserRequest {
        email,
        bio,
        image,
        username,
        password,
    }: UpdateUserRequest,
) -> Result<User, RequestError> {
    let query = format!(
        r#"
        UPDATE users
        SET email      = COALESCE(?2, email),
            username   = COALESCE(?3, username),
            password   = COALESCE(?4, password),
            bio        = COALESCE(?5, bio),
            image      = COALESCE(?6, image),
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?1
        RETURNING {USER_COLUMNS}
        "#
    );
    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .bind(email)
        .bind(username)
        .bind(password)
        .bind(bio)
        .bind(image)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(RequestError::NotFound("User not found"))
}
