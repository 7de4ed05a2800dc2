use sqlx::SqliteConnection;

use crate::{errors::RequestError, models::User};

mod article_helpers;
mod comment_helpers;
mod profile_helpers;
mod tag_helpers;
mod user_helpers;


pub use article_helpers::*;
pub use comment_helpers::*;
pub use profile_helpers::*;
pub use tag_helpers::*;
pub use user_helpers::*;

const USER_COLUMNS: &str = "id, username, email, password, image, bio, created_at, updated_at";

// ----------------- Helper Functions -----------------

pub async fn get_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
    let result = sqlx::query_as::<_, User>(&query)
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(result)
}

pub async fn get_user_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<User>, RequestError> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    let result = sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(result)
}

async fn get_user_id_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<i64, RequestError> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE username = ?1")
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(RequestError::NotFound("Profile not found"))
}

pub async fn get_article_id_by_slug_in_db(
    conn: &mut SqliteConnection,
    slug: &str,
) -> Result<i64, RequestError> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM articles WHERE slug = ?1")
        .bind(slug)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(RequestError::NotFound("Article not found"))
}
