use sqlx::SqliteConnection;

use crate::{errors::RequestError, models::Profile};

use super::get_user_id_by_username;

const PROFILE_QUERY: &str = r#"
    SELECT users.id,
           users.username,
           users.image,
           users.bio,
           EXISTS (SELECT 1
                   FROM   follows
                   WHERE  follows.follower_id = ?1
                          AND follows.followed_id = users.id) AS following
    FROM   users
    WHERE  users.username = ?2
"#;

pub async fn get_profile_in_db(
    conn: &mut SqliteConnection,
    viewer: Option<i64>,
    username: &str,
) -> Result<Profile, RequestError> {
    sqlx::query_as::<_, Profile>(PROFILE_QUERY)
        .bind(viewer)
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(RequestError::NotFound("Profile not found"))
}

pub async fn follow_user_in_db(
    conn: &mut SqliteConnection,
    follower_id: i64,
    username: &str,
) -> Result<Profile, RequestError> {
    let followed_id = get_user_id_by_username(conn, username).await?;
    sqlx::query("INSERT OR IGNORE INTO follows (follower_id, followed_id) VALUES (?1, ?2)")
        .bind(follower_id)
        .bind(followed_id)
        .execute(&mut *conn)
        .await?;
    get_profile_in_db(conn, Some(follower_id), username).await
}

pub async fn unfollow_user_in_db(
    conn: &mut SqliteConnection,
    follower_id: i64,
    username: &str,
) -> Result<Profile, RequestError> {
    let followed_id = get_user_id_by_username(conn, username).await?;
    sqlx::query("DELETE FROM follows WHERE follower_id = ?1 AND followed_id = ?2")
        .bind(follower_id)
        .bind(followed_id)
        .execute(&mut *conn)
        .await?;
    get_profile_in_db(conn, Some(follower_id), username).await
}
