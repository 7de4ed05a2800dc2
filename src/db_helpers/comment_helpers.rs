use sqlx::SqliteConnection;

use crate::{data_formats::CommentRequest, errors::RequestError, models::Comment};

use super::get_article_id_by_slug_in_db;

// ?1 is the viewer.
const COMMENT_SELECT: &str = r#"
    SELECT comments.id,
           comments.body,
           comments.created_at,
           comments.updated_at,
           comments.article_id,
           comments.author_id,
           users.username                               AS author_username,
           users.image                                  AS author_image,
           users.bio                                    AS author_bio,
           EXISTS (SELECT 1
                   FROM   follows
                   WHERE  follows.followed_id = comments.author_id
                          AND follows.follower_id = ?1) AS following
    FROM   comments
           JOIN users
             ON users.id = comments.author_id
"#;

pub async fn add_comment_to_article_in_db(
    conn: &mut SqliteConnection,
    author_id: i64,
    slug: &str,
    CommentRequest { body }: CommentRequest,
) -> Result<Comment, RequestError> {
    let article_id = get_article_id_by_slug_in_db(conn, slug).await?;

    let comment_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO comments (body, author_id, article_id)
        VALUES (?1, ?2, ?3)
        RETURNING id
        "#,
    )
    .bind(body.as_str())
    .bind(author_id)
    .bind(article_id)
    .fetch_one(&mut *conn)
    .await?;

    let query = format!("{COMMENT_SELECT} WHERE comments.id = ?2");
    let comment = sqlx::query_as::<_, Comment>(&query)
        .bind(author_id)
        .bind(comment_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(comment)
}

/// Comments on an article, oldest first.
pub async fn get_comments_for_article_in_db(
    conn: &mut SqliteConnection,
    viewer: Option<i64>,
    slug: &str,
) -> Result<Vec<Comment>, RequestError> {
    let article_id = get_article_id_by_slug_in_db(conn, slug).await?;
    let query = format!("{COMMENT_SELECT} WHERE comments.article_id = ?2 ORDER BY comments.id");
    let result = sqlx::query_as::<_, Comment>(&query)
        .bind(viewer)
        .bind(article_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(result)
}

pub async fn delete_comment_in_db(
    conn: &mut SqliteConnection,
    user_id: i64,
    slug: &str,
    comment_id: i64,
) -> Result<(), RequestError> {
    let article_id = get_article_id_by_slug_in_db(conn, slug).await?;
    let author_id = sqlx::query_scalar::<_, i64>(
        "SELECT author_id FROM comments WHERE id = ?1 AND article_id = ?2",
    )
    .bind(comment_id)
    .bind(article_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(RequestError::NotFound("Comment not found"))?;

    if author_id != user_id {
        return Err(RequestError::Forbidden("Only the author can delete this comment"));
    }

    sqlx::query("DELETE FROM comments WHERE id = ?1")
        .bind(comment_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
