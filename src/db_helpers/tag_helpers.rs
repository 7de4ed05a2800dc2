use sqlx::SqliteConnection;

use crate::errors::RequestError;

/// Tags attached to at least one article, alphabetically.
pub async fn get_tags_in_db(conn: &mut SqliteConnection) -> Result<Vec<String>, RequestError> {
    let result = sqlx::query_scalar::<_, String>(
        r#"
        SELECT name FROM tags
        WHERE EXISTS (SELECT 1 FROM article_tags WHERE article_tags.tag_id = tags.id)
        ORDER BY name
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(result)
}

/// Replaces the tags of an article, creating tag rows on demand.
pub(super) async fn set_article_tags(
    conn: &mut SqliteConnection,
    article_id: i64,
    tags: &[String],
) -> Result<(), RequestError> {
    sqlx::query("DELETE FROM article_tags WHERE article_id = ?1")
        .bind(article_id)
        .execute(&mut *conn)
        .await?;

    for tag in tags {
        let tag_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO tags (name) VALUES (?1)
            ON CONFLICT (name) DO UPDATE SET name = excluded.name
            RETURNING id
            "#,
        )
        .bind(tag)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query("INSERT OR IGNORE INTO article_tags (article_id, tag_id) VALUES (?1, ?2)")
            .bind(article_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
