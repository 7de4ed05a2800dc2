use sqlx::SqliteConnection;

use crate::data_formats::{
    ArticleQueryParams, CreateArticleRequest, FeedQueryParams, UpdateArticleRequest,
};
use crate::errors::RequestError;
use crate::models::Article;
use crate::slugify;

use super::tag_helpers::set_article_tags;

// ?1 is always the viewer, NULL for anonymous requests.
const ARTICLE_SELECT: &str = r#"
    SELECT articles.id,
           articles.slug,
           articles.title,
           articles.description,
           articles.body,
           articles.author_id,
           articles.created_at,
           articles.updated_at,
           (SELECT Json_group_array(tags.name)
            FROM   article_tags
                   JOIN tags
                     ON tags.id = article_tags.tag_id
            WHERE  article_tags.article_id = articles.id)    AS tag_list,
           users.username                                  AS author_username,
           users.image                                     AS author_image,
           users.bio                                       AS author_bio,
           (SELECT Count(*)
            FROM   favorites
            WHERE  favorites.article_id = articles.id)       AS favorites_count,
           EXISTS (SELECT 1
                   FROM   favorites
                   WHERE  favorites.article_id = articles.id
                          AND favorites.user_id = ?1)      AS favorited,
           EXISTS (SELECT 1
                   FROM   follows
                   WHERE  follows.followed_id = articles.author_id
                          AND follows.follower_id = ?1)    AS following
    FROM   articles
           JOIN users
             ON users.id = articles.author_id
"#;

// ?2 author, ?3 tag, ?4 favorited by, ?5 feed of follower.
const ARTICLE_FILTER: &str = r#"
    WHERE  ( ?2 IS NULL OR users.username = ?2 )
       AND ( ?3 IS NULL
              OR EXISTS (SELECT 1
                         FROM   article_tags
                                JOIN tags
                                  ON tags.id = article_tags.tag_id
                         WHERE  article_tags.article_id = articles.id
                                AND tags.name = ?3) )
       AND ( ?4 IS NULL
              OR EXISTS (SELECT 1
                         FROM   favorites
                                JOIN users AS fans
                                  ON fans.id = favorites.user_id
                         WHERE  favorites.article_id = articles.id
                                AND fans.username = ?4) )
       AND ( ?5 IS NULL
              OR articles.author_id IN (SELECT followed_id
                                        FROM   follows
                                        WHERE  follower_id = ?5) )
"#;

#[derive(Debug, Default)]
struct ArticleFilter {
    author: Option<String>,
    tag: Option<String>,
    favorited: Option<String>,
    followed_by: Option<i64>,
}

/// Returns one page of matching articles, newest first, and the total number of matches.
async fn query_articles(
    conn: &mut SqliteConnection,
    viewer: Option<i64>,
    filter: ArticleFilter,
    limit: u32,
    offset: u32,
) -> Result<(Vec<Article>, i64), RequestError> {
    let count_query = format!("SELECT Count(*) FROM ({ARTICLE_SELECT} {ARTICLE_FILTER})");
    let count = sqlx::query_scalar::<_, i64>(&count_query)
        .bind(viewer)
        .bind(filter.author.as_deref())
        .bind(filter.tag.as_deref())
        .bind(filter.favorited.as_deref())
        .bind(filter.followed_by)
        .fetch_one(&mut *conn)
        .await?;

    let page_query = format!(
        "{ARTICLE_SELECT} {ARTICLE_FILTER} ORDER BY articles.created_at DESC, articles.id DESC LIMIT ?6 OFFSET ?7"
    );
    let articles = sqlx::query_as::<_, Article>(&page_query)
        .bind(viewer)
        .bind(filter.author.as_deref())
        .bind(filter.tag.as_deref())
        .bind(filter.favorited.as_deref())
        .bind(filter.followed_by)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&mut *conn)
        .await?;

    Ok((articles, count))
}

pub async fn list_articles_in_db(
    conn: &mut SqliteConnection,
    viewer: Option<i64>,
    ArticleQueryParams {
        tag,
        author,
        favorited,
        limit,
        offset,
    }: ArticleQueryParams,
) -> Result<(Vec<Article>, i64), RequestError> {
    let filter = ArticleFilter {
        author,
        tag,
        favorited,
        followed_by: None,
    };
    query_articles(conn, viewer, filter, limit, offset).await
}

pub async fn list_articles_feed_in_db(
    conn: &mut SqliteConnection,
    viewer: i64,
    FeedQueryParams { limit, offset }: FeedQueryParams,
) -> Result<(Vec<Article>, i64), RequestError> {
    let filter = ArticleFilter {
        followed_by: Some(viewer),
        ..Default::default()
    };
    query_articles(conn, Some(viewer), filter, limit, offset).await
}

pub async fn get_article_by_slug_in_db(
    conn: &mut SqliteConnection,
    slug: &str,
    viewer: Option<i64>,
) -> Result<Option<Article>, RequestError> {
    let query = format!("{ARTICLE_SELECT} WHERE articles.slug = ?2");
    let result = sqlx::query_as::<_, Article>(&query)
        .bind(viewer)
        .bind(slug)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(result)
}

async fn fetch_article(
    conn: &mut SqliteConnection,
    slug: &str,
    viewer: Option<i64>,
) -> Result<Article, RequestError> {
    get_article_by_slug_in_db(conn, slug, viewer)
        .await?
        .ok_or(RequestError::NotFound("Article not found"))
}

/// Looks the article up and checks that `user_id` wrote it.
async fn owned_article_id(
    conn: &mut SqliteConnection,
    user_id: i64,
    slug: &str,
) -> Result<i64, RequestError> {
    let (article_id, author_id) =
        sqlx::query_as::<_, (i64, i64)>("SELECT id, author_id FROM articles WHERE slug = ?1")
            .bind(slug)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or(RequestError::NotFound("Article not found"))?;
    if author_id != user_id {
        return Err(RequestError::Forbidden("Only the author can change this article"));
    }
    Ok(article_id)
}

/// Trimmed tag names with duplicates removed, first occurrence wins.
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !normalized.iter().any(|seen| seen == tag) {
            normalized.push(tag.to_owned());
        }
    }
    normalized
}

pub async fn create_article_in_db(
    conn: &mut SqliteConnection,
    author_id: i64,
    CreateArticleRequest {
        title,
        description,
        body,
        tag_list,
    }: CreateArticleRequest,
) -> Result<Article, RequestError> {
    let slug = slugify(&title);

    let article_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO articles (slug, title, description, body, author_id)
        VALUES (?1, ?2, ?3, ?4, ?5)
        RETURNING id
        "#,
    )
    .bind(slug.as_str())
    .bind(title.as_str())
    .bind(description.as_str())
    .bind(body.as_str())
    .bind(author_id)
    .fetch_one(&mut *conn)
    .await?;

    set_article_tags(conn, article_id, &normalize_tags(tag_list)).await?;

    fetch_article(conn, &slug, Some(author_id)).await
}

pub async fn update_article_in_db(
    conn: &mut SqliteConnection,
    user_id: i64,
    slug: &str,
    UpdateArticleRequest {
        title,
        description,
        body,
        tag_list,
    }: UpdateArticleRequest,
) -> Result<Article, RequestError> {
    let article_id = owned_article_id(conn, user_id, slug).await?;
    let new_slug = title.as_deref().map(slugify);

    sqlx::query(
        r#"
        UPDATE articles
        SET slug        = COALESCE(?2, slug),
            title       = COALESCE(?3, title),
            description = COALESCE(?4, description),
            body        = COALESCE(?5, body),
            updated_at  = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?1
        "#,
    )
    .bind(article_id)
    .bind(new_slug.as_deref())
    .bind(title.as_deref())
    .bind(description.as_deref())
    .bind(body.as_deref())
    .execute(&mut *conn)
    .await?;

    if let Some(tags) = tag_list {
        set_article_tags(conn, article_id, &normalize_tags(tags)).await?;
    }

    let slug = new_slug.as_deref().unwrap_or(slug);
    fetch_article(conn, slug, Some(user_id)).await
}

pub async fn delete_article_in_db(
    conn: &mut SqliteConnection,
    user_id: i64,
    slug: &str,
) -> Result<(), RequestError> {
    let article_id = owned_article_id(conn, user_id, slug).await?;
    sqlx::query("DELETE FROM articles WHERE id = ?1")
        .bind(article_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn favorite_article_in_db(
    conn: &mut SqliteConnection,
    user_id: i64,
    slug: &str,
) -> Result<Article, RequestError> {
    let article = fetch_article(conn, slug, Some(user_id)).await?;
    sqlx::query("INSERT OR IGNORE INTO favorites (user_id, article_id) VALUES (?1, ?2)")
        .bind(user_id)
        .bind(article.id)
        .execute(&mut *conn)
        .await?;
    fetch_article(conn, slug, Some(user_id)).await
}

pub async fn unfavorite_article_in_db(
    conn: &mut SqliteConnection,
    user_id: i64,
    slug: &str,
) -> Result<Article, RequestError> {
    let article = fetch_article(conn, slug, Some(user_id)).await?;
    sqlx::query("DELETE FROM favorites WHERE user_id = ?1 AND article_id = ?2")
        .bind(user_id)
        .bind(article.id)
        .execute(&mut *conn)
        .await?;
    fetch_article(conn, slug, Some(user_id)).await
}
