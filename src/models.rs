use chrono::{DateTime, Utc};
use sqlx::types::Json;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user as seen by the viewer.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub image: Option<String>,
    pub bio: Option<String>,
    pub following: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Article {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub author_id: i64,
    /// Tag names aggregated with `json_group_array`.
    pub tag_list: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub favorited: bool,
    pub favorites_count: i64,
    pub author_username: String,
    pub author_image: Option<String>,
    pub author_bio: Option<String>,
    pub following: bool,
}

impl Article {
    pub fn tags(&self) -> Vec<String> {
        let mut tags = self.tag_list.0.clone();
        tags.sort();
        tags
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub article_id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub author_image: Option<String>,
    pub author_bio: Option<String>,
    pub following: bool,
}
