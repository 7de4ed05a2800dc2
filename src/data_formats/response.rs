use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Article, Comment, Profile, User};

#[derive(Deserialize, Serialize, Debug)]
pub struct UserResponse {
    pub email: String,
    pub token: String,
    pub username: String,
    pub bio: String,
    pub image: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct ProfileResponse {
    pub username: String,
    pub bio: String,
    pub image: Option<String>,
    pub following: bool,
}

#[derive(Deserialize, Serialize, Debug, Default)]
pub struct ArticleResponse {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    #[serde(rename = "tagList")]
    pub tag_list: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    pub favorited: bool,
    #[serde(rename = "favoritesCount")]
    pub favorites_count: i64,
    pub author: ProfileResponse,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CommentResponse {
    pub id: i64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    pub body: String,
    pub author: ProfileResponse,
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl UserResponse {
    pub fn new(
        User {
            username,
            email,
            bio,
            image,
            ..
        }: User,
        token: String,
    ) -> Self {
        UserResponse {
            username,
            email,
            bio: bio.unwrap_or_default(),
            image,
            token,
        }
    }
}

impl ProfileResponse {
    pub fn new(
        Profile {
            username,
            bio,
            image,
            following,
            ..
        }: Profile,
    ) -> Self {
        ProfileResponse::author(username, bio, image, following)
    }

    fn author(
        username: String,
        bio: Option<String>,
        image: Option<String>,
        following: bool,
    ) -> Self {
        ProfileResponse {
            username,
            bio: bio.unwrap_or_default(),
            image,
            following,
        }
    }
}

impl CommentResponse {
    pub fn new(
        Comment {
            id,
            body,
            created_at,
            updated_at,
            author_username,
            author_image,
            author_bio,
            following,
            ..
        }: Comment,
    ) -> Self {
        CommentResponse {
            id,
            created_at: format_timestamp(created_at),
            updated_at: format_timestamp(updated_at),
            body,
            author: ProfileResponse::author(author_username, author_bio, author_image, following),
        }
    }
}

impl ArticleResponse {
    pub fn new(article: Article) -> Self {
        let tag_list = article.tags();
        let Article {
            slug,
            title,
            description,
            body,
            created_at,
            updated_at,
            favorited,
            favorites_count,
            author_username,
            author_image,
            author_bio,
            following,
            ..
        } = article;
        ArticleResponse {
            slug,
            title,
            description,
            body,
            tag_list,
            created_at: format_timestamp(created_at),
            updated_at: format_timestamp(updated_at),
            favorited,
            favorites_count,
            author: ProfileResponse::author(author_username, author_bio, author_image, following),
        }
    }
}
