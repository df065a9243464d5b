use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::blog_post::{BlogPost, BlogStatus};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogPostPayload {
    #[validate(length(min = 1, message = "o título é obrigatório"))]
    pub title: String,
    #[validate(length(min = 1, message = "o conteúdo é obrigatório"))]
    pub content: String,
    pub excerpt: Option<String>,
    #[validate(url(message = "URL inválido"))]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub status: Option<BlogStatus>,
    pub author: Option<String>,
    #[validate(range(min = 1, message = "deve ser pelo menos 1"))]
    pub read_time: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogPostPayload {
    #[validate(length(min = 1, message = "o título é obrigatório"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "o conteúdo é obrigatório"))]
    pub content: Option<String>,
    pub excerpt: Option<String>,
    #[validate(url(message = "URL inválido"))]
    pub cover_image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub status: Option<BlogStatus>,
    pub author: Option<String>,
    #[validate(range(min = 1, message = "deve ser pelo menos 1"))]
    pub read_time: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub status: BlogStatus,
    pub author: Option<String>,
    pub read_time: Option<i32>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogListQuery {
    pub status: Option<BlogStatus>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl From<BlogPost> for BlogPostResponse {
    fn from(value: BlogPost) -> Self {
        Self {
            id: value.id,
            title: value.title,
            content: value.content,
            excerpt: value.excerpt,
            cover_image: value.cover_image,
            tags: value.tags,
            category: value.category,
            status: value.status,
            author: value.author,
            read_time: value.read_time,
            published_at: value.published_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
