use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::blog_post::{self, PostStatus};
use crate::error::AppError;
use crate::models::shared::{double_option, validate_title};

const MAX_CONTENT_BYTES: usize = 1_000_000;
const MAX_EXCERPT_CHARS: usize = 512;
const MAX_META_DESCRIPTION_CHARS: usize = 512;
const MAX_TAGS: usize = 32;
const MAX_TAG_CHARS: usize = 64;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    /// Explicit slug override; derived from the title when omitted. Either
    /// way the stored slug is normalized.
    pub slug: Option<String>,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub tags: Option<Vec<String>>,
    pub meta_description: Option<String>,
}

#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
    /// A `draft -> published` transition here behaves like a publish;
    /// `published -> draft` is rejected.
    pub status: Option<PostStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub featured_image: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub tags: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub meta_description: Option<Option<String>>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub slug: String,
    pub featured_image: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub status: PostStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
    pub meta_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<blog_post::Model> for PostResponse {
    fn from(m: blog_post::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            content: m.content,
            excerpt: m.excerpt,
            slug: m.slug,
            featured_image: m.featured_image,
            author_id: m.author_id,
            author_name: m.author_name,
            author_email: m.author_email,
            status: m.status,
            published_at: m.published_at,
            tags: m.tags.and_then(|v| serde_json::from_value(v).ok()),
            meta_description: m.meta_description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

fn validate_content(content: &str) -> Result<(), AppError> {
    if content.trim().is_empty() || content.len() > MAX_CONTENT_BYTES {
        return Err(AppError::Validation(
            "Content must be non-empty and at most 1MB".into(),
        ));
    }
    Ok(())
}

fn validate_excerpt(excerpt: &str) -> Result<(), AppError> {
    if excerpt.trim().is_empty() || excerpt.chars().count() > MAX_EXCERPT_CHARS {
        return Err(AppError::Validation(
            "Excerpt must be non-empty and at most 512 characters".into(),
        ));
    }
    Ok(())
}

fn validate_meta_description(meta: &str) -> Result<(), AppError> {
    if meta.chars().count() > MAX_META_DESCRIPTION_CHARS {
        return Err(AppError::Validation(
            "Meta description must be at most 512 characters".into(),
        ));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), AppError> {
    if tags.len() > MAX_TAGS {
        return Err(AppError::Validation("At most 32 tags are allowed".into()));
    }
    if tags
        .iter()
        .any(|t| t.trim().is_empty() || t.chars().count() > MAX_TAG_CHARS)
    {
        return Err(AppError::Validation(
            "Tags must be non-empty and at most 64 characters each".into(),
        ));
    }
    Ok(())
}

pub fn validate_create_post(req: &CreatePostRequest) -> Result<(), AppError> {
    validate_title(&req.title)?;
    validate_content(&req.content)?;
    validate_excerpt(&req.excerpt)?;
    if let Some(ref meta) = req.meta_description {
        validate_meta_description(meta)?;
    }
    if let Some(ref tags) = req.tags {
        validate_tags(tags)?;
    }
    Ok(())
}

pub fn validate_update_post(req: &UpdatePostRequest) -> Result<(), AppError> {
    if let Some(ref title) = req.title {
        validate_title(title)?;
    }
    if let Some(ref content) = req.content {
        validate_content(content)?;
    }
    if let Some(ref excerpt) = req.excerpt {
        validate_excerpt(excerpt)?;
    }
    if let Some(Some(ref meta)) = req.meta_description {
        validate_meta_description(meta)?;
    }
    if let Some(Some(ref tags)) = req.tags {
        validate_tags(tags)?;
    }
    Ok(())
}
