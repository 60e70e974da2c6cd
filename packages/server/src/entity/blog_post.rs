use sea_orm::entity::prelude::*;
use sea_orm::prelude::StringLen;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication state of a post. The only exposed transition is
/// `draft -> published`; nothing moves a published post back.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    sea_orm::DeriveActiveEnum,
    sea_orm::EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for PostStatus {
    fn default() -> Self {
        Self::Draft
    }
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub excerpt: String,
    /// Derived from the title (lowercase, non-alphanumeric runs collapsed to
    /// `-`). Uniqueness is enforced by the store, not the application.
    #[sea_orm(unique)]
    pub slug: String,
    pub featured_image: Option<String>,

    /// Set once at creation from the authenticated caller; never reassigned.
    pub author_id: Uuid,
    #[sea_orm(belongs_to, from = "author_id", to = "id")]
    pub author: HasOne<super::user::Entity>,
    /// Denormalized at creation so public reads don't join `users`.
    pub author_name: String,
    pub author_email: String,

    pub status: PostStatus,
    /// Stamped when the post first transitions to `published`.
    pub published_at: Option<DateTimeUtc>,

    /// Tags stored as a JSON array of strings.
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub tags: Option<Json>,
    pub meta_description: Option<String>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
