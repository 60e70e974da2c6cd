//! Post visibility rules.
//!
//! Authorization is decided once per request: the caller's claims are
//! resolved to an [`AccessTier`], and every post read derives its filtering
//! from that tier alone.

use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait};
use tracing::warn;
use uuid::Uuid;

use crate::entity::blog_post::{self, PostStatus};
use crate::entity::user::{self, Role};
use crate::extractors::auth::AuthUser;

/// The caller's effective tier for post reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTier {
    /// No authenticated user: published posts only.
    Public,
    /// Authenticated non-admin: published posts plus their own drafts.
    Member { user_id: Uuid },
    /// Admin: every post, any status.
    Admin { user_id: Uuid },
}

impl AccessTier {
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin { .. })
    }

    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Self::Public => None,
            Self::Member { user_id } | Self::Admin { user_id } => Some(*user_id),
        }
    }
}

/// Resolve the caller's tier from their session claims.
///
/// The role is read from the `users` row, never from the token. When the row
/// is missing or the lookup fails, the caller degrades to `Member` — the
/// lowest authenticated tier — rather than failing the request or escalating.
pub async fn resolve_tier(db: &DatabaseConnection, auth: Option<&AuthUser>) -> AccessTier {
    let Some(auth) = auth else {
        return AccessTier::Public;
    };

    match user::Entity::find_by_id(auth.user_id).one(db).await {
        Ok(Some(row)) if row.role == Role::Admin => AccessTier::Admin {
            user_id: auth.user_id,
        },
        Ok(Some(_)) => AccessTier::Member {
            user_id: auth.user_id,
        },
        Ok(None) => AccessTier::Member {
            user_id: auth.user_id,
        },
        Err(e) => {
            warn!(user_id = %auth.user_id, "Role lookup failed, degrading to member tier: {e}");
            AccessTier::Member {
                user_id: auth.user_id,
            }
        }
    }
}

/// The query predicate a tier applies to `blog_posts`. `None` means
/// unfiltered (admin).
pub fn visibility_filter(tier: &AccessTier) -> Option<Condition> {
    match tier {
        AccessTier::Public => Some(
            Condition::all().add(blog_post::Column::Status.eq(PostStatus::Published)),
        ),
        AccessTier::Member { user_id } => Some(
            Condition::any()
                .add(blog_post::Column::Status.eq(PostStatus::Published))
                .add(blog_post::Column::AuthorId.eq(*user_id)),
        ),
        AccessTier::Admin { .. } => None,
    }
}

/// Row-level form of [`visibility_filter`], for single-post lookups.
pub fn tier_allows(tier: &AccessTier, post: &blog_post::Model) -> bool {
    match tier {
        AccessTier::Public => post.status == PostStatus::Published,
        AccessTier::Member { user_id } => {
            post.status == PostStatus::Published || post.author_id == *user_id
        }
        AccessTier::Admin { .. } => true,
    }
}
