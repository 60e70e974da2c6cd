use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::user::{self, Role};
use crate::error::AppError;
use crate::models::shared::validate_email;

/// A user row as returned to admins, with the number of posts attributed to
/// the account.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserListItem {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub post_count: i64,
}

/// Merge user rows with per-author post counts into list items, preserving
/// the row order. Authors without posts get a zero count.
pub fn merge_post_counts(
    users: Vec<user::Model>,
    counts: Vec<(Uuid, i64)>,
) -> Vec<UserListItem> {
    let counts: std::collections::HashMap<Uuid, i64> = counts.into_iter().collect();
    users
        .into_iter()
        .map(|u| {
            let post_count = counts.get(&u.id).copied().unwrap_or(0);
            UserListItem {
                id: u.id,
                email: u.email,
                full_name: u.full_name,
                role: u.role,
                created_at: u.created_at,
                post_count,
            }
        })
        .collect()
}

/// Request body for a role change.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RoleChangeRequest {
    /// Email of the account whose role changes.
    #[schema(example = "alice@example.com")]
    pub target_email: String,
    #[schema(example = "admin")]
    pub new_role: Role,
}

pub fn validate_role_change_request(payload: &RoleChangeRequest) -> Result<(), AppError> {
    validate_email(&payload.target_email)
}

/// The audit record of one applied role change. Execution stays a single
/// store update; this value is what gets logged.
#[derive(Debug, Serialize)]
pub struct RoleChange {
    pub target_email: String,
    pub new_role: Role,
    pub acting_admin_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

/// A user row as returned after a mutation.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            full_name: u.full_name,
            role: u.role,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}
