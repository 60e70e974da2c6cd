use axum::{Json, extract::State};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{blog_post, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::user::{
    RoleChange, RoleChangeRequest, UserListItem, UserResponse, merge_post_counts,
    validate_role_change_request,
};
use crate::state::AppState;
use crate::visibility::resolve_tier;

#[utoipa::path(
    get,
    path = "/",
    tag = "Users",
    operation_id = "listUsers",
    summary = "List all accounts",
    description = "Returns every account with the number of posts attributed to it, newest accounts first. Admin only.",
    responses(
        (status = 200, description = "Accounts", body = Vec<UserListItem>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_users(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserListItem>>, AppError> {
    require_admin(&state, &auth_user).await?;

    let users = user::Entity::find()
        .order_by_desc(user::Column::CreatedAt)
        .all(&state.db)
        .await?;

    // One grouped aggregate instead of a count query per account.
    let counts: Vec<(Uuid, i64)> = blog_post::Entity::find()
        .select_only()
        .column(blog_post::Column::AuthorId)
        .column_as(blog_post::Column::Id.count(), "post_count")
        .group_by(blog_post::Column::AuthorId)
        .into_tuple()
        .all(&state.db)
        .await?;

    Ok(Json(merge_post_counts(users, counts)))
}

#[utoipa::path(
    put,
    path = "/role",
    tag = "Users",
    operation_id = "changeUserRole",
    summary = "Change an account's role",
    description = "Promotes or demotes the account with the given email. The change is logged as an audit event naming the acting admin before the single row update is applied. Admin only.",
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "Role updated", body = UserResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No account with this email (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(target = %payload.target_email))]
pub async fn change_user_role(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<RoleChangeRequest>,
) -> Result<Json<UserResponse>, AppError> {
    require_admin(&state, &auth_user).await?;
    validate_role_change_request(&payload)?;

    let target_email = payload.target_email.trim().to_lowercase();

    let target = user::Entity::find()
        .filter(user::Column::Email.eq(&target_email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let change = RoleChange {
        target_email,
        new_role: payload.new_role,
        acting_admin_id: auth_user.user_id,
        timestamp: chrono::Utc::now(),
    };
    tracing::info!(
        target = %change.target_email,
        new_role = %change.new_role,
        acting_admin = %change.acting_admin_id,
        "Applying role change"
    );

    let mut active: user::ActiveModel = target.into();
    active.role = Set(change.new_role);
    active.updated_at = Set(change.timestamp);
    let model = active.update(&state.db).await?;

    Ok(Json(UserResponse::from(model)))
}

/// Admin gate for management endpoints. The caller's tier is resolved from
/// the stored role, so the fail-safe degradation in `resolve_tier` also
/// means a broken role lookup can never grant admin access.
async fn require_admin(state: &AppState, auth_user: &AuthUser) -> Result<(), AppError> {
    let tier = resolve_tier(&state.db, Some(auth_user)).await;
    if !tier.is_admin() {
        return Err(AppError::PermissionDenied);
    }
    Ok(())
}
