use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::blog_post::{self, PostStatus};
use crate::entity::user;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, MaybeAuthUser};
use crate::extractors::json::AppJson;
use crate::models::post::{
    CreatePostRequest, PostResponse, UpdatePostRequest, validate_create_post,
    validate_update_post,
};
use crate::state::AppState;
use crate::utils::slug::slugify;
use crate::visibility::{resolve_tier, tier_allows, visibility_filter};

#[utoipa::path(
    post,
    path = "/",
    tag = "Posts",
    operation_id = "createPost",
    summary = "Create a post",
    description = "Creates a post attributed to the caller. The slug is derived from the title when not supplied; either way it is normalized. Author name and email are resolved from the caller's user row, falling back to the session claims when the row is missing.",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_post(&payload)?;

    let slug = resolve_slug(payload.slug.as_deref(), &payload.title)?;

    // Denormalized author identity, from the user row when it exists.
    let author = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?;
    let (author_name, author_email) = match author {
        Some(u) => (u.full_name.unwrap_or_else(|| u.email.clone()), u.email),
        None => (
            auth_user
                .full_name
                .clone()
                .unwrap_or_else(|| auth_user.email.clone()),
            auth_user.email.clone(),
        ),
    };

    let now = chrono::Utc::now();
    let new_post = blog_post::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title.trim().to_string()),
        content: Set(payload.content),
        excerpt: Set(payload.excerpt),
        slug: Set(slug),
        featured_image: Set(payload.featured_image),
        author_id: Set(auth_user.user_id),
        author_name: Set(author_name),
        author_email: Set(author_email),
        status: Set(payload.status),
        published_at: Set(None),
        tags: Set(payload.tags.map(|t| serde_json::json!(t))),
        meta_description: Set(payload.meta_description),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = new_post.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Posts",
    operation_id = "listPosts",
    summary = "List posts visible to the caller",
    description = "Anonymous callers get published posts. Authenticated non-admins additionally get their own drafts. Admins get everything. Newest first.",
    responses(
        (status = 200, description = "Visible posts", body = Vec<PostResponse>),
        (status = 401, description = "Malformed token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, maybe_user))]
pub async fn list_posts(
    maybe_user: MaybeAuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let tier = resolve_tier(&state.db, maybe_user.0.as_ref()).await;

    let mut select = blog_post::Entity::find();
    if let Some(filter) = visibility_filter(&tier) {
        select = select.filter(filter);
    }

    let rows = select
        .order_by_desc(blog_post::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(PostResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/published",
    tag = "Posts",
    operation_id = "listPublishedPosts",
    summary = "List published posts",
    description = "The public feed: published posts only, regardless of any presented token. Newest first.",
    responses(
        (status = 200, description = "Published posts", body = Vec<PostResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_published_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let rows = blog_post::Entity::find()
        .filter(blog_post::Column::Status.eq(PostStatus::Published))
        .order_by_desc(blog_post::Column::CreatedAt)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(PostResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/slug/{slug}",
    tag = "Posts",
    operation_id = "getPostBySlug",
    summary = "Fetch a post by slug",
    description = "Single-post lookup for public article pages. Unless `blog.public_slug_lookup` is enabled, the caller's visibility tier applies and invisible posts read as absent.",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 404, description = "No visible post with this slug (NOT_FOUND)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, maybe_user), fields(slug = %slug))]
pub async fn get_post_by_slug(
    maybe_user: MaybeAuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let post = blog_post::Entity::find()
        .filter(blog_post::Column::Slug.eq(&slug))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

    if !state.config.blog.public_slug_lookup {
        let tier = resolve_tier(&state.db, maybe_user.0.as_ref()).await;
        if !tier_allows(&tier, &post) {
            // Invisible posts read as absent, not forbidden.
            return Err(AppError::NotFound("Post not found".into()));
        }
    }

    Ok(Json(PostResponse::from(post)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Posts",
    operation_id = "getPost",
    summary = "Fetch a post by id",
    description = "Single-post fetch for the manage view, filtered by the caller's visibility tier.",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No visible post with this id (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn get_post(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, AppError> {
    let post = find_post(&state.db, id).await?;

    let tier = resolve_tier(&state.db, Some(&auth_user)).await;
    if !tier_allows(&tier, &post) {
        return Err(AppError::NotFound("Post not found".into()));
    }

    Ok(Json(PostResponse::from(post)))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Posts",
    operation_id = "updatePost",
    summary = "Update a post",
    description = "Partially updates a post using PATCH semantics — only provided fields are modified, and `updated_at` is refreshed. `featured_image`, `tags`, and `meta_description` support three-state updates (omit, null, value). Setting `status` to `draft` on a published post is rejected.",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, payload), fields(id = %id))]
pub async fn update_post(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    validate_update_post(&payload)?;

    if payload == UpdatePostRequest::default() {
        let existing = find_post(&state.db, id).await?;
        return Ok(Json(existing.into()));
    }

    let txn = state.db.begin().await?;

    let existing = find_post(&txn, id).await?;
    let was_published = existing.status == PostStatus::Published;
    let mut active: blog_post::ActiveModel = existing.into();

    let now = chrono::Utc::now();

    if let Some(ref title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(excerpt) = payload.excerpt {
        active.excerpt = Set(excerpt);
    }
    if let Some(ref slug) = payload.slug {
        active.slug = Set(resolve_slug(Some(slug), slug)?);
    }
    match payload.status {
        Some(PostStatus::Draft) if was_published => {
            return Err(AppError::Validation(
                "Published posts cannot return to draft".into(),
            ));
        }
        Some(PostStatus::Published) if !was_published => {
            active.status = Set(PostStatus::Published);
            active.published_at = Set(Some(now));
        }
        _ => {}
    }
    if let Some(featured_image) = payload.featured_image {
        active.featured_image = Set(featured_image);
    }
    match payload.tags {
        Some(Some(tags)) => active.tags = Set(Some(serde_json::json!(tags))),
        Some(None) => active.tags = Set(None),
        None => {}
    }
    if let Some(meta_description) = payload.meta_description {
        active.meta_description = Set(meta_description);
    }
    active.updated_at = Set(now);

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/{id}/publish",
    tag = "Posts",
    operation_id = "publishPost",
    summary = "Publish a post",
    description = "Sets the post to `published` and stamps `published_at` and `updated_at`. Republishing an already-published post just refreshes the timestamps.",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post published", body = PostResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id = %id))]
pub async fn publish_post(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostResponse>, AppError> {
    let txn = state.db.begin().await?;

    let existing = find_post(&txn, id).await?;
    let mut active: blog_post::ActiveModel = existing.into();

    let now = chrono::Utc::now();
    active.status = Set(PostStatus::Published);
    active.published_at = Set(Some(now));
    active.updated_at = Set(now);

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Posts",
    operation_id = "deletePost",
    summary = "Delete a post",
    description = "Permanently deletes a post. Deleting an id that does not exist is a 404.",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Post not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id = %id))]
pub async fn delete_post(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = blog_post::Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Post not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Normalize an explicit slug, falling back to the title.
fn resolve_slug(explicit: Option<&str>, title: &str) -> Result<String, AppError> {
    let source = explicit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(title);
    let slug = slugify(source);
    if slug.is_empty() {
        return Err(AppError::Validation(
            "Slug must contain at least one alphanumeric character".into(),
        ));
    }
    Ok(slug)
}

async fn find_post<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<blog_post::Model, AppError> {
    blog_post::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}
