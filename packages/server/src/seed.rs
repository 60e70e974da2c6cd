use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;
use uuid::Uuid;

use crate::config::SeedConfig;
use crate::entity::{blog_post, user};
use crate::utils::hash;

/// Create the bootstrap admin account when one is configured and absent.
pub async fn ensure_admin_user(db: &DatabaseConnection, config: &SeedConfig) -> Result<(), DbErr> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };
    let email = email.trim().to_lowercase();

    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&email))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let hash = hash::hash_password(password)
        .map_err(|e| DbErr::Custom(format!("Failed to hash seed admin password: {e}")))?;

    let now = chrono::Utc::now();
    let model = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.clone()),
        full_name: Set(Some("Site Admin".to_string())),
        password: Set(hash),
        role: Set(user::Role::Admin),
        created_at: Set(now),
        updated_at: Set(now),
    };

    // Two instances may race on startup; the loser's insert is a no-op.
    let result = user::Entity::insert(model)
        .on_conflict(
            OnConflict::column(user::Column::Email)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) => {
            info!("Seeded admin user {email}");
            Ok(())
        }
        Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Composite index for visibility-filtered, newest-first list queries:
    // SELECT * FROM blog_posts WHERE status = ? ORDER BY created_at DESC
    let status_created = Index::create()
        .if_not_exists()
        .name("idx_blog_posts_status_created")
        .table(blog_post::Entity)
        .col(blog_post::Column::Status)
        .col(blog_post::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    // Author scoping: own-draft visibility and per-account post counts.
    let author = Index::create()
        .if_not_exists()
        .name("idx_blog_posts_author")
        .table(blog_post::Entity)
        .col(blog_post::Column::AuthorId)
        .to_string(PostgresQueryBuilder);

    for stmt in [status_created, author] {
        db.execute_unprepared(&stmt).await?;
    }
    info!("Ensured blog_posts indexes exist");

    Ok(())
}
