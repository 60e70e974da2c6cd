mod common;

use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::json;
use uuid::Uuid;

use common::{TestApp, account, post_row, routes, test_config, token_for};
use server::config::AppConfig;
use server::entity::blog_post::{self, PostStatus};
use server::entity::user::Role;

fn parity_mode_config() -> AppConfig {
    let mut config = test_config();
    config.blog.public_slug_lookup = true;
    config
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn creating_a_post_requires_authentication() {
        let app = TestApp::spawn(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let res = app
            .post(
                routes::POSTS,
                None,
                &json!({
                    "title": "Why Reviews Matter",
                    "content": "Full content",
                    "excerpt": "Short excerpt",
                    "status": "draft"
                }),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn a_created_post_is_attributed_and_returned() {
        let author = account("alice@example.com", Role::Author);
        let token = token_for(&author);
        let stored = post_row("why-reviews-matter", PostStatus::Draft, author.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[author]])
            .append_query_results([[stored.clone()]])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app
            .post(
                routes::POSTS,
                Some(&token),
                &json!({
                    "title": "Why Reviews Matter",
                    "content": "Full content",
                    "excerpt": "Short excerpt",
                    "status": "draft"
                }),
            )
            .await;

        assert_eq!(res.status, 201);
        assert_eq!(res.body["slug"], "why-reviews-matter");
        assert_eq!(res.body["author_id"], json!(stored.author_id));
        assert_eq!(res.body["status"], "draft");
    }

    #[tokio::test]
    async fn a_blank_title_is_rejected() {
        let author = account("alice@example.com", Role::Author);
        let token = token_for(&author);
        let app = TestApp::spawn(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let res = app
            .post(
                routes::POSTS,
                Some(&token),
                &json!({
                    "title": "  ",
                    "content": "Full content",
                    "excerpt": "Short excerpt",
                    "status": "draft"
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn a_title_with_no_alphanumerics_cannot_produce_a_slug() {
        let author = account("alice@example.com", Role::Author);
        let token = token_for(&author);
        let app = TestApp::spawn(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let res = app
            .post(
                routes::POSTS,
                Some(&token),
                &json!({
                    "title": "!!!",
                    "content": "Full content",
                    "excerpt": "Short excerpt",
                    "status": "draft"
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod updates {
    use super::*;

    #[tokio::test]
    async fn a_published_post_cannot_return_to_draft() {
        let author = account("alice@example.com", Role::Author);
        let token = token_for(&author);
        let stored = post_row("why-reviews-matter", PostStatus::Published, author.id);
        let id = stored.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[stored]])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app
            .patch(&routes::post(id), Some(&token), &json!({"status": "draft"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn updating_a_missing_post_is_not_found() {
        let author = account("alice@example.com", Role::Author);
        let token = token_for(&author);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<blog_post::Model>::new()])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app
            .patch(
                &routes::post(Uuid::new_v4()),
                Some(&token),
                &json!({"title": "New Title"}),
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod publishing {
    use super::*;

    #[tokio::test]
    async fn publishing_a_draft_stamps_published_at() {
        let author = account("alice@example.com", Role::Author);
        let token = token_for(&author);
        let draft = post_row("why-reviews-matter", PostStatus::Draft, author.id);
        let id = draft.id;
        let published = blog_post::Model {
            status: PostStatus::Published,
            published_at: Some(chrono::Utc::now()),
            ..draft.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[draft]])
            .append_query_results([[published]])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app.post_empty(&routes::post_publish(id), Some(&token)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "published");
        assert!(res.body["published_at"].is_string());
    }

    #[tokio::test]
    async fn republishing_keeps_the_status_published() {
        let author = account("alice@example.com", Role::Author);
        let token = token_for(&author);
        let already = post_row("why-reviews-matter", PostStatus::Published, author.id);
        let id = already.id;
        let refreshed = blog_post::Model {
            published_at: Some(chrono::Utc::now()),
            updated_at: chrono::Utc::now(),
            ..already.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[already]])
            .append_query_results([[refreshed]])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app.post_empty(&routes::post_publish(id), Some(&token)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "published");
    }

    #[tokio::test]
    async fn publishing_a_missing_post_is_not_found() {
        let author = account("alice@example.com", Role::Author);
        let token = token_for(&author);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<blog_post::Model>::new()])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app
            .post_empty(&routes::post_publish(Uuid::new_v4()), Some(&token))
            .await;

        assert_eq!(res.status, 404);
    }
}

mod deletion {
    use super::*;

    #[tokio::test]
    async fn deleting_an_existing_post_succeeds_silently() {
        let author = account("alice@example.com", Role::Author);
        let token = token_for(&author);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app.delete(&routes::post(Uuid::new_v4()), Some(&token)).await;

        assert_eq!(res.status, 204);
    }

    #[tokio::test]
    async fn deleting_a_missing_post_is_not_found() {
        let author = account("alice@example.com", Role::Author);
        let token = token_for(&author);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app.delete(&routes::post(Uuid::new_v4()), Some(&token)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod reads {
    use super::*;

    #[tokio::test]
    async fn anonymous_list_returns_published_posts() {
        let rows = vec![
            post_row("first-post", PostStatus::Published, Uuid::new_v4()),
            post_row("second-post", PostStatus::Published, Uuid::new_v4()),
        ];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app.get(routes::POSTS, None).await;

        assert_eq!(res.status, 200);
        let posts = res.body.as_array().unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p["status"] == "published"));
    }

    #[tokio::test]
    async fn the_public_feed_ignores_authentication() {
        let rows = vec![post_row("first-post", PostStatus::Published, Uuid::new_v4())];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app.get(routes::PUBLISHED_POSTS, None).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body.as_array().unwrap().len(), 1);
    }
}

mod slug_lookup {
    use super::*;
    use common::RecordingMailer;

    #[tokio::test]
    async fn a_draft_is_hidden_from_the_public_by_default() {
        let draft = post_row("hidden-draft", PostStatus::Draft, Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[draft]])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app.get(&routes::post_by_slug("hidden-draft"), None).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn the_author_still_reaches_their_own_draft() {
        let author = account("alice@example.com", Role::Author);
        let token = token_for(&author);
        let draft = post_row("my-draft", PostStatus::Draft, author.id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[draft]])
            .append_query_results([[author]])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app.get(&routes::post_by_slug("my-draft"), Some(&token)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["slug"], "my-draft");
    }

    #[tokio::test]
    async fn parity_mode_exposes_drafts_to_anyone_with_the_slug() {
        let draft = post_row("hidden-draft", PostStatus::Draft, Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[draft]])
            .into_connection();
        let app = TestApp::spawn_with(db, parity_mode_config(), RecordingMailer::accepting());

        let res = app.get(&routes::post_by_slug("hidden-draft"), None).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "draft");
    }

    #[tokio::test]
    async fn an_unknown_slug_is_not_found_in_both_modes() {
        for config in [test_config(), parity_mode_config()] {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<blog_post::Model>::new()])
                .into_connection();
            let app = TestApp::spawn_with(db, config, RecordingMailer::accepting());

            let res = app.get(&routes::post_by_slug("no-such-post"), None).await;
            assert_eq!(res.status, 404);
        }
    }

    #[tokio::test]
    async fn a_published_post_is_readable_by_the_public() {
        let published = post_row("live-post", PostStatus::Published, Uuid::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[published]])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app.get(&routes::post_by_slug("live-post"), None).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["slug"], "live-post");
    }
}

mod by_id {
    use super::*;

    #[tokio::test]
    async fn another_authors_draft_reads_as_absent() {
        let caller = account("alice@example.com", Role::User);
        let token = token_for(&caller);
        let foreign_draft = post_row("foreign-draft", PostStatus::Draft, Uuid::new_v4());
        let id = foreign_draft.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[foreign_draft]])
            .append_query_results([[caller]])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app.get(&routes::post(id), Some(&token)).await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn an_admin_reads_any_draft() {
        let admin = account("admin@trendbase.com", Role::Admin);
        let token = token_for(&admin);
        let foreign_draft = post_row("foreign-draft", PostStatus::Draft, Uuid::new_v4());
        let id = foreign_draft.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[foreign_draft]])
            .append_query_results([[admin]])
            .into_connection();
        let app = TestApp::spawn(db);

        let res = app.get(&routes::post(id), Some(&token)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["slug"], "foreign-draft");
    }
}
