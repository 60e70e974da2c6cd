//! Shared harness for the API tests.
//!
//! The router under test is the real `build_router` output; the store is a
//! scripted `MockDatabase` and the email provider a recording double, so the
//! suite runs without any external service.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use mailer::{EmailMessage, Mailer, MailerConfig, MailerError, SendReceipt};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use server::build_router;
use server::config::{
    AppConfig, AuthConfig, BlogConfig, CorsConfig, DatabaseConfig, SeedConfig, ServerConfig,
};
use server::entity::blog_post::{self, PostStatus};
use server::entity::user::{self, Role};
use server::state::AppState;
use server::utils::jwt;

pub const JWT_SECRET: &str = "test-secret-for-the-suite";

/// Mailer double: records every message and plays back scripted outcomes,
/// defaulting to acceptance once the script runs out.
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    outcomes: Mutex<VecDeque<Result<SendReceipt, MailerError>>>,
}

impl RecordingMailer {
    pub fn accepting() -> Self {
        Self::scripted(vec![])
    }

    pub fn scripted(outcomes: Vec<Result<SendReceipt, MailerError>>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            outcomes: Mutex::new(outcomes.into()),
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> Result<SendReceipt, MailerError> {
        self.sent.lock().unwrap().push(message);
        self.outcomes.lock().unwrap().pop_front().unwrap_or_else(|| {
            Ok(SendReceipt {
                id: "accepted".into(),
            })
        })
    }
}

pub fn rejection() -> Result<SendReceipt, MailerError> {
    Err(MailerError::Provider {
        message: "invalid from address".into(),
    })
}

pub fn acceptance() -> Result<SendReceipt, MailerError> {
    Ok(SendReceipt {
        id: "accepted".into(),
    })
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: "postgres://unused-in-tests".to_string(),
        },
        auth: AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
        },
        email: MailerConfig {
            api_key: "test-key".to_string(),
            ..MailerConfig::default()
        },
        blog: BlogConfig {
            public_slug_lookup: false,
        },
        seed: SeedConfig::default(),
    }
}

/// The application with scripted collaborators.
pub struct TestApp {
    router: Router,
    pub mailer: Arc<RecordingMailer>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestApp {
    pub fn spawn(db: DatabaseConnection) -> Self {
        Self::spawn_with(db, test_config(), RecordingMailer::accepting())
    }

    pub fn spawn_with(db: DatabaseConnection, config: AppConfig, mailer: RecordingMailer) -> Self {
        let mailer = Arc::new(mailer);
        let state = AppState {
            db,
            mailer: mailer.clone(),
            config: Arc::new(config),
        };
        Self {
            router: build_router(state),
            mailer,
        }
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router call failed");

        let status = response.status().as_u16();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: &Value) -> TestResponse {
        self.request("POST", uri, token, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request("POST", uri, token, None).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: &Value) -> TestResponse {
        self.request("PATCH", uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: &Value) -> TestResponse {
        self.request("PUT", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request("DELETE", uri, token, None).await
    }
}

pub mod routes {
    use uuid::Uuid;

    pub const REGISTER: &str = "/api/auth/register";
    pub const LOGIN: &str = "/api/auth/login";
    pub const ME: &str = "/api/auth/me";
    pub const POSTS: &str = "/api/posts";
    pub const PUBLISHED_POSTS: &str = "/api/posts/published";
    pub const USERS: &str = "/api/users";
    pub const USER_ROLE: &str = "/api/users/role";
    pub const CONTACT: &str = "/api/contact";

    pub fn post(id: Uuid) -> String {
        format!("/api/posts/{id}")
    }

    pub fn post_publish(id: Uuid) -> String {
        format!("/api/posts/{id}/publish")
    }

    pub fn post_by_slug(slug: &str) -> String {
        format!("/api/posts/slug/{slug}")
    }
}

/// A bearer token for the given account, signed with the suite's secret.
pub fn token_for(account: &user::Model) -> String {
    jwt::sign(
        account.id,
        &account.email,
        account.full_name.as_deref(),
        JWT_SECRET,
    )
    .expect("failed to sign test token")
}

pub fn account(email: &str, role: Role) -> user::Model {
    let now = chrono::Utc::now();
    user::Model {
        id: Uuid::new_v4(),
        email: email.to_string(),
        full_name: Some("Test Account".to_string()),
        password: "$argon2id$unused".to_string(),
        role,
        created_at: now,
        updated_at: now,
    }
}

pub fn post_row(slug: &str, status: PostStatus, author_id: Uuid) -> blog_post::Model {
    let now = chrono::Utc::now();
    blog_post::Model {
        id: Uuid::new_v4(),
        title: "Why Reviews Matter".to_string(),
        content: "Full content".to_string(),
        excerpt: "Short excerpt".to_string(),
        slug: slug.to_string(),
        featured_image: None,
        author_id,
        author_name: "Test Account".to_string(),
        author_email: "author@example.com".to_string(),
        status,
        published_at: (status == PostStatus::Published).then_some(now),
        tags: None,
        meta_description: None,
        created_at: now,
        updated_at: now,
    }
}
