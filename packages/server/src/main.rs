use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use mailer::{HttpMailer, Mailer};
use tracing::info;

use server::config::AppConfig;
use server::state::AppState;
use server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;
    seed::ensure_indexes(&db)
        .await
        .context("Failed to ensure indexes")?;
    seed::ensure_admin_user(&db, &config.seed)
        .await
        .context("Failed to seed admin user")?;

    let mailer: Arc<dyn Mailer> = Arc::new(HttpMailer::new(config.email.clone()));

    let host = config
        .server
        .host
        .parse()
        .context("Invalid server.host address")?;
    let addr = SocketAddr::new(host, config.server.port);

    let state = AppState {
        db,
        mailer,
        config: Arc::new(config),
    };
    let app = build_router(state);

    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
