use std::sync::Arc;

use anyhow::Context as _;
use chrono::Duration;
use sea_orm::Database;
use tracing::info;

use carlot_api::config::ApiConfig;
use carlot_api::infra::mailer::Mailer;
use carlot_api::router::build_router;
use carlot_api::state::AppState;
use carlot_auth_types::token::TokenService;
use carlot_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = ApiConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let session_ttl =
        Duration::try_seconds(config.session_ttl_secs).context("SESSION_TTL_SECS out of range")?;
    let code_ttl =
        Duration::try_seconds(config.code_ttl_secs).context("AUTHCODE_TTL_SECS out of range")?;

    let tokens = TokenService::new(&config.jwt_secret, session_ttl)
        .context("failed to build token service")?;
    let mailer = Mailer::from_config(&config.mailer).context("failed to configure mailer")?;

    let state = AppState {
        db,
        tokens: Arc::new(tokens),
        mailer,
        code_ttl,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("api listening on {addr}");
    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
