use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset or unparseable. SQL statement logging
/// from sea-orm/sqlx is held back to warn; the dev mailer stays visible.
pub const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn,sea_orm=warn,dev_mailer=warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the JSON stdout subscriber. Repeat calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().json().with_target(true))
        .try_init();
}
