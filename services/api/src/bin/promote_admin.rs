use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use sea_orm::Database;

use carlot_api::error::ApiError;
use carlot_api::infra::db::DbIdentityRepository;
use carlot_api::usecase::identity::PromoteAdminUseCase;
use carlot_core::tracing::init_tracing;

/// Grant the admin role to an existing user.
#[derive(Parser, Debug)]
#[command(name = "promote-admin", version)]
struct Args {
    /// Email of the user to promote.
    email: String,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let db = Database::connect(&args.database_url)
        .await
        .context("failed to connect to database")?;

    let usecase = PromoteAdminUseCase {
        identities: DbIdentityRepository { db },
    };
    match usecase.execute(&args.email).await {
        Ok(()) => {
            println!("{} is now an admin", args.email);
            Ok(ExitCode::SUCCESS)
        }
        Err(ApiError::UserNotFound) => {
            eprintln!("no user with email {}", args.email);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(anyhow::Error::new(e).context("failed to promote user")),
    }
}
