use anyhow::Context as _;
use clap::Parser;
use sea_orm::Database;

use carlot_api::domain::types::Identity;
use carlot_api::infra::db::DbIdentityRepository;
use carlot_api::usecase::identity::ListUsersUseCase;
use carlot_core::tracing::init_tracing;

/// Print every user with their role.
#[derive(Parser, Debug)]
#[command(name = "list-users", version)]
struct Args {
    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

fn render(users: &[Identity]) -> String {
    if users.is_empty() {
        return "No users found.".to_owned();
    }
    users
        .iter()
        .map(|u| format!("{:>6}  {:<5}  {}", u.id, u.role.as_str(), u.email))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let db = Database::connect(&args.database_url)
        .await
        .context("failed to connect to database")?;

    let users = ListUsersUseCase {
        identities: DbIdentityRepository { db },
    }
    .execute()
    .await
    .context("failed to list users")?;

    println!("{}", render(&users));
    Ok(())
}
