use std::time::Duration;

use clap::{Parser, ValueEnum};
use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database};

#[derive(Clone, Copy, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<Command> for MigrationCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Up => MigrationCommand::Up,
            Command::Down => MigrationCommand::Down,
            Command::Fresh => MigrationCommand::Fresh,
            Command::Reset => MigrationCommand::Reset,
            Command::Refresh => MigrationCommand::Refresh,
            Command::Status => MigrationCommand::Status,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Env {
    Prod,
    Test,
}

impl Env {
    fn url_var(self) -> &'static str {
        match self {
            Env::Prod => "DATABASE_URL",
            Env::Test => "TEST_DATABASE_URL",
        }
    }
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Ledger API database migration tool")]
struct Args {
    /// Migration command to run
    #[arg(value_enum)]
    command: Command,

    /// Runtime environment; selects DATABASE_URL or TEST_DATABASE_URL
    #[arg(short, long, value_enum, default_value = "test")]
    env: Env,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,sqlx=warn")
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let var = args.env.url_var();

    let url = match std::env::var(var) {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            eprintln!("❌ {var} must be set");
            std::process::exit(2);
        }
    };

    if matches!(args.env, Env::Test) && !database_name(&url).is_some_and(|n| n.ends_with("_test")) {
        eprintln!("❌ {var} must point at a database whose name ends with '_test'");
        std::process::exit(2);
    }

    let mut opt = ConnectOptions::new(url);
    opt.max_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = match Database::connect(opt).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to connect: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate(&db, args.command.into()).await {
        eprintln!("❌ Migration failed: {e}");
        std::process::exit(1);
    }
}

fn database_name(url: &str) -> Option<&str> {
    let tail = &url[url.rfind('/')? + 1..];
    tail.split('?').next()
}
