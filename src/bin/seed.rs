use clap::Parser;
use dotenvy::dotenv;
use northstar::app;
use northstar::seeds;
use sqlx::sqlite::SqlitePoolOptions;
use std::time::Duration;

/// Apply pending database seeds.
#[derive(Debug, Parser)]
#[command(name = "seed")]
struct Args {
    /// Re-run one seed by version even if already applied.
    #[arg(long, value_name = "VERSION")]
    force: Option<i64>,

    /// Re-run every seed.
    #[arg(long)]
    force_all: bool,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let args = Args::parse();

    let config = app::config::Config::from_env()
        .expect("Failed to load config (check DATABASE_URL and other env vars)");

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .expect("Failed to set WAL mode");

    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await
        .expect("Failed to set busy timeout");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let selection = match (args.force_all, args.force) {
        (true, _) => seeds::SeedSelection::All,
        (false, Some(version)) => seeds::SeedSelection::Force(version),
        (false, None) => seeds::SeedSelection::Pending,
    };

    let reports = match seeds::run_selected(&pool, selection).await {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("Seeding failed: {}", e);
            std::process::exit(1);
        }
    };

    for report in reports {
        match report.outcome {
            None => eprintln!("{} {}: already applied", report.version, report.name),
            Some(seeds::SeedOutcome::Applied) => {
                eprintln!("{} {}: applied", report.version, report.name)
            }
            Some(seeds::SeedOutcome::Skipped(reason)) => {
                eprintln!("{} {}: skipped ({})", report.version, report.name, reason)
            }
        }
    }
}
