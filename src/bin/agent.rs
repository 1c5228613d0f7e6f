//! northstar-agent: the agent tools from the command line.
//!
//! Acts as the user named by `NORTHSTAR_USER_ID` (or `--user`) and prints each
//! tool's result as a JSON envelope on stdout.

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use northstar::app::{self, agent};
use sqlx::sqlite::SqlitePoolOptions;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "northstar-agent", version, about = "Query organization goals on behalf of a user")]
struct Cli {
    /// User to act as. Overrides NORTHSTAR_USER_ID.
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Profile, hierarchy, goals and guidelines for the acting user.
    Context {
        /// Print the markdown briefing instead of JSON.
        #[arg(long)]
        markdown: bool,
    },
    /// Goals of every ancestor of an organization, root first.
    ParentGoals {
        org_id: String,
    },
    /// Search goals across the acting user's own org, ancestors and siblings.
    Search {
        keyword: String,
    },
    /// Ask a question on a goal.
    Ask {
        goal_id: String,
        question: String,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    let config = match app::config::Config::from_env() {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let pool = match SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            std::process::exit(2);
        }
    };

    let user_id = cli.user.clone().or_else(|| config.agent_user_id.clone());
    let state = app::AppState::new(pool, config);

    let caller = match agent::resolve_caller(&state.db, user_id.as_deref()).await {
        Ok(caller) => caller,
        Err(err) => exit_with(agent::envelope::<()>(Err(err))),
    };

    let output = match cli.command {
        Command::Context { markdown: true } => {
            match agent::build_user_context(&state, &caller).await {
                Ok(context) => {
                    print!("{}", context.to_markdown());
                    return;
                }
                Err(err) => agent::envelope::<()>(Err(err)),
            }
        }
        Command::Context { markdown: false } => {
            agent::envelope(agent::build_user_context(&state, &caller).await)
        }
        Command::ParentGoals { org_id } => {
            agent::envelope(agent::get_parent_goals(&state, &caller, &org_id).await)
        }
        Command::Search { keyword } => {
            agent::envelope(agent::search_collaborator_goals(&state, &caller, &keyword).await)
        }
        Command::Ask { goal_id, question } => {
            agent::envelope(agent::submit_question(&state, &caller, &goal_id, &question).await)
        }
    };

    if output["success"] == true {
        println!("{output:#}");
    } else {
        exit_with(output);
    }
}

fn exit_with(output: serde_json::Value) -> ! {
    println!("{output:#}");
    std::process::exit(1);
}
