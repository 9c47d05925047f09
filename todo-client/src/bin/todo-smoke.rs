//! todo-smoke - run end-to-end scenarios against a Todo server
//!
//! ```text
//! todo-smoke all
//! todo-smoke --base-url http://localhost:5000 update
//! TODO_API_URL=https://todo.example.com todo-smoke get
//! ```

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use todo_client::{ClientConfig, config::DEFAULT_BASE_URL, smoke::{self, Scenario}};

#[derive(Debug, Parser)]
#[command(name = "todo-smoke", version, about = "Smoke test a running Todo API")]
struct Cli {
    /// Server base URL
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Send this Origin header with every request
    #[arg(long)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Run every scenario
    All,
    /// Create todos, including invalid input
    Create,
    /// List, filter, sort and fetch todos
    Get,
    /// Partial updates and priority changes
    Update,
    /// Delete todos and verify the totals
    Delete,
}

impl Command {
    fn scenarios(self) -> Vec<Scenario> {
        match self {
            Command::All => Scenario::ALL.to_vec(),
            Command::Create => vec![Scenario::Create],
            Command::Get => vec![Scenario::Get],
            Command::Update => vec![Scenario::Update],
            Command::Delete => vec![Scenario::Delete],
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::new(&cli.base_url).with_timeout(cli.timeout);
    if let Some(origin) = cli.origin {
        config = config.with_origin(origin);
    }
    let client = match config.build_http_client() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("Target: {}", client.base_url());
    match client.health().await {
        Ok(health) => println!(
            "Health: {} (database {})",
            health.status, health.database
        ),
        Err(e) => {
            eprintln!("Server unreachable: {e}");
            return ExitCode::FAILURE;
        }
    }

    let reports = smoke::run_all(&client, &cli.command.scenarios()).await;
    for report in &reports {
        println!("{report}");
    }

    let failed: usize = reports.iter().map(|r| r.failed()).sum();
    let total: usize = reports.iter().map(|r| r.steps.len()).sum();
    println!("Total: {} steps, {} failed", total, failed);

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
