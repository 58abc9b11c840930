use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use notion_dbctl::commands;
use notion_dbctl::config::Settings;
use notion_dbctl::notion::NotionClient;

#[derive(Debug, Parser)]
#[command(author, version, about = "Manage Notion databases under a parent page")]
struct Args {
    /// Path to the env file holding NOTION_API_KEY and NOTION_PARENT_PAGE_ID
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a database under the configured parent page
    Create {
        /// Database title
        title: String,
        /// Column schema: a JSON object of name -> type pairs
        /// (e.g. '{"User": "title", "Score": "number"}') or a path to a
        /// JSON file containing one
        properties: String,
    },
    /// Archive a database (Notion has no hard delete)
    Delete {
        /// Database ID
        database_id: String,
    },
    /// Archive all pages in a database
    Clear {
        /// Database ID
        database_id: String,
    },
    /// Print a database's property schema
    Inspect {
        /// Database ID
        database_id: String,
    },
    /// List databases visible to the integration
    Search,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    // Credentials are resolved before any subcommand logic runs.
    let settings = match Settings::load(&args.env_file) {
        Ok(settings) => settings,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match run(&args.command, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: &Command, settings: &Settings) -> Result<()> {
    let client = NotionClient::new(settings.api_key.clone(), settings.version.clone());
    match command {
        Command::Create { title, properties } => {
            commands::create(&client, settings, title, properties).await
        }
        Command::Delete { database_id } => commands::delete(&client, database_id).await,
        Command::Clear { database_id } => commands::clear(&client, database_id).await,
        Command::Inspect { database_id } => commands::inspect(&client, database_id).await,
        Command::Search => commands::search(&client).await,
    }
}
