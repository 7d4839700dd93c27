//! SageAlpha CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Initialize configuration
//! - `gateway` — Start the HTTP API server
//! - `query`   — Ask a single retrieval-augmented question

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "sagealpha",
    about = "SageAlpha — retrieval-augmented financial chat backend",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask a single question against the document index
    Query {
        /// The question text
        text: String,

        /// Number of documents to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Query { text, top_k } => commands::query::run(&text, top_k).await?,
    }

    Ok(())
}
