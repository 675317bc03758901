/// Main entry point for the Wellness Journal MCP server
///
/// This file loads `.env`, parses command line arguments, sets up logging,
/// and starts the MCP server. The server listens for JSON-RPC requests over
/// stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use wellness_journal_mcp::config::default_data_dir;
use wellness_journal_mcp::insights::{DEFAULT_API_BASE, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use wellness_journal_mcp::{AppConfig, InsightConfig, JournalServer, StorageBackend};

/// Command line arguments for the Wellness Journal MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the journal data file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, env = "JOURNAL_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Storage backend for the journal
    #[arg(long, value_enum, env = "JOURNAL_BACKEND", default_value_t = StorageBackend::Json)]
    backend: StorageBackend,

    /// API key for AI analysis; AI analysis is disabled without one
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Chat model used for AI analysis
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    openai_model: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_API_BASE)]
    openai_base_url: String,

    /// Maximum tokens in a model answer
    #[arg(long, env = "OPENAI_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> AppConfig {
        let data_file = self
            .data_file
            .unwrap_or_else(|| default_data_dir().join(self.backend.default_file_name()));

        AppConfig {
            data_file,
            backend: self.backend,
            insights: InsightConfig {
                api_key: self.openai_api_key,
                api_base: self.openai_base_url,
                model: self.openai_model,
                max_tokens: self.max_tokens,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("wellness_journal_mcp={}", log_level))
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();

    info!("Starting Wellness Journal MCP server");

    let config = args.into_config();
    info!("Using {:?} storage at: {}", config.backend, config.data_file.display());

    let server = JournalServer::new(&config)?;

    // Run the MCP server - this will handle JSON-RPC communication over stdin/stdout
    server.run().await?;

    info!("Wellness Journal MCP server shutdown complete");
    Ok(())
}
