/// Public library interface for the Wellness Journal MCP server
///
/// This module exports the server, its configuration, and the journal
/// domain, storage, analytics and insight layers so they can be used by
/// other applications or tests.

use thiserror::Error;

pub mod domain;
pub mod storage;
pub mod analytics;
pub mod insights;
pub mod tools;
pub mod mcp;
pub mod config;

// Re-export the types most callers need
pub use domain::*;
pub use storage::{EntryStore, JsonFileStore, SqliteStore, StorageError};
pub use analytics::{AnalyticsEngine, AnalyticsReport};
pub use insights::{InsightError, InsightRequester, LanguageModel};
pub use config::{AppConfig, InsightConfig, StorageBackend};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main journal server that implements the MCP protocol
///
/// This server owns the entry store, the analytics engine and the insight
/// requester, and exposes them to the MCP tools.
pub struct JournalServer {
    store: Box<dyn EntryStore>,
    analytics: AnalyticsEngine,
    insights: InsightRequester,
}

impl JournalServer {
    /// Create a new journal server from configuration
    ///
    /// This opens (or creates) the configured data file.
    pub fn new(config: &AppConfig) -> Result<Self, ServerError> {
        tracing::info!(
            "Initializing Wellness Journal server with {:?} storage at {:?}",
            config.backend,
            config.data_file
        );

        let store = config.open_store()?;
        let insights = InsightRequester::from_config(&config.insights);

        Ok(Self::with_parts(store, AnalyticsEngine::new(), insights))
    }

    /// Assemble a server from already-built parts
    pub fn with_parts(store: Box<dyn EntryStore>, analytics: AnalyticsEngine, insights: InsightRequester) -> Self {
        Self {
            store,
            analytics,
            insights,
        }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        let entries = self.store.load();
        tracing::info!("Server started successfully, found {} existing entries", entries.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    pub fn store(&self) -> &dyn EntryStore {
        self.store.as_ref()
    }

    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }

    pub fn insights(&self) -> &InsightRequester {
        &self.insights
    }
}
