/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Dispatches tool calls to the journal tools
/// 3. Sends JSON-RPC responses to stdout

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::domain::today;
use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{JournalServer, ServerError};

/// MCP server that handles communication with Claude
pub struct McpServer {
    journal: JournalServer,
    initialized: bool,
}

fn input_schema<T: JsonSchema>() -> Value {
    serde_json::to_value(schema_for!(T)).unwrap_or_else(|_| json!({"type": "object"}))
}

/// Definitions of every tool the server offers
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "journal_log".to_string(),
            description: "Log today's (or a given day's) symptoms, sleep, stress and diet. Overwrites an existing entry for that date unless merge is set".to_string(),
            input_schema: input_schema::<tools::LogEntryParams>(),
        },
        ToolDefinition {
            name: "journal_get".to_string(),
            description: "Show the entry logged for a date (defaults to today)".to_string(),
            input_schema: input_schema::<tools::GetEntryParams>(),
        },
        ToolDefinition {
            name: "journal_history".to_string(),
            description: "List logged days newest first with severity indicators".to_string(),
            input_schema: input_schema::<tools::HistoryParams>(),
        },
        ToolDefinition {
            name: "journal_delete".to_string(),
            description: "Delete the entry for a date".to_string(),
            input_schema: input_schema::<tools::DeleteEntryParams>(),
        },
        ToolDefinition {
            name: "journal_analytics".to_string(),
            description: "Averages, 7-day trend, lag analysis, correlations and potential trigger days".to_string(),
            input_schema: input_schema::<tools::AnalyticsParams>(),
        },
        ToolDefinition {
            name: "journal_insights".to_string(),
            description: "Get an AI wellness assessment of today's entry or the last 7 days".to_string(),
            input_schema: input_schema::<tools::InsightsParams>(),
        },
        ToolDefinition {
            name: "journal_export".to_string(),
            description: "Export all entries as CSV or JSON".to_string(),
            input_schema: input_schema::<tools::ExportParams>(),
        },
    ]
}

/// Decode tool arguments, treating missing arguments as an empty object
fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, serde_json::Error> {
    let arguments = if arguments.is_null() { json!({}) } else { arguments };
    serde_json::from_value(arguments)
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(journal: JournalServer) -> Self {
        Self {
            journal,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns None for blank lines and notifications.
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        if request.method.starts_with("notifications/") {
            if request.method == "notifications/initialized" {
                self.initialized = true;
            }
            debug!("Received notification: {}", request.method);
            return None;
        }

        Some(self.handle_request(request).await)
    }

    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(request.id, json!(null))
            }
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => JsonRpcResponse::success(request.id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(request).await,
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Wellness Journal MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(request.id, error_codes::INTERNAL_ERROR, e.to_string(), None),
        }
    }

    async fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        debug!("Calling tool {}", tool_params.name);

        let outcome = match tool_params.name.as_str() {
            "journal_log" => self.call_log(tool_params.arguments),
            "journal_get" => self.call_get(tool_params.arguments),
            "journal_history" => self.call_history(tool_params.arguments),
            "journal_delete" => self.call_delete(tool_params.arguments),
            "journal_analytics" => self.call_analytics(tool_params.arguments),
            "journal_insights" => self.call_insights(tool_params.arguments).await,
            "journal_export" => self.call_export(tool_params.arguments),
            _ => Ok(Ok(ToolCallResult::error(format!("Unknown tool: {}", tool_params.name)))),
        };

        match outcome {
            Ok(Ok(result)) => match serde_json::to_value(result) {
                Ok(value) => JsonRpcResponse::success(request.id, value),
                Err(e) => JsonRpcResponse::error(request.id, error_codes::INTERNAL_ERROR, e.to_string(), None),
            },
            Ok(Err(e)) => {
                error!("Tool {} failed: {}", tool_params.name, e);
                JsonRpcResponse::error(request.id, tool_error_to_json_rpc_code(&e), e.to_string(), None)
            }
            Err(e) => JsonRpcResponse::error(
                request.id,
                error_codes::INVALID_PARAMS,
                format!("Invalid arguments for {}: {}", tool_params.name, e),
                None,
            ),
        }
    }

    // Each call_* returns Err for undecodable arguments and Ok(Err) for tool failures
    fn call_log(&self, args: Value) -> Result<Result<ToolCallResult, ToolError>, serde_json::Error> {
        let params = parse_args(args)?;
        Ok(tools::log_entry(self.journal.store(), params, today())
            .map(|response| ToolCallResult::success(response.message)))
    }

    fn call_get(&self, args: Value) -> Result<Result<ToolCallResult, ToolError>, serde_json::Error> {
        let params = parse_args(args)?;
        Ok(tools::get_entry(self.journal.store(), params, today()).map(|response| match &response.entry {
            Some(entry) => ToolCallResult::success_with_data(response.message.clone(), pretty(entry)),
            None => ToolCallResult::success(response.message),
        }))
    }

    fn call_history(&self, args: Value) -> Result<Result<ToolCallResult, ToolError>, serde_json::Error> {
        let params = parse_args(args)?;
        Ok(tools::list_history(self.journal.store(), params)
            .map(|response| ToolCallResult::success(response.message)))
    }

    fn call_delete(&self, args: Value) -> Result<Result<ToolCallResult, ToolError>, serde_json::Error> {
        let params = parse_args(args)?;
        Ok(tools::delete_entry(self.journal.store(), params, today())
            .map(|response| ToolCallResult::success(response.message)))
    }

    fn call_analytics(&self, args: Value) -> Result<Result<ToolCallResult, ToolError>, serde_json::Error> {
        let params = parse_args(args)?;
        Ok(tools::get_analytics(self.journal.store(), self.journal.analytics(), params, today())
            .map(|response| ToolCallResult::success_with_data(response.message.clone(), pretty(&response.report))))
    }

    async fn call_insights(&self, args: Value) -> Result<Result<ToolCallResult, ToolError>, serde_json::Error> {
        let params = parse_args(args)?;
        let outcome = tools::get_insights(self.journal.store(), self.journal.insights(), params, today()).await;
        Ok(outcome.map(|response| {
            if let Some(failure) = &response.failure {
                ToolCallResult {
                    is_error: true,
                    ..ToolCallResult::success_with_data(response.message.clone(), pretty(failure))
                }
            } else if let Some(insight) = &response.insight {
                ToolCallResult::success_with_data(response.message.clone(), pretty(insight))
            } else {
                ToolCallResult::success(response.message)
            }
        }))
    }

    fn call_export(&self, args: Value) -> Result<Result<ToolCallResult, ToolError>, serde_json::Error> {
        let params = parse_args(args)?;
        Ok(tools::export_entries(self.journal.store(), params).map(|response| {
            let summary = format!("📤 Exported {} entries as {:?}", response.entries, response.format);
            ToolCallResult::success_with_data(summary, response.content)
        }))
    }
}
