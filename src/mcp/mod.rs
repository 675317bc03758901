/// MCP protocol layer
///
/// JSON-RPC framing over stdin/stdout, the tool list, and routing of tool
/// calls to the journal tools.

pub mod protocol;
pub mod server;

pub use server::{tool_definitions, McpServer};
