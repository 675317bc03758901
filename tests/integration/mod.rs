/// Integration tests: full journal workflows through the public API
mod journal_workflow;
mod mcp_session;
