/// A scripted MCP client session against a journal server
use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;
use wellness_journal_mcp::mcp::McpServer;
use wellness_journal_mcp::*;

#[cfg(test)]
mod mcp_session_tests {
    use super::*;

    struct CannedModel;

    #[async_trait]
    impl LanguageModel for CannedModel {
        async fn complete(&self, _prompt: &str) -> Result<String, InsightError> {
            Ok("```json\n{\"wellness_score\": 68, \"summary\": \"Moderate flare after pizza\", \"triggers\": [\"Pizza\"], \"recommendations\": [\"Smaller dinner\"]}\n```".to_string())
        }
    }

    fn server(dir: &TempDir, requester: InsightRequester) -> McpServer {
        let store = JsonFileStore::new(dir.path().join("journal.json")).expect("Failed to create store");
        McpServer::new(JournalServer::with_parts(Box::new(store), AnalyticsEngine::new(), requester))
    }

    fn tool_call(id: u32, name: &str, arguments: Value) -> String {
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        })
        .to_string()
    }

    async fn send(server: &mut McpServer, line: &str) -> Value {
        let response = server.process_line(line).await.expect("expected a response");
        serde_json::to_value(response).unwrap()
    }

    fn text(response: &Value, index: usize) -> String {
        response["result"]["content"][index]["text"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_tools_list() {
        let dir = TempDir::new().unwrap();
        let mut server = server(&dir, InsightRequester::disabled());

        let response = send(&mut server, r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#).await;
        let names: Vec<&str> = response["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();

        assert_eq!(
            names,
            vec![
                "journal_log",
                "journal_get",
                "journal_history",
                "journal_delete",
                "journal_analytics",
                "journal_insights",
                "journal_export"
            ]
        );
        assert!(response["result"]["tools"][0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_log_analyze_export_session() {
        let dir = TempDir::new().unwrap();
        let mut server = server(&dir, InsightRequester::disabled());
        let today = today();

        let days = [(2, 3, 2, 8.0, "Oatmeal"), (1, 5, 5, 6.5, "Salad"), (0, 8, 8, 5.0, "Pizza")];
        for (i, (ago, severity, stress, sleep, diet)) in days.iter().enumerate() {
            let date = date_key(today - chrono::Duration::days(*ago));
            let response = send(
                &mut server,
                &tool_call(
                    i as u32 + 1,
                    "journal_log",
                    json!({
                        "date": date,
                        "symptom_severity": severity,
                        "stress_level": stress,
                        "sleep_hours": sleep,
                        "diet_notes": diet
                    }),
                ),
            )
            .await;
            assert_eq!(response["result"]["isError"], json!(false), "{}", response);
        }

        let analytics = send(&mut server, &tool_call(10, "journal_analytics", json!({}))).await;
        let summary = text(&analytics, 0);
        assert!(summary.contains("Avg severity: 5.3"));
        assert!(summary.contains("(High Severity): Pizza"));

        let report: Value = serde_json::from_str(&text(&analytics, 1)).unwrap();
        assert_eq!(report["total_entries"], json!(3));
        assert_eq!(report["correlations"]["status"], json!("computed"));
        assert_eq!(report["lag_analysis"]["status"], json!("computed"));

        let export = send(&mut server, &tool_call(11, "journal_export", json!({"format": "csv"}))).await;
        let csv = text(&export, 1);
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.starts_with("date,symptom_severity"));
    }

    #[tokio::test]
    async fn test_delete_through_mcp() {
        let dir = TempDir::new().unwrap();
        let mut server = server(&dir, InsightRequester::disabled());

        send(&mut server, &tool_call(1, "journal_log", json!({"date": "2024-02-02", "symptom_severity": 4}))).await;

        let missing = send(&mut server, &tool_call(2, "journal_delete", json!({"date": "2024-02-03"}))).await;
        assert!(text(&missing, 0).contains("Nothing was deleted"));

        let deleted = send(&mut server, &tool_call(3, "journal_delete", json!({"date": "2024-02-02"}))).await;
        assert!(text(&deleted, 0).contains("Deleted entry for 2024-02-02"));

        let get = send(&mut server, &tool_call(4, "journal_get", json!({"date": "2024-02-02"}))).await;
        assert!(text(&get, 0).contains("No entry logged"));
    }

    #[tokio::test]
    async fn test_daily_insight_session() {
        let dir = TempDir::new().unwrap();
        let mut server = server(&dir, InsightRequester::new(Some(Box::new(CannedModel))));

        send(
            &mut server,
            &tool_call(1, "journal_log", json!({"symptom_severity": 6, "diet_notes": "Pizza"})),
        )
        .await;

        let response = send(&mut server, &tool_call(2, "journal_insights", json!({"mode": "daily"}))).await;
        assert_eq!(response["result"]["isError"], json!(false));
        assert!(text(&response, 0).contains("68/100"));

        let insight: Value = serde_json::from_str(&text(&response, 1)).unwrap();
        assert_eq!(insight["triggers"], json!(["Pizza"]));
    }

    #[tokio::test]
    async fn test_invalid_date_is_validation_error() {
        let dir = TempDir::new().unwrap();
        let mut server = server(&dir, InsightRequester::disabled());

        let response = send(&mut server, &tool_call(1, "journal_get", json!({"date": "06/01/2024"}))).await;
        assert_eq!(response["error"]["code"], json!(-32003));
    }
}
