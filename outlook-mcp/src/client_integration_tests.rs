use super::test_mocks::*;
use super::*;

use outlook_mcp_core::traits::MailStore;
use rmcp::model::CallToolRequestParams;
use rmcp::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Spawn a MCP server and connect a client via in-memory duplex transport.
///
/// Returns `(client, server_handle)`. The client derefs to `Peer<RoleClient>`
/// so you can call `list_all_tools()`, `call_tool()`, `peer_info()`, etc.
async fn spawn_client_server(
    store: Arc<dyn MailStore>,
) -> (
    rmcp::service::RunningService<rmcp::RoleClient, ()>,
    tokio::task::JoinHandle<anyhow::Result<()>>,
) {
    let (server_transport, client_transport) = tokio::io::duplex(4096);

    let server = build_server(store);

    let server_handle = tokio::spawn(async move {
        server.serve(server_transport).await?.waiting().await?;
        anyhow::Ok(())
    });

    let client = ().serve(client_transport).await.unwrap();
    (client, server_handle)
}

/// Spawn a server over the sample fixture.
async fn spawn_default() -> (
    rmcp::service::RunningService<rmcp::RoleClient, ()>,
    tokio::task::JoinHandle<anyhow::Result<()>>,
) {
    spawn_client_server(Arc::new(sample_store())).await
}

fn call_params(name: &str, args: &serde_json::Value) -> CallToolRequestParams {
    CallToolRequestParams {
        meta: None,
        name: name.to_string().into(),
        arguments: args.as_object().cloned(),
        task: None,
    }
}

fn extract_text(result: &rmcp::model::CallToolResult) -> &str {
    result
        .content
        .first()
        .and_then(|c| c.raw.as_text())
        .map(|t| t.text.as_str())
        .expect("expected text content in result")
}

fn inbox() -> String {
    format!("{ACCOUNT}/Inbox")
}

// ===========================================================================
// Scenario 1: initialize handshake
// ===========================================================================

#[tokio::test]
async fn client_connects_and_receives_server_info() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let server_info = client
        .peer_info()
        .expect("server info should be set after handshake");

    assert_eq!(server_info.protocol_version, ProtocolVersion::LATEST);
    assert!(
        server_info.capabilities.tools.is_some(),
        "server should advertise tool capability"
    );

    let instructions = server_info.instructions.as_deref().unwrap_or("");
    assert!(instructions.contains("outlook_list"));
    assert!(instructions.contains("'&' = AND"));

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

// ===========================================================================
// Scenario 2: tools/list
// ===========================================================================

const EXPECTED_TOOL_NAMES: &[&str] = &[
    "outlook_list",
    "outlook_filter",
    "outlook_search",
    "outlook_read",
];

#[tokio::test]
async fn tools_list_returns_all_four_tools() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let tools = client.list_all_tools().await?;

    assert_eq!(tools.len(), 4, "expected exactly 4 tools");

    let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
    for expected in EXPECTED_TOOL_NAMES {
        assert!(names.contains(expected), "missing tool: {expected}");
    }

    for tool in &tools {
        assert!(
            tool.description.is_some(),
            "tool '{}' missing description",
            tool.name
        );
        assert_eq!(
            tool.input_schema.get("type").and_then(|v| v.as_str()),
            Some("object"),
            "tool '{}' input_schema type must be 'object'",
            tool.name
        );
    }

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn tools_with_required_params_declare_them_in_schema() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let tools = client.list_all_tools().await?;
    let find_tool = |name: &str| tools.iter().find(|t| t.name == name).unwrap().clone();

    // outlook_search requires pattern and path
    let search = find_tool("outlook_search");
    let required = search
        .input_schema
        .get("required")
        .and_then(|v| v.as_array())
        .expect("outlook_search should have required fields");
    assert!(required.iter().any(|v| v == "pattern"));
    assert!(required.iter().any(|v| v == "path"));
    assert!(!required.iter().any(|v| v == "offset"));

    // outlook_read requires entry_id
    let read = find_tool("outlook_read");
    let required = read
        .input_schema
        .get("required")
        .and_then(|v| v.as_array())
        .expect("outlook_read should have required fields");
    assert_eq!(required.len(), 1);
    assert!(required.iter().any(|v| v == "entry_id"));

    // outlook_list takes only optional params
    let list = find_tool("outlook_list");
    let required_count = list
        .input_schema
        .get("required")
        .and_then(|v| v.as_array())
        .map_or(0, Vec::len);
    assert_eq!(required_count, 0);

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

// ===========================================================================
// Scenario 3: tools/call
// ===========================================================================

#[tokio::test]
async fn call_list_with_empty_path_returns_accounts_only() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let result = client
        .call_tool(call_params("outlook_list", &serde_json::json!({})))
        .await?;

    assert_ne!(result.is_error, Some(true));
    let parsed: serde_json::Value = serde_json::from_str(extract_text(&result))?;
    assert_eq!(parsed["type"], "accounts");
    let results = parsed["results"].as_array().unwrap();
    assert_eq!(results.len(), 1, "public store must be hidden");
    assert_eq!(results[0]["name"], ACCOUNT);
    assert!(results.iter().all(|r| r["type"] == "account"));

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn call_search_with_and_returns_only_items_with_both_terms() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let result = client
        .call_tool(call_params(
            "outlook_search",
            &serde_json::json!({"pattern": "United&ZRH", "path": inbox()}),
        ))
        .await?;

    let parsed: serde_json::Value = serde_json::from_str(extract_text(&result))?;
    assert_eq!(parsed["pagination"]["total"], 1);
    assert_eq!(parsed["results"][0]["subject"], "United UA 53 booked");

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn call_search_second_page_returns_remaining_five() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let result = client
        .call_tool(call_params(
            "outlook_search",
            &serde_json::json!({"pattern": "newsletter", "path": inbox(), "offset": 25}),
        ))
        .await?;

    let parsed: serde_json::Value = serde_json::from_str(extract_text(&result))?;
    assert_eq!(parsed["pagination"]["total"], 30);
    assert_eq!(parsed["pagination"]["offset"], 25);
    assert_eq!(parsed["pagination"]["has_more"], false);
    assert_eq!(parsed["results"].as_array().unwrap().len(), 5);

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn call_search_without_matches_returns_default_message() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let result = client
        .call_tool(call_params(
            "outlook_search",
            &serde_json::json!({"pattern": "Lufthansa", "path": inbox()}),
        ))
        .await?;

    assert_eq!(extract_text(&result), "No matches found");

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn call_read_accepts_entry_id_from_search() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let search = client
        .call_tool(call_params(
            "outlook_search",
            &serde_json::json!({"pattern": "United", "path": inbox()}),
        ))
        .await?;
    let hits: serde_json::Value = serde_json::from_str(extract_text(&search))?;
    let entry_id = hits["results"][0]["entry_id"].as_str().unwrap().to_string();

    let read = client
        .call_tool(call_params(
            "outlook_read",
            &serde_json::json!({"entry_id": entry_id, "json": true}),
        ))
        .await?;
    let item: serde_json::Value = serde_json::from_str(extract_text(&read))?;
    assert_eq!(item["type"], "email");
    assert_eq!(item["sender"], "United Airlines");

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn call_filter_by_sender_returns_matching_items() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let result = client
        .call_tool(call_params(
            "outlook_filter",
            &serde_json::json!({"path": inbox(), "from_sender": "swiss", "type": "email"}),
        ))
        .await?;

    let parsed: serde_json::Value = serde_json::from_str(extract_text(&result))?;
    assert_eq!(parsed["total"], 1);
    assert_eq!(parsed["results"][0]["from"], "Swiss International");

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

// ===========================================================================
// Scenario 4: error handling
// ===========================================================================

#[tokio::test]
async fn call_nonexistent_tool_returns_error() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    let result = client
        .call_tool(call_params("nonexistent_tool", &serde_json::json!({})))
        .await;

    assert!(result.is_err(), "calling nonexistent tool should fail");
    let err = result.unwrap_err().to_string();
    assert!(
        err.contains("tool not found"),
        "error should mention 'tool not found', got: {err}"
    );

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn call_tool_with_missing_required_params_returns_error() -> anyhow::Result<()> {
    let (client, server_handle) = spawn_default().await;

    // outlook_search requires path, omit it
    let result = client
        .call_tool(call_params(
            "outlook_search",
            &serde_json::json!({"pattern": "ZRH"}),
        ))
        .await;

    assert!(result.is_err(), "missing required param should fail");

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn call_search_with_empty_pattern_never_reaches_store() -> anyhow::Result<()> {
    let store = RecordingMailStore::replying("{}");
    let calls = store.calls();
    let (client, server_handle) = spawn_client_server(Arc::new(store)).await;

    let result = client
        .call_tool(call_params(
            "outlook_search",
            &serde_json::json!({"pattern": " && ", "path": inbox()}),
        ))
        .await;

    assert!(result.is_err(), "empty pattern should be rejected");
    let err = result.unwrap_err().to_string();
    assert!(
        err.contains("failed to search items"),
        "error should carry the operation context, got: {err}"
    );
    assert!(calls.lock().await.is_empty());

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn call_read_with_upstream_failure_keeps_diagnostic() -> anyhow::Result<()> {
    let store = RecordingMailStore::failing(|| CoreError::Upstream {
        operation: "read item".to_string(),
        message: "The operation failed.".to_string(),
    });
    let (client, server_handle) = spawn_client_server(Arc::new(store)).await;

    let result = client
        .call_tool(call_params(
            "outlook_read",
            &serde_json::json!({"entry_id": "AAEC"}),
        ))
        .await;

    let err = result.unwrap_err().to_string();
    assert!(
        err.contains("failed to read item: The operation failed."),
        "got: {err}"
    );

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}
