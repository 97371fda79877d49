//! MCP Server entry point for Outlook (Read-Only)
//!
//! Starts the MCP server with stdio transport. Tools are served either by the
//! Outlook automation scripts or, for development, by a JSON fixture.

mod adapters;
mod config;
mod schemas;
mod server;

use std::process::ExitCode;
use std::sync::Arc;

use adapters::{ScriptBridge, ScriptMailStore};
use anyhow::Context;
use config::{Backend, McpConfig};
use outlook_mcp_core::services::{MailService, ServiceContext};
use outlook_mcp_core::traits::MailStore;
use outlook_mcp_core::{DaslSyntax, InMemoryMailStore};
use rmcp::ServiceExt;
use server::OutlookMcp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

async fn build_store(config: &McpConfig) -> anyhow::Result<Arc<dyn MailStore>> {
    for setting in config.ignored_settings() {
        tracing::warn!("'{setting}' has no effect with the {:?} backend", config.backend);
    }

    match config.backend {
        Backend::Script => {
            let mut bridge = ScriptBridge::new(config.interpreter(), config.resolved_scripts_dir())
                .with_timeouts(config.timeouts.clone());
            if config.dasl_filter {
                let syntax = if config.instant_search {
                    DaslSyntax::PhraseMatch
                } else {
                    DaslSyntax::Like
                };
                bridge = bridge.with_dasl(syntax);
            }
            let store = ScriptMailStore::new(bridge);
            tracing::info!("Using Outlook scripts from {}", store.scripts_dir().display());
            Ok(Arc::new(store))
        }
        Backend::Fixture => {
            let path = config
                .fixture
                .as_deref()
                .context("fixture backend requires a fixture path")?;
            let mut store = InMemoryMailStore::from_file(path)
                .await
                .with_context(|| format!("failed to load fixture {}", path.display()))?;
            if let Some(dir) = &config.attachment_dir {
                store = store.with_attachment_dir(dir);
            }
            tracing::info!("Using fixture {}", path.display());
            Ok(Arc::new(store))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing to stderr (MCP uses stdout for protocol)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    tracing::info!("Starting Outlook MCP Server (read-only mode)");

    let config = match McpConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let store = match build_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to initialize mail store: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Create service context
    let ctx = Arc::new(ServiceContext::new(store));
    let mail_service = Arc::new(MailService::new(ctx));

    // Create MCP server
    let mcp_server = OutlookMcp::new(mail_service);

    tracing::info!("MCP server initialized with 4 tools");

    // Start serving via stdio
    tracing::info!("Starting MCP server on stdio transport");
    let service = match mcp_server.serve(rmcp::transport::stdio()).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start MCP server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Wait for the server to complete
    if let Err(e) = service.waiting().await {
        tracing::error!("MCP server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
