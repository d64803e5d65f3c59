use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;

pub mod config;
pub mod mcp;
pub mod paperless;

use crate::config::{PaperlessConfig, ServerConfig};
use crate::mcp::tools::ToolRegistry;
use crate::mcp::{McpService, McpState};
use crate::paperless::PaperlessTools;

/// Build the MCP state for a Paperless configuration.
pub fn build_state(config: PaperlessConfig) -> McpState {
    let registry = ToolRegistry::new(PaperlessTools::new(config));
    McpState::new(McpService::new(registry))
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let paperless_config =
        PaperlessConfig::from_env().context("invalid Paperless configuration")?;
    let server_config = ServerConfig::from_env().context("invalid server configuration")?;

    log::info!(
        "Using Paperless at {} (max {} snippets of {} chars)",
        paperless_config.base_url,
        paperless_config.max_snippets,
        paperless_config.snippet_length
    );

    let state = web::Data::new(build_state(paperless_config));

    log::info!(
        "Starting MCP server at http://{}:{}/mcp",
        server_config.bind_addr,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(mcp::config)
    })
    .bind((server_config.bind_addr.as_str(), server_config.port))
    .with_context(|| {
        format!(
            "failed to bind {}:{}",
            server_config.bind_addr, server_config.port
        )
    })?
    .run()
    .await
    .context("MCP server terminated with an error")
}
