//! MCP stateless HTTP handlers for Actix-Web.
//!
//! Each POST carries one JSON-RPC request; no SSE connection is kept open.

use actix_web::{error, web, HttpResponse, Responder};

use crate::mcp::rpc::{RpcRequest, RpcResponse};
use crate::mcp::service::McpService;

pub struct McpState {
    pub service: McpService,
}

impl McpState {
    pub fn new(service: McpService) -> Self {
        Self { service }
    }
}

/// RPC handler - POST /mcp
pub async fn rpc_handler(
    state: web::Data<McpState>,
    body: web::Json<RpcRequest>,
) -> impl Responder {
    log::info!("Received MCP request: {}", body.method);

    match state.service.handle_request(body.into_inner()).await {
        Some(response) => HttpResponse::Ok().json(response),
        // Notifications return 202 Accepted
        None => HttpResponse::Accepted().finish(),
    }
}

/// Malformed bodies get a JSON-RPC parse error instead of actix's plain text.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("rejecting malformed MCP request: {}", err);
        let response = HttpResponse::BadRequest().json(RpcResponse::parse_error(err.to_string()));
        error::InternalError::from_response(err, response).into()
    })
}

/// Configure MCP routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    cfg.service(web::resource("/mcp").route(web::post().to(rpc_handler)));

    // Same handler under /sse for clients configured with the legacy path
    cfg.service(web::resource("/sse").route(web::post().to(rpc_handler)));
}
