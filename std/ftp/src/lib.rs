//! MCP server providing file-management tools for a single FTP server.
//!
//! Every tool call opens its own FTP session, performs one operation and
//! closes the session again. Nothing is shared between calls except the
//! connection settings loaded at startup.

use client::FtpClient;
use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool_handler,
};
pub mod artifact;
pub mod client;
pub mod config;
pub mod error;
pub mod listing;
pub mod session;
pub mod tools;

#[cfg(test)]
mod testing;

/// MCP FTP server.
#[derive(Debug, Clone)]
pub struct FtpServer {
    pub(crate) client: FtpClient,
    pub(crate) tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for FtpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "wmcp-ftp".into(),
                title: Some("Walrus MCP FTP Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(format!(
                "FTP server providing file and directory operations on {}. \
                 Each tool call opens and closes its own FTP session.",
                self.client.config().endpoint()
            )),
        }
    }
}
