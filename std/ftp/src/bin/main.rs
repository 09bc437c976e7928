//! Binary entry point for the wmcp-ftp MCP server.

use clap::Parser;
use rmcp::ServiceExt;
use std::path::PathBuf;
use wmcp_ftp::{FtpServer, client::FtpClient, config::FtpConfig};

/// Walrus MCP FTP Server: file management tools for one FTP server.
///
/// Connection settings come from FTP_HOST, FTP_PORT, FTP_USER,
/// FTP_PASSWORD and FTP_SECURE.
#[derive(Parser)]
#[command(name = "wmcp-ftp", version, about)]
struct Cli {
    /// Directory for transfer artifacts [default: <system temp>/mcp-ftp-temp].
    #[arg(long, value_name = "DIR")]
    temp_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    let config = match FtpConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut client = FtpClient::new(config);
    if let Some(dir) = cli.temp_dir {
        client = client.with_artifact_dir(dir);
    }
    tracing::info!(
        endpoint = %client.config().endpoint(),
        artifact_dir = %client.artifact_dir().display(),
        "FTP MCP server running on stdio"
    );

    let server = FtpServer::new(client);
    let transport = rmcp::transport::stdio();
    let service = match server.serve(transport).await {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Error: failed to start server: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = service.waiting().await {
        eprintln!("Error: server error: {e}");
        std::process::exit(1);
    }
}
