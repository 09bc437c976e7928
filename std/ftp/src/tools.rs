//! Tool implementations for the FTP MCP server.

use crate::FtpServer;
use crate::client::FtpClient;
use crate::listing::{format_listing, format_size};
use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::Deserialize;

/// Parameters for listing a directory.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListDirectoryParams {
    /// Path of the directory on the FTP server.
    pub remote_path: String,
}

/// Parameters for downloading a file.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFileParams {
    /// Path of the file on the FTP server.
    pub remote_path: String,
}

/// Parameters for uploading a file.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileParams {
    /// Destination path on the FTP server.
    pub remote_path: String,
    /// Content to upload to the file.
    pub content: String,
}

/// Parameters for creating a directory.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDirectoryParams {
    /// Path of the directory to create.
    pub remote_path: String,
}

/// Parameters for deleting a file.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileParams {
    /// Path of the file to delete.
    pub remote_path: String,
}

/// Parameters for deleting a directory.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDirectoryParams {
    /// Path of the directory to delete.
    pub remote_path: String,
}

#[tool_router]
impl FtpServer {
    /// Create a new FTP server dispatching to `client`.
    pub fn new(client: FtpClient) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// List the contents of a remote directory.
    #[tool(name = "list-directory", description = "List contents of an FTP directory")]
    async fn list_directory(
        &self,
        Parameters(params): Parameters<ListDirectoryParams>,
    ) -> Result<String, String> {
        let entries = self
            .client
            .list(&params.remote_path)
            .await
            .map_err(|e| e.to_string())?;
        Ok(format_listing(&params.remote_path, &entries))
    }

    /// Download a remote file, returning text content inline.
    #[tool(name = "download-file", description = "Download a file from the FTP server")]
    async fn download_file(
        &self,
        Parameters(params): Parameters<DownloadFileParams>,
    ) -> Result<String, String> {
        let download = self
            .client
            .download(&params.remote_path)
            .await
            .map_err(|e| e.to_string())?;
        let body = match std::str::from_utf8(&download.content) {
            Ok(text) => format!("File content of {}:\n\n{text}", params.remote_path),
            Err(_) => format!(
                "Downloaded {} ({}, binary content not shown)",
                params.remote_path,
                format_size(download.content.len() as u64)
            ),
        };
        Ok(format!(
            "{body}\n\nLocal copy: {}",
            download.local_path.display()
        ))
    }

    /// Upload text content to a remote file.
    #[tool(name = "upload-file", description = "Upload a file to the FTP server")]
    async fn upload_file(
        &self,
        Parameters(params): Parameters<UploadFileParams>,
    ) -> Result<String, String> {
        self.client
            .upload(&params.remote_path, params.content)
            .await
            .map_err(|e| e.to_string())?;
        Ok(format!("File successfully uploaded to {}", params.remote_path))
    }

    /// Create a remote directory, including missing parents.
    #[tool(
        name = "create-directory",
        description = "Create a new directory on the FTP server"
    )]
    async fn create_directory(
        &self,
        Parameters(params): Parameters<CreateDirectoryParams>,
    ) -> Result<String, String> {
        self.client
            .create_directory(&params.remote_path)
            .await
            .map_err(|e| e.to_string())?;
        Ok(format!(
            "Directory successfully created at {}",
            params.remote_path
        ))
    }

    /// Delete a remote file.
    #[tool(name = "delete-file", description = "Delete a file from the FTP server")]
    async fn delete_file(
        &self,
        Parameters(params): Parameters<DeleteFileParams>,
    ) -> Result<String, String> {
        self.client
            .delete_file(&params.remote_path)
            .await
            .map_err(|e| e.to_string())?;
        Ok(format!("File successfully deleted from {}", params.remote_path))
    }

    /// Delete an empty remote directory.
    #[tool(
        name = "delete-directory",
        description = "Delete a directory from the FTP server"
    )]
    async fn delete_directory(
        &self,
        Parameters(params): Parameters<DeleteDirectoryParams>,
    ) -> Result<String, String> {
        self.client
            .delete_directory(&params.remote_path)
            .await
            .map_err(|e| e.to_string())?;
        Ok(format!(
            "Directory successfully deleted from {}",
            params.remote_path
        ))
    }
}
