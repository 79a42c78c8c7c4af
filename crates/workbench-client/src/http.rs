//! [`WorkspaceBackend`] over the Workbench HTTP API.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use workbench_core::error::{AppError, ErrorKind};
use workbench_core::result::AppResult;
use workbench_core::types::{
    FileContent, FolderListing, PathReceipt, RootInfo, RunAck, TaskArtifacts, TaskList,
    TreeSnapshot, WriteReceipt,
};

use crate::backend::WorkspaceBackend;

/// Error body returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

/// HTTP client for a running Workbench server.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    /// Server origin, always ending in `/`.
    base: Url,
}

impl HttpBackend {
    /// Create a backend for the server at `base_url`, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> AppResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a backend sharing an existing client.
    pub fn with_client(client: Client, base_url: &str) -> AppResult<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&normalized)
            .map_err(|e| AppError::validation(format!("Invalid server URL '{base_url}': {e}")))?;
        Ok(Self { client, base })
    }

    /// Server origin.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, endpoint: &str, params: &[(&str, &str)]) -> AppResult<Url> {
        let url = self
            .base
            .join(endpoint)
            .map_err(|e| AppError::internal(format!("Invalid endpoint '{endpoint}': {e}")))?;
        if params.is_empty() {
            return Ok(url);
        }
        Url::parse_with_params(url.as_str(), params)
            .map_err(|e| AppError::internal(format!("Invalid query for '{endpoint}': {e}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client.request(method, url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = request.send().await.map_err(transport_error)?;
        let response = check_status(response).await?;
        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                AppError::with_source(ErrorKind::Serialization, "Malformed server response", e)
            } else {
                transport_error(e)
            }
        })
    }
}

#[async_trait]
impl WorkspaceBackend for HttpBackend {
    async fn fetch_tree(&self, path: &str, depth: u32) -> AppResult<TreeSnapshot> {
        let depth = depth.to_string();
        let url = self.url("api/tree", &[("path", path), ("depth", &depth)])?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn read_file(&self, path: &str) -> AppResult<FileContent> {
        let url = self.url("api/file", &[("path", path)])?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn write_file(&self, path: &str, content: &str) -> AppResult<WriteReceipt> {
        let url = self.url("api/file", &[])?;
        let body = json!({ "path": path, "content": content });
        self.send(self.request(Method::POST, url).json(&body)).await
    }

    async fn delete_file(&self, path: &str) -> AppResult<PathReceipt> {
        let url = self.url("api/file", &[("path", path)])?;
        self.send(self.request(Method::DELETE, url)).await
    }

    async fn mkdir(&self, path: &str) -> AppResult<PathReceipt> {
        let url = self.url("api/mkdir", &[])?;
        self.send(self.request(Method::POST, url).json(&json!({ "path": path })))
            .await
    }

    async fn browse(&self, path: &str) -> AppResult<FolderListing> {
        let url = self.url("api/browse", &[("path", path)])?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn get_root(&self) -> AppResult<RootInfo> {
        let url = self.url("api/root", &[])?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn set_root(&self, root: &str) -> AppResult<RootInfo> {
        let url = self.url("api/root", &[])?;
        self.send(self.request(Method::POST, url).json(&json!({ "root": root })))
            .await
    }

    async fn list_tasks(&self) -> AppResult<TaskList> {
        let url = self.url("api/tasks", &[])?;
        self.send(self.request(Method::GET, url)).await
    }

    async fn get_task(&self, id: &str) -> AppResult<TaskArtifacts> {
        let mut url = self.url("api/task/", &[])?;
        url.path_segments_mut()
            .map_err(|_| AppError::internal("Server URL cannot carry a path"))?
            .pop_if_empty()
            .push(id);
        self.send(self.request(Method::GET, url)).await
    }

    async fn run_task(&self, description: &str) -> AppResult<RunAck> {
        let url = self.url("api/run", &[])?;
        self.send(
            self.request(Method::POST, url)
                .json(&json!({ "description": description })),
        )
        .await
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    let message = match err.url() {
        Some(url) => format!("Request to {} failed", url.path()),
        None => "Request failed".to_string(),
    };
    AppError::with_source(ErrorKind::Transport, message, err)
}

/// Turn a non-2xx response into the error kind the server reported.
async fn check_status(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let (kind, message) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (
            body.code
                .as_deref()
                .and_then(ErrorKind::from_code)
                .unwrap_or_else(|| kind_for_status(status)),
            body.error,
        ),
        Err(_) if text.is_empty() => (kind_for_status(status), status.to_string()),
        Err(_) => (kind_for_status(status), text),
    };

    tracing::debug!(status = status.as_u16(), kind = %kind, "Server rejected request");
    Err(AppError::new(kind, message))
}

fn kind_for_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::AlreadyExists,
        StatusCode::PAYLOAD_TOO_LARGE => ErrorKind::TooLarge,
        _ => ErrorKind::Internal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let backend = HttpBackend::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(backend.base_url().as_str(), "http://127.0.0.1:3000/");
        assert!(HttpBackend::new("not a url").is_err());
    }

    #[test]
    fn test_query_parameters_are_encoded() {
        let backend = HttpBackend::new("http://localhost:3000/").unwrap();
        let url = backend
            .url("api/file", &[("path", "dir with space/a&b.txt")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/file?path=dir+with+space%2Fa%26b.txt"
        );
    }

    #[test]
    fn test_status_fallback_kinds() {
        assert_eq!(kind_for_status(StatusCode::NOT_FOUND), ErrorKind::NotFound);
        assert_eq!(kind_for_status(StatusCode::CONFLICT), ErrorKind::AlreadyExists);
        assert_eq!(kind_for_status(StatusCode::PAYLOAD_TOO_LARGE), ErrorKind::TooLarge);
        assert_eq!(kind_for_status(StatusCode::BAD_GATEWAY), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Nothing listens on the discard port.
        let backend = HttpBackend::new("http://127.0.0.1:9").unwrap();
        let err = backend.list_tasks().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Transport);
    }
}
