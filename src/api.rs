//! Catalog REST API client.
//!
//! Provides blocking HTTP operations using the ureq crate. Callers run these
//! off the UI thread (see `deferred`).

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::models::RecordId;
use crate::query::QueryParam;
use crate::resource::Resource;
use crate::session::Session;
use crate::upload::{ChosenFile, ProgressReader, UploadProgress, Uploader};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not signed in or session expired")]
    Unauthorized,
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("could not read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(401, _) => ApiError::Unauthorized,
            ureq::Error::Status(status, response) => ApiError::Status {
                status,
                message: response
                    .into_string()
                    .map(|body| body.trim().to_string())
                    .unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => ApiError::Transport(transport.to_string()),
        }
    }
}

/// One page of records plus the total page count.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub total_count: u32,
}

/// List endpoints answer either with a bare array or a paged envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Paged {
        #[serde(alias = "data")]
        items: Vec<T>,
        #[serde(rename = "totalCount", default)]
        total_count: Option<u32>,
    },
    Bare(Vec<T>),
}

impl<T> From<ListResponse<T>> for ListPage<T> {
    fn from(response: ListResponse<T>) -> Self {
        let (items, total_count) = match response {
            ListResponse::Paged { items, total_count } => (items, total_count),
            ListResponse::Bare(items) => (items, None),
        };
        // Without a count the response is the whole collection: one page,
        // or none when empty.
        let total_count = total_count.unwrap_or(if items.is_empty() { 0 } else { 1 });
        ListPage { items, total_count }
    }
}

/// Decode a list endpoint body.
pub fn parse_list<T: DeserializeOwned>(body: &str) -> Result<ListPage<T>, ApiError> {
    serde_json::from_str::<ListResponse<T>>(body)
        .map(ListPage::from)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// CRUD operations for one record type.
pub trait CrudApi<R: Resource>: Send + Sync {
    fn fetch_all(&self, query: &QueryParam) -> Result<ListPage<R::Record>, ApiError>;
    fn create(&self, payload: &R::Payload) -> Result<R::Record, ApiError>;
    fn update(&self, id: RecordId, payload: &R::Payload) -> Result<R::Record, ApiError>;
    fn delete(&self, id: RecordId) -> Result<(), ApiError>;
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

/// HTTP client for the catalog API. Serves every resource and uploads.
pub struct HttpApi {
    agent: ureq::Agent,
    base_url: String,
    session: Arc<dyn Session>,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration, session: Arc<dyn Session>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("catadm/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    /// Absolute URL for a path relative to the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let request = self.agent.request(method, url);
        match self.session.bearer_token() {
            Some(token) => request.set("Authorization", &format!("Bearer {}", token)),
            None => request,
        }
    }

    fn read_body(response: ureq::Response) -> Result<String, ApiError> {
        response
            .into_string()
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    fn read_json<T: DeserializeOwned>(response: ureq::Response) -> Result<T, ApiError> {
        let body = Self::read_body(response)?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl<R: Resource> CrudApi<R> for HttpApi {
    fn fetch_all(&self, query: &QueryParam) -> Result<ListPage<R::Record>, ApiError> {
        let url = self.endpoint(R::PATH);
        let pairs = query.to_pairs();
        tracing::debug!(%url, ?pairs, "fetching list");
        let response = self
            .request("GET", &url)
            .query_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .call()?;
        parse_list(&Self::read_body(response)?)
    }

    fn create(&self, payload: &R::Payload) -> Result<R::Record, ApiError> {
        let url = self.endpoint(R::PATH);
        tracing::debug!(%url, "creating record");
        let response = self.request("POST", &url).send_json(payload)?;
        Self::read_json(response)
    }

    fn update(&self, id: RecordId, payload: &R::Payload) -> Result<R::Record, ApiError> {
        let url = self.endpoint(&format!("{}/{}", R::PATH, id));
        tracing::debug!(%url, "updating record");
        let response = self.request("PUT", &url).send_json(payload)?;
        Self::read_json(response)
    }

    fn delete(&self, id: RecordId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("{}/{}", R::PATH, id));
        tracing::debug!(%url, "deleting record");
        self.request("DELETE", &url).call()?;
        Ok(())
    }
}

impl Uploader for HttpApi {
    fn upload(&self, file: &ChosenFile, progress: &UploadProgress) -> Result<String, ApiError> {
        let read_error = |source: std::io::Error| ApiError::ReadFile {
            path: file.path().to_path_buf(),
            source,
        };
        let handle = fs::File::open(file.path()).map_err(read_error)?;
        let size = handle.metadata().map_err(read_error)?.len();
        let url = self.endpoint(&format!("upload/{}", file.kind().as_str()));
        tracing::debug!(%url, size, "uploading file");
        // An explicit length keeps ureq from switching to chunked encoding.
        let response = self
            .request("POST", &url)
            .set("Content-Type", file.content_type())
            .set("Content-Length", &size.to_string())
            .set("X-File-Name", &file.file_name())
            .send(ProgressReader::new(handle, size, progress.clone()))?;
        let uploaded: UploadResponse = Self::read_json(response)?;
        Ok(uploaded.url)
    }
}
