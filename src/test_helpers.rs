//! Shared test helpers: an in-memory drive and Graph mock builders.

use crate::config::{Config, GraphConfig, RetryConfig};
use crate::error::{Error, Result};
use crate::graph::{AccessToken, ContentStream, DriveItem, DriveProvider};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// In-memory [`DriveProvider`]: folders keyed by full path, content keyed by URL.
#[derive(Default)]
pub(crate) struct FakeDrive {
    folders: HashMap<String, Vec<DriveItem>>,
    content: HashMap<String, Vec<u8>>,
    failing_folders: HashSet<String>,
    broken_content: HashSet<String>,
    listed: Mutex<Vec<String>>,
    tokens_issued: AtomicUsize,
}

impl FakeDrive {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_folder(mut self, full_path: &str, items: Vec<DriveItem>) -> Self {
        self.folders.insert(full_path.to_string(), items);
        self
    }

    pub(crate) fn with_content(mut self, url: &str, body: &[u8]) -> Self {
        self.content.insert(url.to_string(), body.to_vec());
        self
    }

    pub(crate) fn with_failing_folder(mut self, full_path: &str) -> Self {
        self.failing_folders.insert(full_path.to_string());
        self
    }

    /// Content that yields its first half, then an error
    pub(crate) fn with_broken_content(mut self, url: &str, body: &[u8]) -> Self {
        self.broken_content.insert(url.to_string());
        self.with_content(url, body)
    }

    pub(crate) fn listed(&self) -> Vec<String> {
        self.listed.lock().unwrap().clone()
    }

    pub(crate) fn tokens_issued(&self) -> usize {
        self.tokens_issued.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DriveProvider for FakeDrive {
    async fn access_token(&self) -> Result<AccessToken> {
        let n = self.tokens_issued.fetch_add(1, Ordering::SeqCst);
        Ok(AccessToken::new(format!("token-{n}")))
    }

    async fn list_children(
        &self,
        _token: &AccessToken,
        full_path: &str,
    ) -> Result<Vec<DriveItem>> {
        self.listed.lock().unwrap().push(full_path.to_string());

        if self.failing_folders.contains(full_path) {
            return Err(Error::Graph {
                status: 500,
                path: full_path.to_string(),
                message: "boom".into(),
            });
        }

        self.folders.get(full_path).cloned().ok_or_else(|| Error::Graph {
            status: 404,
            path: full_path.to_string(),
            message: "itemNotFound".into(),
        })
    }

    async fn open_content(&self, download_url: &str) -> Result<ContentStream> {
        let body = self.content.get(download_url).cloned().ok_or_else(|| Error::Graph {
            status: 404,
            path: download_url.to_string(),
            message: String::new(),
        })?;

        // Two chunks so consumers exercise real streaming
        let mid = body.len() / 2;
        let tail = if self.broken_content.contains(download_url) {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset mid-body",
            )))
        } else {
            Ok(Bytes::copy_from_slice(&body[mid..]))
        };
        let chunks = vec![Ok(Bytes::copy_from_slice(&body[..mid])), tail];
        Ok(futures::stream::iter(chunks).boxed())
    }
}

/// Image item with a predictable download URL
pub(crate) fn image(name: &str) -> DriveItem {
    DriveItem::file(name, Some("image/jpeg")).with_download_url(format!("https://dl.test/{name}"))
}

/// Video item with a predictable download URL
pub(crate) fn video(name: &str) -> DriveItem {
    DriveItem::file(name, Some("video/mp4")).with_download_url(format!("https://dl.test/{name}"))
}

/// Config pointing every Graph URL at a mock server
pub(crate) fn config_for_mock(server: &MockServer) -> Config {
    Config {
        graph: GraphConfig {
            tenant_id: "tenant".into(),
            client_id: "client".into(),
            client_secret: "secret".into(),
            user: "tester".into(),
            root_folder: "Library".into(),
            graph_base_url: format!("{}/v1.0", server.uri()),
            login_base_url: server.uri(),
            request_timeout: Duration::from_secs(5),
        },
        retry: RetryConfig {
            max_attempts: 0,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Mount a token endpoint that always issues `tok`
pub(crate) async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/tenant/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "access_token": "tok"
        })))
        .mount(server)
        .await;
}

/// Mount a `children` listing for a full drive path made of URL-safe segments
pub(crate) async fn mount_children(server: &MockServer, full_path: &str, items: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/v1.0/users/tester/drive/root:/{full_path}:/children"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": items
        })))
        .mount(server)
        .await;
}

/// Mount raw content under `/content/{name}` and return its URL
pub(crate) async fn mount_content(server: &MockServer, name: &str, body: &[u8]) -> String {
    Mock::given(method("GET"))
        .and(path(format!("/content/{name}")))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
    format!("{}/content/{name}", server.uri())
}
