//! Microsoft Graph implementation of [`DriveProvider`]

use super::types::{ChildrenPage, TokenResponse};
use super::{AccessToken, ContentStream, DriveItem, DriveProvider};
use crate::config::{GraphConfig, RetryConfig};
use crate::error::{Error, Result};
use crate::retry::with_retry;
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use std::time::Duration;

const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Connect timeout for every Graph and content request
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// OneDrive access through Microsoft Graph using the client credentials flow
#[derive(Clone, Debug)]
pub struct GraphClient {
    http: reqwest::Client,
    config: GraphConfig,
    retry: RetryConfig,
}

impl GraphClient {
    /// Create a client for the configured tenant, app registration and drive owner
    pub fn new(config: GraphConfig, retry: RetryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("cinesphere/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config,
            retry,
        })
    }

    /// Token endpoint for the configured tenant
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.login_base_url,
            urlencoding::encode(&self.config.tenant_id)
        )
    }

    /// `children` endpoint for a full drive path.
    ///
    /// The user and every path segment are percent-encoded separately so that
    /// `/` keeps addressing sub-folders.
    pub fn children_url(&self, full_path: &str) -> String {
        let encoded_path = full_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        format!(
            "{}/users/{}/drive/root:/{}:/children",
            self.config.graph_base_url,
            urlencoding::encode(&self.config.user),
            encoded_path
        )
    }

    async fn request_token(&self) -> Result<AccessToken> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http
            .post(self.token_url())
            .timeout(self.config.request_timeout)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %message, "Token request rejected");
            return Err(Error::Auth {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!("Obtained Graph access token");
        Ok(AccessToken::new(token.access_token))
    }

    async fn fetch_page(
        &self,
        token: &AccessToken,
        url: &str,
        full_path: &str,
    ) -> Result<ChildrenPage> {
        let response = self
            .http
            .get(url)
            .timeout(self.config.request_timeout)
            .bearer_auth(token.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %full_path,
                status = status.as_u16(),
                body = %message,
                "Graph children request failed"
            );
            return Err(Error::Graph {
                status: status.as_u16(),
                path: full_path.to_string(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl DriveProvider for GraphClient {
    async fn access_token(&self) -> Result<AccessToken> {
        with_retry(&self.retry, || self.request_token()).await
    }

    async fn list_children(&self, token: &AccessToken, full_path: &str) -> Result<Vec<DriveItem>> {
        tracing::debug!(path = %full_path, "Fetching children");

        let mut items = Vec::new();
        let mut next = Some(self.children_url(full_path));
        let mut pages = 0usize;

        while let Some(url) = next.take() {
            let url = url.as_str();
            let page = with_retry(&self.retry, || self.fetch_page(token, url, full_path)).await?;
            pages += 1;
            items.extend(page.value);
            next = page.next_link;
        }

        tracing::debug!(path = %full_path, items = items.len(), pages, "Fetched children");
        Ok(items)
    }

    async fn open_content(&self, download_url: &str) -> Result<ContentStream> {
        // Pre-authenticated URL: no bearer token, no overall timeout (bodies are large)
        let response = with_retry(&self.retry, || self.http.get(download_url).send())
            .await
            .map_err(Error::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Graph {
                status: status.as_u16(),
                path: redact_query(download_url),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.bytes_stream().map_err(Error::from).boxed())
    }
}

impl crate::retry::IsRetryable for reqwest::Error {
    fn is_retryable(&self) -> bool {
        self.is_timeout() || self.is_connect()
    }
}

/// Download URLs embed a temporary credential in the query string; keep it out of errors and logs
fn redact_query(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.to_string()
        }
        Err(_) => "<download url>".to_string(),
    }
}
