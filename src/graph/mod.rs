//! Cloud drive access
//!
//! [`DriveProvider`] is the seam between the library/archive logic and the
//! storage backend. [`GraphClient`] implements it on top of Microsoft Graph
//! (OneDrive); tests can substitute their own provider.

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

mod client;
mod types;

pub use client::GraphClient;
pub use types::{AccessToken, DriveItem, FileFacet, FolderFacet};

/// Streamed file content
pub type ContentStream = BoxStream<'static, Result<Bytes>>;

/// Read-only access to a cloud drive
#[async_trait]
pub trait DriveProvider: Send + Sync {
    /// Obtain a bearer token for the following calls.
    ///
    /// Callers fetch one token per incoming request and reuse it.
    async fn access_token(&self) -> Result<AccessToken>;

    /// List the direct children of a folder, addressed by its full drive path
    /// (e.g. `MyStreamingLibrary/Movies`).
    async fn list_children(&self, token: &AccessToken, full_path: &str) -> Result<Vec<DriveItem>>;

    /// Open the content behind a pre-authenticated download URL
    async fn open_content(&self, download_url: &str) -> Result<ContentStream>;
}
