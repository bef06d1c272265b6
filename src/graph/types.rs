//! Microsoft Graph wire types (drive items, children pages, tokens)

use serde::{Deserialize, Serialize};

/// A file or folder as returned by the Graph `children` endpoint.
///
/// Only the fields the library needs are modelled; unknown fields are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    /// Drive item ID
    #[serde(default)]
    pub id: Option<String>,

    /// File or folder name (empty when Graph omits it)
    #[serde(default)]
    pub name: String,

    /// Size in bytes
    #[serde(default)]
    pub size: Option<u64>,

    /// Present when the item is a folder
    #[serde(default)]
    pub folder: Option<FolderFacet>,

    /// Present when the item is a file
    #[serde(default)]
    pub file: Option<FileFacet>,

    /// Short-lived pre-authenticated content URL
    #[serde(rename = "@microsoft.graph.downloadUrl", default)]
    pub download_url: Option<String>,

    /// Link to the item in the OneDrive web UI
    #[serde(default)]
    pub web_url: Option<String>,
}

/// Folder facet
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    /// Number of direct children
    #[serde(default)]
    pub child_count: Option<u64>,
}

/// File facet
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    /// MIME type reported by OneDrive
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl DriveItem {
    /// A file item with an optional MIME type
    pub fn file(name: impl Into<String>, mime_type: Option<&str>) -> Self {
        Self {
            name: name.into(),
            file: Some(FileFacet {
                mime_type: mime_type.map(String::from),
            }),
            ..Default::default()
        }
    }

    /// A folder item
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folder: Some(FolderFacet::default()),
            ..Default::default()
        }
    }

    /// Set the download URL
    #[must_use]
    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }

    /// Whether the item is a folder
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    /// Whether the item is a file
    pub fn is_file(&self) -> bool {
        self.file.is_some()
    }
}

/// One page of a `children` listing
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChildrenPage {
    #[serde(default)]
    pub value: Vec<DriveItem>,

    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Token endpoint response (client credentials grant)
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

/// Bearer token for Graph calls.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw bearer token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw bearer token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}
