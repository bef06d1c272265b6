//! API-facing types for cinesphere

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One entry of a folder listing
///
/// Serialized with a `type` tag so the frontend can switch on
/// `"folder"` / `"video"`. Field names are camelCase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LibraryItem {
    /// A sub-folder (category, series, season, ...)
    Folder(FolderEntry),
    /// A playable video file
    Video(VideoEntry),
}

/// Folder card data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    /// Folder name
    pub name: String,
    /// Path relative to the library root (e.g. "Movies/Bollywood")
    pub path: String,
    /// Download URL of the folder's cover image, if one was found
    pub cover_url: Option<String>,
}

/// Video card data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoEntry {
    /// File name including extension
    pub name: String,
    /// Path relative to the library root
    pub path: String,
    /// Display title derived from the file name
    pub title: String,
    /// Pre-authenticated streaming URL
    pub video_url: Option<String>,
    /// Download URL of the matching poster image, if any
    pub poster_url: Option<String>,
    /// File size in bytes
    pub size: Option<u64>,
}

impl LibraryItem {
    /// Entry name
    pub fn name(&self) -> &str {
        match self {
            LibraryItem::Folder(f) => &f.name,
            LibraryItem::Video(v) => &v.name,
        }
    }

    /// Path relative to the library root
    pub fn path(&self) -> &str {
        match self {
            LibraryItem::Folder(f) => &f.path,
            LibraryItem::Video(v) => &v.path,
        }
    }
}

/// Response body for `GET /api/browse`
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BrowseResponse {
    /// Folders first, then videos, each in drive listing order
    pub items: Vec<LibraryItem>,
}
