//! Media library: folder browsing with cover/poster resolution, and zip downloads
//!
//! Every call goes straight to the drive. One access token is fetched per call
//! and reused for all drive requests that call makes.

use crate::archive::{self, VideoArchive};
use crate::config::{ArchiveConfig, Config, LibraryConfig};
use crate::error::Result;
use crate::graph::{AccessToken, DriveItem, DriveProvider, GraphClient};
use crate::media::{is_image, is_video, prettify_title};
use crate::types::{FolderEntry, LibraryItem, VideoEntry};
use futures::StreamExt;
use std::sync::Arc;

mod cover;
mod path;

pub use cover::{pick_folder_cover, pick_poster};
pub use path::LibraryPath;

/// The media library rooted at a folder of a cloud drive
#[derive(Clone)]
pub struct Library {
    provider: Arc<dyn DriveProvider>,
    root_folder: String,
    config: LibraryConfig,
    archive: ArchiveConfig,
}

impl Library {
    /// Create a library over any drive provider
    pub fn new(
        provider: Arc<dyn DriveProvider>,
        root_folder: impl Into<String>,
        config: LibraryConfig,
        archive: ArchiveConfig,
    ) -> Self {
        Self {
            provider,
            root_folder: root_folder.into(),
            config,
            archive,
        }
    }

    /// Create a library backed by Microsoft Graph
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = GraphClient::new(config.graph.clone(), config.retry.clone())?;
        Ok(Self::new(
            Arc::new(client),
            config.graph.root_folder.clone(),
            config.library.clone(),
            config.archive.clone(),
        ))
    }

    /// List a folder of the library.
    ///
    /// Sub-folders come first, each with a cover image resolved from inside
    /// it; videos follow, each with a poster picked from the images next to
    /// it. Both keep the drive's listing order.
    pub async fn browse(&self, relative: &LibraryPath) -> Result<Vec<LibraryItem>> {
        let token = self.provider.access_token().await?;
        let full_path = relative.full_path(&self.root_folder);

        let children = self.provider.list_children(&token, &full_path).await?;

        let folders: Vec<&DriveItem> = children.iter().filter(|i| i.is_folder()).collect();
        let images: Vec<&DriveItem> = children.iter().filter(|i| is_image(i)).collect();
        let videos: Vec<&DriveItem> = children.iter().filter(|i| is_video(i)).collect();

        tracing::debug!(
            path = %full_path,
            folders = folders.len(),
            videos = videos.len(),
            images = images.len(),
            "Classified children"
        );

        // Built up front so each lookup owns its folder name
        let cover_lookups: Vec<_> = folders
            .into_iter()
            .map(|folder| {
                let token = &token;
                let name = folder.name.clone();
                let child_path = relative.child(&name);
                async move {
                    let folder_full_path = child_path.full_path(&self.root_folder);
                    let cover_url = self
                        .find_folder_cover(token, &folder_full_path, &name)
                        .await;
                    LibraryItem::Folder(FolderEntry {
                        name,
                        path: child_path.as_string(),
                        cover_url,
                    })
                }
            })
            .collect();

        let mut items: Vec<LibraryItem> = futures::stream::iter(cover_lookups)
            .buffered(self.config.cover_concurrency.max(1))
            .collect()
            .await;

        for video in videos {
            let poster = pick_poster(&images, &video.name);

            tracing::debug!(
                video = %video.name,
                has_url = video.download_url.is_some(),
                poster = poster.map(|p| p.name.as_str()).unwrap_or("none"),
                "Video item"
            );

            items.push(LibraryItem::Video(VideoEntry {
                name: video.name.clone(),
                path: relative.child(&video.name).as_string(),
                title: prettify_title(&video.name),
                video_url: video.download_url.clone(),
                poster_url: poster.and_then(|p| p.download_url.clone()),
                size: video.size,
            }));
        }

        tracing::info!(path = %relative, items = items.len(), "Browsed library path");
        Ok(items)
    }

    /// Resolve a folder's cover from the images inside it.
    ///
    /// Never fails: listing errors are logged and treated as "no cover".
    pub async fn find_folder_cover(
        &self,
        token: &AccessToken,
        folder_full_path: &str,
        folder_name: &str,
    ) -> Option<String> {
        let children = match self.provider.list_children(token, folder_full_path).await {
            Ok(children) => children,
            Err(e) => {
                tracing::error!(path = %folder_full_path, error = %e, "Error finding folder cover");
                return None;
            }
        };

        let images: Vec<&DriveItem> = children.iter().filter(|i| is_image(i)).collect();
        pick_folder_cover(&images, folder_name).and_then(|img| img.download_url.clone())
    }

    /// Start a zip download of every video below `relative`.
    ///
    /// The folder itself is listed before this returns, so a missing path is
    /// reported as an error rather than as a broken download.
    pub async fn download(&self, relative: &LibraryPath) -> Result<VideoArchive> {
        let token = self.provider.access_token().await?;
        let full_path = relative.full_path(&self.root_folder);

        tracing::info!(path = %full_path, "Zipping videos for folder");

        let stream =
            archive::stream_folder_videos(self.provider.clone(), token, full_path, &self.archive)
                .await?;

        Ok(VideoArchive {
            file_name: archive::archive_file_name(relative),
            stream,
        })
    }
}
