//! Streaming zip archives of a folder's videos
//!
//! The archive is written by a background task into an in-memory pipe whose
//! read half becomes the HTTP body, so memory use is bounded by the pipe size
//! no matter how large the videos are.

use crate::config::{ArchiveCompression, ArchiveConfig};
use crate::error::{Error, Result};
use crate::graph::{AccessToken, ContentStream, DriveItem, DriveProvider};
use crate::library::LibraryPath;
use crate::media::is_video_file_name;
use async_zip::base::write::ZipFileWriter;
use async_zip::{Compression, ZipEntryBuilder};
use bytes::Bytes;
use futures::StreamExt;
use futures::io::AsyncWriteExt;
use futures::stream::BoxStream;
use std::io;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::io::ReaderStream;

/// Zip bytes as they are produced
pub type ArchiveStream = BoxStream<'static, io::Result<Bytes>>;

/// A download ready to be sent
pub struct VideoArchive {
    /// Suggested file name (`<folder>-videos.zip`)
    pub file_name: String,
    /// Archive body
    pub stream: ArchiveStream,
}

/// Totals for one finished archive
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Videos written
    pub entries: usize,
    /// Videos skipped (no download URL, or the fetch failed)
    pub skipped: usize,
    /// Uncompressed bytes written
    pub bytes: u64,
}

/// Download file name for a library path
///
/// ```
/// use cinesphere::archive::archive_file_name;
/// use cinesphere::library::LibraryPath;
///
/// let path = LibraryPath::parse("Series/Alien Earth").unwrap();
/// assert_eq!(archive_file_name(&path), "Series-Alien Earth-videos.zip");
/// assert_eq!(archive_file_name(&LibraryPath::root()), "library-videos.zip");
/// ```
pub fn archive_file_name(relative: &LibraryPath) -> String {
    let base = if relative.is_root() {
        "library".to_string()
    } else {
        relative.as_string()
    };

    let base: String = base
        .chars()
        .filter(|c| *c != '"')
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();

    format!("{base}-videos.zip")
}

/// `Content-Disposition` value for an attachment.
///
/// Non-ASCII names get an ASCII fallback in `filename` plus the exact name in
/// `filename*`.
pub fn content_disposition(file_name: &str) -> String {
    if file_name.is_ascii() {
        return format!("attachment; filename=\"{file_name}\"");
    }

    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();

    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(file_name)
    )
}

impl From<ArchiveCompression> for Compression {
    fn from(value: ArchiveCompression) -> Self {
        match value {
            ArchiveCompression::Stored => Compression::Stored,
            ArchiveCompression::Deflate => Compression::Deflate,
        }
    }
}

/// Stream a zip of every video below `root_full_path`.
///
/// The root folder is listed before anything is spawned, so a bad path fails
/// here. Anything that goes wrong later is logged and ends the stream with an
/// error.
pub async fn stream_folder_videos(
    provider: Arc<dyn DriveProvider>,
    token: AccessToken,
    root_full_path: String,
    config: &ArchiveConfig,
) -> Result<ArchiveStream> {
    let root_items = provider.list_children(&token, &root_full_path).await?;

    let (writer, reader) = tokio::io::duplex(config.pipe_buffer_bytes.max(1));
    let compression = Compression::from(config.compression);

    let handle: JoinHandle<Result<ArchiveSummary>> = tokio::spawn(async move {
        let result = write_archive(
            provider.as_ref(),
            &token,
            &root_full_path,
            root_items,
            writer,
            compression,
        )
        .await;

        match &result {
            Ok(summary) => tracing::info!(
                path = %root_full_path,
                entries = summary.entries,
                skipped = summary.skipped,
                bytes = summary.bytes,
                "Archive finished"
            ),
            Err(e) if is_disconnect(e) => {
                tracing::info!(
                    path = %root_full_path,
                    "Client disconnected during archive download"
                )
            }
            Err(e) => tracing::error!(path = %root_full_path, error = %e, "Archive failed"),
        }

        result
    });

    // Surface a failed writer to the HTTP layer once the pipe drains
    let tail = futures::stream::once(async move {
        match handle.await {
            Ok(Ok(_)) => None,
            Ok(Err(e)) => Some(Err(io::Error::other(e.to_string()))),
            Err(e) => Some(Err(io::Error::other(e))),
        }
    })
    .filter_map(futures::future::ready);

    Ok(ReaderStream::new(reader).chain(tail).boxed())
}

/// Depth-first walk in listing order; a folder's contents follow the folder
async fn write_archive<W>(
    provider: &dyn DriveProvider,
    token: &AccessToken,
    root_full_path: &str,
    root_items: Vec<DriveItem>,
    writer: W,
    compression: Compression,
) -> Result<ArchiveSummary>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    let mut zip = ZipFileWriter::with_tokio(writer);
    let mut summary = ArchiveSummary::default();

    // (relative prefix, remaining items of that folder)
    let mut stack: Vec<(String, std::vec::IntoIter<DriveItem>)> =
        vec![(String::new(), root_items.into_iter())];

    while let Some((prefix, items)) = stack.last_mut() {
        let Some(item) = items.next() else {
            stack.pop();
            continue;
        };

        let relative = if prefix.is_empty() {
            item.name.clone()
        } else {
            format!("{}/{}", prefix, item.name)
        };

        if item.is_folder() {
            let folder_full_path = format!("{root_full_path}/{relative}");
            let children = provider.list_children(token, &folder_full_path).await?;
            tracing::debug!(
                path = %folder_full_path,
                children = children.len(),
                "Descending into folder"
            );
            stack.push((relative, children.into_iter()));
            continue;
        }

        if !item.is_file() || !is_video_file_name(&item.name) {
            continue;
        }

        let Some(url) = item.download_url.as_deref() else {
            tracing::warn!(entry = %relative, "Video has no download URL, skipping");
            summary.skipped += 1;
            continue;
        };

        let content = match provider.open_content(url).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(entry = %relative, error = %e, "Failed to fetch video, skipping");
                summary.skipped += 1;
                continue;
            }
        };

        let written = write_entry(&mut zip, relative.clone(), content, compression).await?;
        tracing::debug!(entry = %relative, bytes = written, "Added archive entry");

        summary.entries += 1;
        summary.bytes += written;
    }

    zip.close().await?;
    Ok(summary)
}

async fn write_entry<W>(
    zip: &mut ZipFileWriter<W>,
    name: String,
    mut content: ContentStream,
    compression: Compression,
) -> Result<u64>
where
    W: futures::io::AsyncWrite + Unpin,
{
    let mut entry = zip
        .write_entry_stream(ZipEntryBuilder::new(name.into(), compression))
        .await?;

    let mut written = 0u64;
    while let Some(chunk) = content.next().await {
        let chunk = chunk?;
        entry.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    entry.close().await?;
    Ok(written)
}

fn is_disconnect(error: &Error) -> bool {
    let io_error = match error {
        Error::Io(e) => e,
        Error::Archive(async_zip::error::ZipError::UpstreamReadError(e)) => e,
        _ => return false,
    };
    matches!(
        io_error.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset
    )
}
