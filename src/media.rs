//! Media classification and filename normalisation
//!
//! Drive listings mix videos, artwork and arbitrary other files. These helpers
//! decide what is playable, what can serve as artwork, and how names are
//! compared when matching artwork to folders and videos.

use crate::graph::DriveItem;

/// File extensions treated as playable video
pub const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".mkv", ".mov", ".avi", ".wmv", ".flv", ".webm"];

/// File extensions treated as artwork
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];

/// Whether a drive item is a video, by MIME type or by extension
///
/// # Examples
///
/// ```
/// use cinesphere::graph::DriveItem;
/// use cinesphere::media::is_video;
///
/// let item = DriveItem::file("Shiddat (2021).MKV", None);
/// assert!(is_video(&item));
/// ```
#[must_use]
pub fn is_video(item: &DriveItem) -> bool {
    if item.file.is_none() && item.name.is_empty() {
        return false;
    }

    if mime_starts_with(item, "video/") {
        return true;
    }

    is_video_file_name(&item.name)
}

/// Whether a drive item is an image, by MIME type or by extension
#[must_use]
pub fn is_image(item: &DriveItem) -> bool {
    if item.name.is_empty() {
        return false;
    }

    if mime_starts_with(item, "image/") {
        return true;
    }

    has_extension(&item.name, IMAGE_EXTENSIONS)
}

/// Extension-only video check, used when walking folders for the archive
#[must_use]
pub fn is_video_file_name(name: &str) -> bool {
    has_extension(name, VIDEO_EXTENSIONS)
}

fn mime_starts_with(item: &DriveItem, prefix: &str) -> bool {
    item.file
        .as_ref()
        .and_then(|f| f.mime_type.as_deref())
        .is_some_and(|mime| mime.starts_with(prefix))
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    let lower = name.to_lowercase();
    extensions.iter().any(|ext| lower.ends_with(ext))
}

/// Remove the final `.ext` segment, if the name has one.
///
/// The extension must be non-empty and free of `/`. A trailing dot is kept;
/// `.hidden` becomes empty.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() && !name[idx + 1..].contains('/') => &name[..idx],
        _ => name,
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | '_' | '-' | '(' | ')' | '[' | ']')
}

/// Normalise a name so cosmetic differences don't matter when matching artwork.
///
/// Lowercases, drops the extension, and removes whitespace, dots, underscores,
/// dashes and brackets.
///
/// ```
/// use cinesphere::media::normalize_name;
///
/// assert_eq!(normalize_name("Shiddat(2021) 1080p Hindi.mkv"), "shiddat20211080phindi");
/// assert_eq!(normalize_name("shiddat_2021-1080p.Hindi.jpg"), "shiddat20211080phindi");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let lower = name.to_lowercase();
    strip_extension(&lower)
        .chars()
        .filter(|c| !is_separator(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Human-readable title for a video file: no extension, dots and underscores as spaces
///
/// ```
/// use cinesphere::media::prettify_title;
///
/// assert_eq!(prettify_title("Alien.Earth_S01E01.mkv"), "Alien Earth S01E01");
/// ```
#[must_use]
pub fn prettify_title(name: &str) -> String {
    let mut title = String::with_capacity(name.len());
    let mut in_run = false;

    for c in strip_extension(name).chars() {
        if c == '.' || c == '_' {
            if !in_run {
                title.push(' ');
            }
            in_run = true;
        } else {
            title.push(c);
            in_run = false;
        }
    }

    title
}
