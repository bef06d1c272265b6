//! Cover and poster selection
//!
//! Artwork lives next to the media as ordinary image files. Matching is by
//! normalized name first, then by naming convention, then "whatever image is
//! there".

use crate::graph::DriveItem;
use crate::media::normalize_name;

/// Pick the cover image for a folder from the images *inside* that folder.
///
/// Priority:
/// 1. an image whose normalized name equals the normalized folder name
/// 2. an image whose name starts with `cover`
/// 3. an image whose name starts with `poster`
/// 4. the first image
pub fn pick_folder_cover<'a>(
    images: &[&'a DriveItem],
    folder_name: &str,
) -> Option<&'a DriveItem> {
    let folder_key = normalize_name(folder_name);

    images
        .iter()
        .find(|img| normalize_name(&img.name) == folder_key)
        .or_else(|| images.iter().find(|img| starts_with_ci(&img.name, "cover")))
        .or_else(|| images.iter().find(|img| starts_with_ci(&img.name, "poster")))
        .or_else(|| images.first())
        .copied()
}

/// Pick the poster for a video from the images in the same folder: the image
/// with the same normalized name, otherwise the first image.
pub fn pick_poster<'a>(images: &[&'a DriveItem], video_name: &str) -> Option<&'a DriveItem> {
    let video_key = normalize_name(video_name);

    images
        .iter()
        .find(|img| normalize_name(&img.name) == video_key)
        .or_else(|| images.first())
        .copied()
}

fn starts_with_ci(name: &str, prefix: &str) -> bool {
    name.to_lowercase().starts_with(prefix)
}
