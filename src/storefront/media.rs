//! Product gallery assembly.
//!
//! The photo is the canonical storefront thumbnail, so it always leads; the
//! other single-media columns follow, then the `medias` list. Duplicates are
//! dropped by exact string match, keeping the first occurrence.

use serde::Serialize;

use crate::domain::aggregates::Product;

/// Shown by callers when a product has nothing to display.
pub const PLACEHOLDER: &str = "🎁";

const STREAM_HOST_MARKER: &str = "cloudflarestream.com";
const IFRAME_MARKER: &str = "iframe";
const INLINE_VIDEO_PREFIX: &str = "data:video";
const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "webm", "mov", "avi", "mkv"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    StreamEmbed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MediaItem {
    pub url: String,
    pub kind: MediaKind,
}

/// Ordered, de-duplicated media URLs for a product. May be empty.
pub fn resolve_media(product: &Product) -> Vec<String> {
    let mut resolved: Vec<String> = Vec::new();
    let singles = [&product.photo, &product.image, &product.video];
    let candidates = singles
        .into_iter()
        .filter_map(Option::as_deref)
        .chain(product.medias.iter().map(String::as_str));

    for url in candidates {
        if url.trim().is_empty() || resolved.iter().any(|seen| seen == url) {
            continue;
        }
        resolved.push(url.to_string());
    }
    resolved
}

pub fn classify(url: &str) -> MediaKind {
    if url.contains(STREAM_HOST_MARKER) && url.contains(IFRAME_MARKER) {
        MediaKind::StreamEmbed
    } else if url.starts_with(INLINE_VIDEO_PREFIX) || has_video_extension(url) {
        MediaKind::Video
    } else {
        MediaKind::Image
    }
}

fn has_video_extension(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rsplit_once('.')
        .map(|(_, ext)| VIDEO_EXTENSIONS.iter().any(|v| ext.eq_ignore_ascii_case(v)))
        .unwrap_or(false)
}

/// Resolved media with their kinds, in display order.
pub fn gallery(product: &Product) -> Vec<MediaItem> {
    resolve_media(product)
        .into_iter()
        .map(|url| MediaItem { kind: classify(&url), url })
        .collect()
}

/// First gallery entry, used for product cards.
pub fn primary_media(product: &Product) -> Option<MediaItem> {
    resolve_media(product)
        .into_iter()
        .next()
        .map(|url| MediaItem { kind: classify(&url), url })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product { id: "p1".into(), name: "Tomate".into(), ..Default::default() }
    }

    #[test]
    fn test_photo_priority_and_dedup() {
        let p = Product { photo: Some("A".into()), image: Some("A".into()), video: Some("B".into()), ..product() };
        assert_eq!(resolve_media(&p), vec!["A", "B"]);
    }

    #[test]
    fn test_medias_appended_in_order() {
        let p = Product {
            image: Some("img.jpg".into()),
            medias: vec!["m2.jpg".into(), " ".into(), "img.jpg".into(), "m1.mp4".into(), "m2.jpg".into()],
            ..product()
        };
        assert_eq!(resolve_media(&p), vec!["img.jpg", "m2.jpg", "m1.mp4"]);
    }

    #[test]
    fn test_blank_singles_skipped() {
        let p = Product { photo: Some("   ".into()), video: Some("v.webm".into()), ..product() };
        assert_eq!(resolve_media(&p), vec!["v.webm"]);
    }

    #[test]
    fn test_zero_media_product() {
        let p = product();
        assert!(resolve_media(&p).is_empty());
        assert!(gallery(&p).is_empty());
        assert_eq!(primary_media(&p), None);
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("https://customer-x.cloudflarestream.com/abc/iframe"), MediaKind::StreamEmbed);
        assert_eq!(classify("https://customer-x.cloudflarestream.com/abc/thumb.jpg"), MediaKind::Image);
        assert_eq!(classify("https://cdn.example.com/clip.MOV"), MediaKind::Video);
        assert_eq!(classify("https://cdn.example.com/clip.mkv?token=1"), MediaKind::Video);
        assert_eq!(classify("data:video/mp4;base64,AAAA"), MediaKind::Video);
        assert_eq!(classify("https://cdn.example.com/photo.png"), MediaKind::Image);
        assert_eq!(classify("https://cdn.example.com/movie.png"), MediaKind::Image);
    }

    #[test]
    fn test_gallery_kinds() {
        let p = Product { photo: Some("a.jpg".into()), video: Some("b.mp4".into()), ..product() };
        let kinds: Vec<_> = gallery(&p).into_iter().map(|m| m.kind).collect();
        assert_eq!(kinds, vec![MediaKind::Image, MediaKind::Video]);
    }
}
