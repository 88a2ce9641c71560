//! Image URL resolution for Sanity assets.
//!
//! Resolution is total: every input yields a usable, non-empty URL. Absent or
//! malformed assets fall back to [`PLACEHOLDER_IMAGE`].

use super::types::Image;
use crate::config::SanityConfig;

/// Path served when an image cannot be resolved.
pub const PLACEHOLDER_IMAGE: &str = "/images/products/placeholder.jpg";

/// Host of the Sanity image CDN.
pub const IMAGE_CDN_HOST: &str = "cdn.sanity.io";

/// Document-type prefix carried by real image asset references.
const ASSET_REF_PREFIX: &str = "image-";

/// Builds image URLs for one project and dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    /// Create a builder for the given project and dataset.
    #[must_use]
    pub fn new(project_id: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: dataset.into(),
        }
    }

    /// Create a builder from the Sanity configuration.
    #[must_use]
    pub fn from_config(config: &SanityConfig) -> Self {
        Self::new(&config.project_id, &config.dataset)
    }

    /// Resolve an image to a URL.
    ///
    /// 1. No image or no asset: the placeholder.
    /// 2. Asset with a direct URL: that URL, verbatim.
    /// 3. Otherwise the asset reference (or, failing that, the asset ID) is
    ///    split on `-` into `file-id`, `dimensions`, `format` and formatted as
    ///    `https://cdn.sanity.io/images/<project>/<dataset>/<file-id>-<dimensions>.<format>`.
    ///    A leading `image-` is ignored; any other segment count yields the
    ///    placeholder.
    #[must_use]
    pub fn resolve(&self, image: Option<&Image>) -> String {
        let Some(asset) = image.and_then(|i| i.asset.as_ref()) else {
            return PLACEHOLDER_IMAGE.to_string();
        };

        if let Some(url) = asset.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return url.to_string();
        }

        asset
            .reference
            .as_deref()
            .or_else(|| asset.id.as_ref().map(|id| id.as_str()))
            .and_then(|reference| self.cdn_url(reference))
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string())
    }

    /// Format a CDN URL from an opaque asset reference, if well formed.
    fn cdn_url(&self, reference: &str) -> Option<String> {
        let reference = reference
            .strip_prefix(ASSET_REF_PREFIX)
            .unwrap_or(reference);

        let mut segments = reference.split('-');
        let (Some(file_id), Some(dimensions), Some(format), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return None;
        };

        if [file_id, dimensions, format].iter().any(|s| s.is_empty()) {
            return None;
        }

        Some(format!(
            "https://{IMAGE_CDN_HOST}/images/{}/{}/{file_id}-{dimensions}.{format}",
            self.project_id, self.dataset
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanity::types::ImageAsset;

    fn builder() -> ImageUrlBuilder {
        ImageUrlBuilder::new("P1", "production")
    }

    fn with_reference(reference: &str) -> Image {
        Image {
            asset: Some(ImageAsset {
                reference: Some(reference.to_string()),
                ..ImageAsset::default()
            }),
        }
    }

    #[test]
    fn test_absent_image_is_placeholder() {
        assert_eq!(builder().resolve(None), PLACEHOLDER_IMAGE);
        assert_eq!(builder().resolve(Some(&Image::default())), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_asset_without_reference_or_url_is_placeholder() {
        let image = Image {
            asset: Some(ImageAsset::default()),
        };
        assert_eq!(builder().resolve(Some(&image)), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_three_segment_reference() {
        assert_eq!(
            builder().resolve(Some(&with_reference("abc123-800x600-jpg"))),
            "https://cdn.sanity.io/images/P1/production/abc123-800x600.jpg"
        );
    }

    #[test]
    fn test_prefixed_reference() {
        assert_eq!(
            builder().resolve(Some(&with_reference("image-abc123-800x600-png"))),
            "https://cdn.sanity.io/images/P1/production/abc123-800x600.png"
        );
    }

    #[test]
    fn test_malformed_references_fall_back() {
        for reference in ["abc123-800x600", "a-b-c-d", "", "--", "abc123"] {
            assert_eq!(
                builder().resolve(Some(&with_reference(reference))),
                PLACEHOLDER_IMAGE,
                "reference {reference:?}"
            );
        }
    }

    #[test]
    fn test_direct_url_wins() {
        let image = Image {
            asset: Some(ImageAsset {
                reference: Some("abc123-800x600-jpg".to_string()),
                url: Some("https://cdn.example.com/direct.jpg".to_string()),
                ..ImageAsset::default()
            }),
        };
        assert_eq!(
            builder().resolve(Some(&image)),
            "https://cdn.example.com/direct.jpg"
        );
    }

    #[test]
    fn test_falls_back_to_asset_id() {
        let image = Image {
            asset: Some(ImageAsset {
                id: Some("image-f00-10x10-webp".into()),
                ..ImageAsset::default()
            }),
        };
        assert_eq!(
            builder().resolve(Some(&image)),
            "https://cdn.sanity.io/images/P1/production/f00-10x10.webp"
        );
    }
}
