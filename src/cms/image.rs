//! Image URL builder for the CMS image CDN
//!
//! Asset references look like `image-<id>-<width>x<height>-<format>`. The
//! builder turns one into a CDN URL carrying resize parameters. Nothing is
//! fetched here; the viewer's browser dereferences the URL.

use thiserror::Error;

use crate::config::CmsConfig;

/// How the CDN fits an image into the requested box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    Clip,
    Crop,
    Fill,
    FillMax,
    Max,
    Scale,
    Min,
}

impl FitMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitMode::Clip => "clip",
            FitMode::Crop => "crop",
            FitMode::Fill => "fill",
            FitMode::FillMax => "fillmax",
            FitMode::Max => "max",
            FitMode::Scale => "scale",
            FitMode::Min => "min",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageUrlError {
    #[error("malformed image asset reference: {0:?}")]
    MalformedRef(String),
}

/// Parsed `image-<id>-<w>x<h>-<format>` reference
#[derive(Debug, PartialEq, Eq)]
struct AssetRef<'a> {
    id: &'a str,
    width: u32,
    height: u32,
    format: &'a str,
}

fn parse_asset_ref(asset_ref: &str) -> Result<AssetRef<'_>, ImageUrlError> {
    let malformed = || ImageUrlError::MalformedRef(asset_ref.to_string());

    let rest = asset_ref.strip_prefix("image-").ok_or_else(malformed)?;
    let mut parts = rest.rsplitn(3, '-');
    let format = parts.next().ok_or_else(malformed)?;
    let dimensions = parts.next().ok_or_else(malformed)?;
    let id = parts.next().ok_or_else(malformed)?;

    let (width, height) = dimensions.split_once('x').ok_or_else(malformed)?;
    let width: u32 = width.parse().map_err(|_| malformed())?;
    let height: u32 = height.parse().map_err(|_| malformed())?;

    let well_formed = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric());
    if !well_formed(id) || !well_formed(format) {
        return Err(malformed());
    }

    Ok(AssetRef {
        id,
        width,
        height,
        format,
    })
}

/// Builds CDN URLs for image assets of one project/dataset
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    base: String,
}

impl ImageUrlBuilder {
    pub fn new(config: &CmsConfig) -> Self {
        Self {
            base: format!(
                "{}/images/{}/{}",
                config.image_host.trim_end_matches('/'),
                config.project_id,
                config.dataset
            ),
        }
    }

    /// Resolve an asset reference to a resized, auto-format URL
    ///
    /// # Examples
    /// ```ignore
    /// builder.build("image-abc123-2000x3000-jpg", 300, 200, FitMode::Max)
    /// // -> "https://cdn.sanity.io/images/<project>/<dataset>/abc123-2000x3000.jpg?w=300&h=200&fit=max&auto=format"
    /// ```
    pub fn build(
        &self,
        asset_ref: &str,
        width: u32,
        height: u32,
        fit: FitMode,
    ) -> Result<String, ImageUrlError> {
        let asset = parse_asset_ref(asset_ref)?;
        Ok(format!(
            "{}/{}-{}x{}.{}?w={}&h={}&fit={}&auto=format",
            self.base,
            asset.id,
            asset.width,
            asset.height,
            asset.format,
            width,
            height,
            fit.as_str()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ImageUrlBuilder {
        let config = CmsConfig {
            project_id: "proj".to_string(),
            dataset: "blog".to_string(),
            ..CmsConfig::default()
        };
        ImageUrlBuilder::new(&config)
    }

    #[test]
    fn test_parse_asset_ref() {
        let asset = parse_asset_ref("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg").unwrap();
        assert_eq!(asset.id, "Tb9Ew8CXIwaY6R1kjMvI0uRR");
        assert_eq!((asset.width, asset.height), (2000, 3000));
        assert_eq!(asset.format, "jpg");
    }

    #[test]
    fn test_build_url() {
        let url = builder()
            .build("image-abc123-2000x3000-jpg", 300, 200, FitMode::Max)
            .unwrap();
        assert_eq!(
            url,
            "https://cdn.sanity.io/images/proj/blog/abc123-2000x3000.jpg?w=300&h=200&fit=max&auto=format"
        );
    }

    #[test]
    fn test_build_url_scale() {
        let url = builder()
            .build("image-abc123-640x480-png", 4000, 900, FitMode::Scale)
            .unwrap();
        assert!(url.ends_with("abc123-640x480.png?w=4000&h=900&fit=scale&auto=format"));
    }

    #[test]
    fn test_malformed_refs() {
        for bad in [
            "",
            "file-abc-100x100-pdf",
            "image-abc-100x100",
            "image-abc-100by100-jpg",
            "image--100x100-jpg",
            "image-abc-100x100-",
            "image-a/b-100x100-jpg",
        ] {
            assert_eq!(
                builder().build(bad, 10, 10, FitMode::Max),
                Err(ImageUrlError::MalformedRef(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }
}
