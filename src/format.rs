//! Serialization of rendered symbols into downloadable artifacts.

use std::fmt;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};

use crate::config::ExportSettings;
use crate::error::{Error, Result};

/// The file formats a symbol can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportTarget {
    /// SVG markup.
    Vector,
    /// PNG.
    RasterLossless,
    /// JPEG.
    RasterLossy,
}

impl ExportTarget {
    pub const ALL: [ExportTarget; 3] =
        [ExportTarget::Vector, ExportTarget::RasterLossless, ExportTarget::RasterLossy];

    pub fn extension(self) -> &'static str {
        match self {
            ExportTarget::Vector => "svg",
            ExportTarget::RasterLossless => "png",
            ExportTarget::RasterLossy => "jpeg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportTarget::Vector => "image/svg+xml",
            ExportTarget::RasterLossless => "image/png",
            ExportTarget::RasterLossy => "image/jpeg",
        }
    }

    pub fn is_raster(self) -> bool {
        !matches!(self, ExportTarget::Vector)
    }
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(ExportTarget::Vector),
            "png" => Ok(ExportTarget::RasterLossless),
            "jpeg" | "jpg" => Ok(ExportTarget::RasterLossy),
            other => Err(Error::InvalidRequest(format!("unsupported export format '{}'", other))),
        }
    }
}

/// What an artifact is built from.
#[derive(Debug, Clone, Copy)]
pub enum ArtifactSource<'a> {
    /// SVG markup of a surface.
    Markup(&'a str),
    /// A rasterized, opaque surface.
    Pixels(&'a RgbaImage),
}

/// Encoded bytes ready for a download or the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub suggested_filename: String,
    pub mime_type: &'static str,
}

/// Encodes `source` as `target`.
///
/// # Arguments
///
/// * `source` - SVG markup for [`ExportTarget::Vector`], a rasterized
///   surface for the raster targets.
/// * `target` - The format to produce.
/// * `settings` - Supplies the filename stem and the JPEG quality.
///
/// # Errors
///
/// Returns [`Error::Format`] when the source kind does not match the target
/// (markup for a raster target or pixels for a vector one), or when the image
/// encoder fails.
///
/// # Example
///
/// ```rust
/// use qrexport::format::{encode, ArtifactSource, ExportTarget};
/// use qrexport::ExportSettings;
///
/// let markup = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"1\" height=\"1\"/>";
/// let artifact = encode(ArtifactSource::Markup(markup), ExportTarget::Vector, &ExportSettings::default()).unwrap();
/// assert_eq!(artifact.suggested_filename, "qrcode.svg");
/// ```
pub fn encode(source: ArtifactSource<'_>, target: ExportTarget, settings: &ExportSettings) -> Result<ExportArtifact> {
    let bytes = match (source, target) {
        (ArtifactSource::Markup(markup), ExportTarget::Vector) => markup.as_bytes().to_vec(),
        (ArtifactSource::Pixels(img), ExportTarget::RasterLossless) => encode_png(img)?,
        (ArtifactSource::Pixels(img), ExportTarget::RasterLossy) => encode_jpeg(img, settings.jpeg_quality)?,
        (ArtifactSource::Markup(_), _) => {
            return Err(Error::Format(format!("{} export needs a rasterized surface", target)));
        }
        (ArtifactSource::Pixels(_), _) => {
            return Err(Error::Format("vector export needs markup, not pixels".to_string()));
        }
    };
    log::debug!("encoded {} artifact, {} bytes", target, bytes.len());

    Ok(ExportArtifact {
        bytes,
        suggested_filename: format!("{}.{}", settings.file_stem, target.extension()),
        mime_type: target.mime_type(),
    })
}

fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)?;
    Ok(bytes)
}

fn encode_jpeg(img: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    // JPEG has no alpha channel; the buffer is opaque so dropping it loses nothing.
    let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes)
}
