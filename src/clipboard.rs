//! Clipboard publishing.
//!
//! Images always travel as PNG so the consumer gets exact pixels. The host
//! side sits behind [`ClipboardHost`]; [`SystemClipboard`] talks to the
//! desktop clipboard through the arboard crate.

use std::borrow::Cow;

use arboard::{Clipboard, ImageData};
use image::{ImageFormat, RgbaImage};

use crate::config::ExportSettings;
use crate::error::{Error, Result};
use crate::format::{self, ArtifactSource, ExportArtifact, ExportTarget};

/// Somewhere a PNG image can be placed for pasting.
pub trait ClipboardHost {
    /// Writes one `image/png` entry. Errors are human-readable messages.
    fn write_png(&mut self, artifact: &ExportArtifact) -> std::result::Result<(), String>;
}

/// The desktop clipboard.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardHost for SystemClipboard {
    fn write_png(&mut self, artifact: &ExportArtifact) -> std::result::Result<(), String> {
        // arboard takes raw RGBA, so the PNG is unpacked at the boundary.
        let img = image::load_from_memory_with_format(&artifact.bytes, ImageFormat::Png)
            .map_err(|e| format!("cannot read image: {}", e))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        let data = ImageData {
            width: width as usize,
            height: height as usize,
            bytes: Cow::Owned(img.into_raw()),
        };

        let mut clipboard = Clipboard::new().map_err(|e| format!("clipboard unavailable: {}", e))?;
        clipboard
            .set_image(data)
            .map_err(|e| format!("clipboard write refused: {}", e))
    }
}

/// Publishes `buffer` to `host` as a PNG image.
///
/// Same as [`encode_image`] followed by [`deliver`].
///
/// # Arguments
///
/// * `host` - The clipboard to write to.
/// * `buffer` - An opaque, non-empty pixel buffer.
///
/// # Errors
///
/// Every failure, including an empty buffer, is reported as
/// [`Error::Clipboard`].
///
/// # Example
///
/// ```rust,no_run
/// use image::{Rgba, RgbaImage};
/// use qrexport::clipboard::{publish, SystemClipboard};
///
/// let buffer = RgbaImage::from_pixel(256, 256, Rgba([255, 255, 255, 255]));
/// publish(&mut SystemClipboard, &buffer).expect("clipboard write");
/// ```
pub fn publish<H: ClipboardHost + ?Sized>(host: &mut H, buffer: &RgbaImage) -> Result<()> {
    let artifact = encode_image(buffer)?;
    deliver(host, &artifact)
}

/// Encodes `buffer` as the PNG entry a clipboard receives.
pub fn encode_image(buffer: &RgbaImage) -> Result<ExportArtifact> {
    if buffer.width() == 0 || buffer.height() == 0 {
        return Err(Error::Clipboard("image is empty".to_string()));
    }
    format::encode(
        ArtifactSource::Pixels(buffer),
        ExportTarget::RasterLossless,
        &ExportSettings::default(),
    )
    .map_err(|e| Error::Clipboard(e.to_string()))
}

/// Writes an already encoded PNG `artifact` to `host`.
pub fn deliver<H: ClipboardHost + ?Sized>(host: &mut H, artifact: &ExportArtifact) -> Result<()> {
    host.write_png(artifact).map_err(Error::Clipboard)?;
    log::info!("copied {} byte image to clipboard", artifact.bytes.len());
    Ok(())
}
