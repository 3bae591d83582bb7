//! Rasterization of a surface into an opaque RGBA pixel buffer.
//!
//! The surface is serialized to SVG and decoded back into a vector tree at
//! its natural size, then drawn scaled onto a pixmap that was painted with the
//! background color first. Formats without alpha would otherwise end up with
//! a black fill wherever the tree leaves pixels untouched.

use image::RgbaImage;
use resvg::tiny_skia::{self, Pixmap, Transform};
use resvg::usvg::{self, Tree};

use crate::config::ExportSettings;
use crate::error::{Error, Result};
use crate::request::Color;
use crate::surface::QrSurface;

/// Pixel size of a file export of `surface`.
///
/// # Errors
///
/// Returns [`Error::Rasterization`] when the upscaled size does not fit in
/// a `u32`.
pub fn export_size(surface: &QrSurface, settings: &ExportSettings) -> Result<u32> {
    surface.size().checked_mul(settings.upscale_factor).ok_or_else(|| {
        Error::Rasterization(format!(
            "{} px at {}x upscale is too large to rasterize",
            surface.size(),
            settings.upscale_factor
        ))
    })
}

/// Decodes SVG markup into a vector tree.
///
/// Parsing runs on the blocking pool; awaiting it is the only suspension
/// point of a rasterization.
///
/// # Errors
///
/// Returns [`Error::Rasterization`] when the markup is malformed.
pub async fn decode_markup(markup: String) -> Result<Tree> {
    tokio::task::spawn_blocking(move || {
        Tree::from_str(&markup, &usvg::Options::default())
            .map_err(|e| Error::Rasterization(format!("cannot decode markup: {}", e)))
    })
    .await
    .map_err(|e| Error::Rasterization(format!("decode task failed: {}", e)))?
}

/// Rasterizes `surface` into a `target_size` square buffer over `background`.
///
/// # Arguments
///
/// * `surface` - The symbol to draw.
/// * `target_size` - Width and height of the output buffer in pixels.
/// * `background` - Opaque fill painted before the symbol is drawn.
///
/// # Errors
///
/// Returns [`Error::Rasterization`] when the surface markup cannot be decoded
/// or a `target_size` pixmap cannot be allocated.
///
/// # Example
///
/// ```rust
/// use qrexport::{raster, EncodingRequest, QrSurface};
///
/// # async fn run() -> qrexport::Result<()> {
/// let surface = QrSurface::render(&EncodingRequest::new("Hello, World!")?)?;
/// let img = raster::rasterize(&surface, 1024, surface.background()).await?;
/// assert_eq!(img.dimensions(), (1024, 1024));
/// # Ok(())
/// # }
/// ```
pub async fn rasterize(surface: &QrSurface, target_size: u32, background: Color) -> Result<RgbaImage> {
    let tree = decode_markup(surface.to_svg_string()).await?;
    draw(&tree, target_size, background)
}

/// Rasterizes at the display size, without upscaling.
pub async fn preview(surface: &QrSurface) -> Result<RgbaImage> {
    rasterize(surface, surface.size(), surface.background()).await
}

fn draw(tree: &Tree, target_size: u32, background: Color) -> Result<RgbaImage> {
    let mut pixmap = Pixmap::new(target_size, target_size).ok_or_else(|| {
        Error::Rasterization(format!("cannot allocate a {0}x{0} surface", target_size))
    })?;
    pixmap.fill(tiny_skia::Color::from_rgba8(background.r, background.g, background.b, 255));

    let natural = tree.size();
    let transform = Transform::from_scale(
        target_size as f32 / natural.width(),
        target_size as f32 / natural.height(),
    );
    resvg::render(tree, transform, &mut pixmap.as_mut());
    log::debug!(
        "rasterized {}x{} tree into {}x{} buffer",
        natural.width(),
        natural.height(),
        target_size,
        target_size
    );

    // Every pixel is opaque, so premultiplied and straight RGBA coincide.
    RgbaImage::from_raw(target_size, target_size, pixmap.take())
        .ok_or_else(|| Error::Rasterization("pixel buffer has the wrong length".to_string()))
}
