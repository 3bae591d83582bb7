//! The rendered QR symbol and its vector serialization.
//!
//! Symbol construction itself is delegated to the `qrcode` crate. This module
//! captures its module grid together with the styling of the request that
//! produced it, and turns the result into SVG markup or a text preview.

use qrcode::{Color as Module, QrCode};

use crate::ecc::ErrorLevel;
use crate::error::{Error, Result};
use crate::request::{Color, EncodingRequest};

/// Quiet zone width in modules when a margin is requested.
pub const MARGIN_MODULES: u32 = 4;

/// An immutable vector representation of one rendered QR symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrSurface {
    /// Dark modules, row-major, `modules * modules` entries.
    dark: Vec<bool>,
    /// Width of the symbol in modules, without margin.
    modules: u32,
    margin: u32,
    size: u32,
    foreground: Color,
    background: Color,
    error_level: ErrorLevel,
}

impl QrSurface {
    /// Renders the symbol for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] when the text is empty or does not fit in
    /// a symbol at the request's error correction level.
    pub fn render(request: &EncodingRequest) -> Result<Self> {
        if request.is_empty() {
            return Err(Error::Encoding("cannot encode an empty payload".to_string()));
        }
        Self::encode(request, request.text())
    }

    /// Like [`QrSurface::render`], but an empty text renders a symbol for a
    /// single space instead of failing.
    pub fn render_or_blank(request: &EncodingRequest) -> Result<Self> {
        let payload = if request.is_empty() { " " } else { request.text() };
        Self::encode(request, payload)
    }

    /// Returns `None` while there is no text, i.e. nothing to show or export.
    pub fn for_request(request: &EncodingRequest) -> Result<Option<Self>> {
        if request.is_empty() {
            return Ok(None);
        }
        Self::render(request).map(Some)
    }

    fn encode(request: &EncodingRequest, payload: &str) -> Result<Self> {
        let error_level = request.error_level();
        let code = QrCode::with_error_correction_level(payload.as_bytes(), error_level.to_qr())?;
        let modules = code.width() as u32;
        let dark = code.to_colors().into_iter().map(|c| c == Module::Dark).collect();
        log::debug!(
            "rendered {}x{} symbol at level {} for {} byte payload",
            modules,
            modules,
            error_level,
            payload.len()
        );

        Ok(QrSurface {
            dark,
            modules,
            margin: if request.include_margin() { MARGIN_MODULES } else { 0 },
            size: request.size(),
            foreground: request.foreground(),
            background: request.background(),
            error_level,
        })
    }

    /// Width of the symbol in modules, excluding the margin.
    pub fn modules(&self) -> u32 {
        self.modules
    }

    /// Margin on each side, in modules.
    pub fn margin(&self) -> u32 {
        self.margin
    }

    /// Width of the drawn square in modules, margin included.
    pub fn dimension(&self) -> u32 {
        self.modules + 2 * self.margin
    }

    /// Display size in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn error_level(&self) -> ErrorLevel {
        self.error_level
    }

    /// Whether the module at (`x`, `y`) is dark. Coordinates are symbol
    /// coordinates; anything outside the symbol, margin included, is light.
    pub fn is_dark(&self, x: i32, y: i32) -> bool {
        let n = self.modules as i32;
        if x < 0 || y < 0 || x >= n || y >= n {
            return false;
        }
        self.dark[(y * n + x) as usize]
    }

    /// Returns a string of SVG code depicting this symbol.
    ///
    /// Dark modules are merged into horizontal runs and emitted as a single
    /// path. The output is identical for identical surfaces and always uses
    /// Unix newlines.
    pub fn to_svg_string(&self) -> String {
        let dimension = self.dimension();
        let mut result = String::new();
        result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
        result += &format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{0}\" viewBox=\"0 0 {1} {1}\" shape-rendering=\"crispEdges\">\n",
            self.size, dimension
        );
        result += &format!(
            "\t<rect width=\"{0}\" height=\"{0}\" fill=\"{1}\"/>\n",
            dimension,
            self.background.to_hex()
        );
        result += "\t<path d=\"";
        let mut first = true;
        let n = self.modules as i32;
        for y in 0..n {
            let mut x = 0;
            while x < n {
                if !self.is_dark(x, y) {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < n && self.is_dark(x, y) {
                    x += 1;
                }
                if !first {
                    result += " ";
                }
                first = false;
                let offset = self.margin as i32;
                result += &format!("M{},{}h{}v1h-{}z", start + offset, y + offset, x - start, x - start);
            }
        }
        result += &format!("\" fill=\"{}\"/>\n", self.foreground.to_hex());
        result += "</svg>\n";
        result
    }

    /// Renders the symbol as text, two characters per module, one line per row.
    pub fn to_text(&self) -> String {
        let border = self.margin as i32;
        let mut result = String::new();
        for y in -border..self.modules as i32 + border {
            for x in -border..self.modules as i32 + border {
                let c = if self.is_dark(x, y) { '█' } else { ' ' };
                result.push(c);
                result.push(c);
            }
            result.push('\n');
        }
        result
    }
}
