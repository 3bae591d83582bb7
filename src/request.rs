//! The immutable input of the rendering pipeline.

use std::fmt;
use std::str::FromStr;

use crate::ecc::{self, ErrorLevel};
use crate::error::{Error, Result};

/// Longest accepted payload, in characters.
pub const MAX_TEXT_CHARS: usize = 2000;
/// Smallest display size in pixels.
pub const MIN_SIZE: u32 = 128;
/// Largest display size in pixels.
pub const MAX_SIZE: u32 = 512;
/// Display sizes move in increments of this many pixels.
pub const SIZE_STEP: u32 = 8;
pub const DEFAULT_SIZE: u32 = 256;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || Error::InvalidRequest(format!("'{}' is not a hex color", hex));
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, slot) in rgb.iter_mut().enumerate() {
                    *slot = channel(&digits[i..=i])? * 17;
                }
                Ok(Color::rgb(rgb[0], rgb[1], rgb[2]))
            }
            6 => Ok(Color::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb` form, as written into SVG markup.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_hex(s)
    }
}

/// Clamps `size` into `[MIN_SIZE, MAX_SIZE]` and snaps it to the nearest step.
pub fn clamp_size(size: u32) -> u32 {
    let clamped = size.clamp(MIN_SIZE, MAX_SIZE);
    let steps = (clamped - MIN_SIZE + SIZE_STEP / 2) / SIZE_STEP;
    (MIN_SIZE + steps * SIZE_STEP).min(MAX_SIZE)
}

/// Everything needed to render one QR symbol.
///
/// Requests are values: each setter consumes the request and returns a new
/// one, so a change in the UI always produces a fresh request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingRequest {
    text: String,
    size: u32,
    foreground: Color,
    background: Color,
    error_level: Option<ErrorLevel>,
    include_margin: bool,
}

impl EncodingRequest {
    /// Builds a request with default styling.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] when `text` exceeds [`MAX_TEXT_CHARS`].
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        check_text(&text)?;
        Ok(EncodingRequest {
            text,
            size: DEFAULT_SIZE,
            foreground: Color::BLACK,
            background: Color::WHITE,
            error_level: None,
            include_margin: true,
        })
    }

    /// Replaces the text, keeping styling and any level override.
    pub fn with_text(self, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        check_text(&text)?;
        Ok(EncodingRequest { text, ..self })
    }

    pub fn with_size(self, size: u32) -> Self {
        EncodingRequest { size: clamp_size(size), ..self }
    }

    pub fn with_colors(self, foreground: Color, background: Color) -> Self {
        EncodingRequest { foreground, background, ..self }
    }

    /// Pins the error correction level instead of deriving it from the text.
    pub fn with_error_level(self, level: ErrorLevel) -> Self {
        EncodingRequest { error_level: Some(level), ..self }
    }

    /// Drops a pinned level so it is derived from the text again.
    pub fn with_auto_error_level(self) -> Self {
        EncodingRequest { error_level: None, ..self }
    }

    pub fn with_margin(self, include_margin: bool) -> Self {
        EncodingRequest { include_margin, ..self }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn foreground(&self) -> Color {
        self.foreground
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// The pinned level, or the one selected for the current text.
    pub fn error_level(&self) -> ErrorLevel {
        self.error_level.unwrap_or_else(|| ecc::select_for(&self.text))
    }

    pub fn is_error_level_overridden(&self) -> bool {
        self.error_level.is_some()
    }

    pub fn include_margin(&self) -> bool {
        self.include_margin
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn check_text(text: &str) -> Result<()> {
    let chars = text.chars().count();
    if chars > MAX_TEXT_CHARS {
        return Err(Error::InvalidRequest(format!(
            "text is {} characters long, the limit is {}",
            chars, MAX_TEXT_CHARS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parsing() {
        assert_eq!(Color::from_hex("#221F26").unwrap(), Color::rgb(0x22, 0x1f, 0x26));
        assert_eq!(Color::from_hex("fff").unwrap(), Color::WHITE);
        assert_eq!(Color::from_hex("#0a0").unwrap(), Color::rgb(0, 0xaa, 0));
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("#ééé").is_err());
        assert!(Color::from_hex("#+1+2+3").is_err());
        assert!(Color::from_hex("+ff").is_err());
        assert_eq!(Color::rgb(255, 0, 16).to_hex(), "#ff0010");
    }

    #[test]
    fn test_clamp_size() {
        assert_eq!(clamp_size(0), 128);
        assert_eq!(clamp_size(128), 128);
        assert_eq!(clamp_size(131), 128);
        assert_eq!(clamp_size(132), 136);
        assert_eq!(clamp_size(256), 256);
        assert_eq!(clamp_size(510), 512);
        assert_eq!(clamp_size(4096), 512);
    }

    #[test]
    fn test_defaults() {
        let req = EncodingRequest::new("https://example.com").unwrap();
        assert_eq!(req.size(), 256);
        assert_eq!(req.foreground(), Color::BLACK);
        assert_eq!(req.background(), Color::WHITE);
        assert!(req.include_margin());
        assert_eq!(req.error_level(), ErrorLevel::H);
    }

    #[test]
    fn test_text_limit() {
        assert!(EncodingRequest::new("a".repeat(MAX_TEXT_CHARS)).is_ok());
        let err = EncodingRequest::new("a".repeat(MAX_TEXT_CHARS + 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_level_follows_text_unless_pinned() {
        let req = EncodingRequest::new("short").unwrap();
        assert_eq!(req.error_level(), ErrorLevel::H);

        let req = req.with_text("x".repeat(600)).unwrap();
        assert_eq!(req.error_level(), ErrorLevel::M);

        let req = req.with_error_level(ErrorLevel::Q).with_text("short").unwrap();
        assert_eq!(req.error_level(), ErrorLevel::Q);
        assert!(req.is_error_level_overridden());

        let req = req.with_auto_error_level();
        assert_eq!(req.error_level(), ErrorLevel::H);
    }

    #[test]
    fn test_setters_build_new_values() {
        let base = EncodingRequest::new("hello").unwrap();
        let resized = base.clone().with_size(300);
        assert_eq!(base.size(), 256);
        assert_eq!(resized.size(), 304);
        assert_ne!(base, resized);
    }
}
