//! Error correction level selection.
//!
//! Short payloads leave room in the symbol for heavy redundancy, long ones
//! do not, so the selected level steps down as the payload grows.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The error correction level of a QR Code symbol, ordered by damage tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorLevel {
    /// Recovers about 7% of the codewords.
    L,
    /// Recovers about 15% of the codewords.
    M,
    /// Recovers about 25% of the codewords.
    Q,
    /// Recovers about 30% of the codewords.
    H,
}

impl ErrorLevel {
    pub fn as_char(self) -> char {
        match self {
            ErrorLevel::L => 'L',
            ErrorLevel::M => 'M',
            ErrorLevel::Q => 'Q',
            ErrorLevel::H => 'H',
        }
    }

    pub(crate) fn to_qr(self) -> qrcode::EcLevel {
        match self {
            ErrorLevel::L => qrcode::EcLevel::L,
            ErrorLevel::M => qrcode::EcLevel::M,
            ErrorLevel::Q => qrcode::EcLevel::Q,
            ErrorLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for ErrorLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(ErrorLevel::L),
            "M" => Ok(ErrorLevel::M),
            "Q" => Ok(ErrorLevel::Q),
            "H" => Ok(ErrorLevel::H),
            other => Err(Error::InvalidRequest(format!("unknown error correction level '{}'", other))),
        }
    }
}

/// Returns the error correction level for a payload of `payload_len` characters.
pub fn select(payload_len: usize) -> ErrorLevel {
    match payload_len {
        0..=100 => ErrorLevel::H,
        101..=500 => ErrorLevel::Q,
        501..=1000 => ErrorLevel::M,
        _ => ErrorLevel::L,
    }
}

/// Same as [`select`], measuring `text` in characters.
pub fn select_for(text: &str) -> ErrorLevel {
    select(text.chars().count())
}
