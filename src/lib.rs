//! # qrexport
//!
//! A Rust library for rendering QR codes from text and exporting them as SVG,
//! PNG or JPEG files, or as a PNG image on the system clipboard.
//!
//! `qrexport` derives the encoding parameters of a symbol from the payload,
//! renders it as a vector surface and rasterizes that surface at any target
//! resolution over an opaque background. Symbol construction itself
//! (Reed–Solomon coding, module placement) is done by the `qrcode` crate.
//!
//! ## Features
//!
//! - Automatic error correction level selection by payload length, with
//!   manual override.
//! - Deterministic SVG output with custom colors and an optional quiet zone.
//! - High-resolution raster exports (4× the display size by default).
//! - Lossless PNG, maximum-quality JPEG and clipboard export.
//! - Export failures are reported as notifications, never as panics.
//!
//! ## Example
//!
//! ```rust,no_run
//! use qrexport::{
//!     DirectorySink, EncodingRequest, ExportOrchestrator, ExportSettings, ExportTarget, QrSurface,
//!     SystemClipboard,
//! };
//!
//! # async fn run() -> qrexport::Result<()> {
//! let request = EncodingRequest::new("https://example.com")?.with_size(256);
//! let surface = QrSurface::for_request(&request)?;
//!
//! let mut exporter = ExportOrchestrator::new(
//!     ExportSettings::default(),
//!     DirectorySink::new("generated"),
//!     SystemClipboard,
//! );
//! let notice = exporter.export(surface.as_ref(), ExportTarget::RasterLossless).await;
//! println!("{}", notice.message);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ecc`]: Error correction level selection.
//! - [`request`]: The immutable encoding request.
//! - [`surface`]: Rendered symbols and their SVG form.
//! - [`raster`]: Rasterization at arbitrary resolution.
//! - [`format`]: SVG, PNG and JPEG artifacts.
//! - [`clipboard`]: Clipboard publishing.
//! - [`export`]: The export state machine.
//! - [`config`]: Export settings.

#![forbid(unsafe_code)]

pub mod clipboard;
pub mod config;
pub mod ecc;
pub mod error;
pub mod export;
pub mod format;
pub mod raster;
pub mod request;
pub mod surface;

pub use clipboard::{ClipboardHost, SystemClipboard};
pub use config::ExportSettings;
pub use ecc::ErrorLevel;
pub use error::{Error, ErrorKind, Result};
pub use export::{DirectorySink, ExportOrchestrator, ExportState, FileSink, Notification, NoticeLevel};
pub use format::{ArtifactSource, ExportArtifact, ExportTarget};
pub use request::{Color, EncodingRequest};
pub use surface::QrSurface;
