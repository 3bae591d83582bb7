//! Export orchestration.
//!
//! [`ExportOrchestrator`] runs one export at a time through
//! `Validating → Rasterizing → Encoding → Delivering`, catches every failure
//! and turns the outcome into a single [`Notification`]. A failed export
//! leaves the orchestrator ready for the next attempt; nothing is retried.

use std::fs;
use std::path::{Path, PathBuf};

use crate::clipboard::{self, ClipboardHost};
use crate::config::ExportSettings;
use crate::error::{Error, ErrorKind, Result};
use crate::format::{self, ArtifactSource, ExportArtifact, ExportTarget};
use crate::raster;
use crate::surface::QrSurface;

/// Where finished file artifacts go.
pub trait FileSink {
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<()>;
}

/// Saves artifacts under a directory, creating it when missing.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl FileSink for DirectorySink {
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<()> {
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory)?;
        }
        let path = self.directory.join(&artifact.suggested_filename);
        fs::write(&path, &artifact.bytes)?;
        log::info!("saved {} ({} bytes)", path.display(), artifact.bytes.len());
        Ok(())
    }
}

/// Steps of a single export invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Validating,
    Rasterizing,
    Encoding,
    Delivering,
    Done,
    Failed(ErrorKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// The user-facing outcome of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notification {
    fn success(message: &str) -> Self {
        Self { level: NoticeLevel::Success, message: message.to_string() }
    }

    fn error(message: String) -> Self {
        Self { level: NoticeLevel::Error, message }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

enum Delivery {
    File(ExportTarget),
    Clipboard,
}

/// Drives exports of rendered surfaces to files and the clipboard.
#[derive(Debug)]
pub struct ExportOrchestrator<F, C> {
    settings: ExportSettings,
    files: F,
    clipboard: C,
    trace: Vec<ExportState>,
}

impl<F: FileSink, C: ClipboardHost> ExportOrchestrator<F, C> {
    pub fn new(settings: ExportSettings, files: F, clipboard: C) -> Self {
        Self { settings, files, clipboard, trace: vec![ExportState::Idle] }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn files(&self) -> &F {
        &self.files
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// States visited by the most recent invocation, starting with `Idle`.
    pub fn trace(&self) -> &[ExportState] {
        &self.trace
    }

    /// The state the most recent invocation ended in.
    pub fn state(&self) -> ExportState {
        self.trace.last().copied().unwrap_or(ExportState::Idle)
    }

    /// Exports `surface` as `target` and hands the artifact to the file sink.
    ///
    /// Raster targets are drawn at the display size times the configured
    /// upscale factor. Failures never escape: they end the run in
    /// [`ExportState::Failed`] and come back as an error notification.
    ///
    /// # Arguments
    ///
    /// * `surface` - The current symbol, or `None` while nothing is rendered.
    /// * `target` - The file format to produce.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use qrexport::{
    ///     DirectorySink, EncodingRequest, ExportOrchestrator, ExportSettings, ExportTarget, QrSurface,
    ///     SystemClipboard,
    /// };
    ///
    /// # async fn run() -> qrexport::Result<()> {
    /// let surface = QrSurface::for_request(&EncodingRequest::new("https://example.com")?)?;
    /// let mut exporter =
    ///     ExportOrchestrator::new(ExportSettings::default(), DirectorySink::new("generated"), SystemClipboard);
    /// let notice = exporter.export(surface.as_ref(), ExportTarget::Vector).await;
    /// assert!(notice.is_success());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn export(&mut self, surface: Option<&QrSurface>, target: ExportTarget) -> Notification {
        match self.run(surface, Delivery::File(target)).await {
            Ok(()) => Notification::success("QR Code downloaded successfully!"),
            Err(err) => self.fail(err, "Failed to export QR Code"),
        }
    }

    /// Copies `surface`, rasterized at its display size, to the clipboard.
    pub async fn copy_to_clipboard(&mut self, surface: Option<&QrSurface>) -> Notification {
        match self.run(surface, Delivery::Clipboard).await {
            Ok(()) => Notification::success("QR Code copied to clipboard!"),
            Err(err) => self.fail(err, "Failed to copy QR Code"),
        }
    }

    async fn run(&mut self, surface: Option<&QrSurface>, delivery: Delivery) -> Result<()> {
        self.trace.clear();
        self.trace.push(ExportState::Idle);

        self.enter(ExportState::Validating);
        let surface = surface.ok_or(Error::NoContent)?;

        match delivery {
            Delivery::Clipboard => {
                self.enter(ExportState::Rasterizing);
                let buffer = raster::preview(surface).await?;
                self.enter(ExportState::Encoding);
                let artifact = clipboard::encode_image(&buffer)?;
                self.enter(ExportState::Delivering);
                clipboard::deliver(&mut self.clipboard, &artifact)?;
            }
            Delivery::File(ExportTarget::Vector) => {
                self.enter(ExportState::Encoding);
                let markup = surface.to_svg_string();
                let artifact = format::encode(ArtifactSource::Markup(&markup), ExportTarget::Vector, &self.settings)?;
                self.enter(ExportState::Delivering);
                self.files.deliver(&artifact)?;
            }
            Delivery::File(target) => {
                self.enter(ExportState::Rasterizing);
                let size = raster::export_size(surface, &self.settings)?;
                let buffer = raster::rasterize(surface, size, surface.background()).await?;
                self.enter(ExportState::Encoding);
                let artifact = format::encode(ArtifactSource::Pixels(&buffer), target, &self.settings)?;
                self.enter(ExportState::Delivering);
                self.files.deliver(&artifact)?;
            }
        }

        self.enter(ExportState::Done);
        Ok(())
    }

    fn enter(&mut self, state: ExportState) {
        log::debug!("export state: {:?}", state);
        self.trace.push(state);
    }

    fn fail(&mut self, err: Error, prefix: &str) -> Notification {
        log::warn!("{}: {}", prefix, err);
        self.trace.push(ExportState::Failed(err.kind()));
        Notification::error(format!("{}: {}", prefix, err))
    }
}
