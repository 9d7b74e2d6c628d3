//! The export pipeline.
//!
//! Resolves the mounted preview, runs the configured strategies in order
//! until one succeeds, and hands the PNG to a [`DeliverySink`].

use std::path::PathBuf;
use std::sync::Arc;

use card_config::{Config, StrategyKind};
use card_remote::{Agent, InFlight, RemoteRenderClient};
use card_render::SubtreeHandle;

use crate::error::{CaptureError, StrategyFailure};
use crate::fonts::FontBundle;
use crate::remote::RemoteCapture;
use crate::sink::{DeliverySink, DirectorySink};
use crate::snapshot::SnapshotCapture;
use crate::strategy::{CaptureStrategy, CaptureTarget};
use crate::vector::VectorCapture;

/// Result of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// Written path, when the sink writes to disk.
    pub path: Option<PathBuf>,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    /// Name of the strategy that produced the image.
    pub strategy: &'static str,
    pub bytes_len: usize,
}

/// Captures the preview and delivers it as a file.
pub struct ExportPipeline {
    strategies: Vec<Box<dyn CaptureStrategy>>,
    sink: Box<dyn DeliverySink>,
    in_flight: InFlight,
    filename: String,
    scale: f32,
}

impl ExportPipeline {
    #[must_use]
    pub fn new(strategies: Vec<Box<dyn CaptureStrategy>>, sink: Box<dyn DeliverySink>) -> Self {
        Self {
            strategies,
            sink,
            in_flight: InFlight::new(),
            filename: "preview.png".to_owned(),
            scale: 1.0,
        }
    }

    /// Build the strategies, fonts and sink described by `config`.
    pub fn from_config(config: &Config, agent: &Agent) -> Result<Self, CaptureError> {
        let export = &config.export_resolved;
        let fonts = Arc::new(FontBundle::new(
            config.fonts_resolved.files.clone(),
            config.fonts_resolved.urls.clone(),
            Some(agent.clone()),
            config.fonts_resolved.system,
        ));

        let mut strategies: Vec<Box<dyn CaptureStrategy>> = Vec::new();
        for kind in &export.strategies {
            let strategy: Box<dyn CaptureStrategy> = match kind {
                StrategyKind::Vector => Box::new(VectorCapture::new(Arc::clone(&fonts))),
                StrategyKind::Snapshot => Box::new(SnapshotCapture::new(Arc::clone(&fonts))),
                StrategyKind::Remote => {
                    let remote = config.require_remote_render()?;
                    let client = RemoteRenderClient::new(agent.clone(), remote.url.clone());
                    Box::new(RemoteCapture::new(client, remote.css.clone()))
                }
            };
            strategies.push(strategy);
        }

        Ok(Self::new(strategies, Box::new(DirectorySink::new(&export.output_dir)))
            .with_filename(export.filename.clone())
            .with_scale(export.scale))
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Strategy names in the order they are tried.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Whether an export is running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_active()
    }

    /// Capture the preview behind `handle` and deliver it.
    ///
    /// Strategies run in order and the first success wins. With a single
    /// strategy its own error is returned; otherwise
    /// [`CaptureError::AllFailed`] lists every reason. Nothing is delivered
    /// on failure and nothing is retried.
    pub fn export(&self, handle: &SubtreeHandle) -> Result<ExportedFile, CaptureError> {
        let _guard = self.in_flight.try_begin().ok_or(CaptureError::Busy)?;

        let preview = handle.resolve().ok_or(CaptureError::SubtreeNotFound)?;
        let viewport = preview.viewport();
        if viewport.is_empty() {
            return Err(CaptureError::ZeroSize {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if self.strategies.is_empty() {
            return Err(CaptureError::NoStrategies);
        }

        let target = CaptureTarget::from_preview(&preview, self.scale);
        target.pixel_size()?;
        let generation = preview.key().generation();
        drop(preview);

        let mut errors = Vec::new();
        for strategy in &self.strategies {
            match strategy.capture(&target) {
                Ok(raster) => {
                    let path = self.sink.deliver(&self.filename, &raster.png)?;
                    tracing::info!(
                        strategy = strategy.name(),
                        generation,
                        width = raster.width,
                        height = raster.height,
                        bytes = raster.png.len(),
                        "Exported preview"
                    );
                    return Ok(ExportedFile {
                        path,
                        filename: self.filename.clone(),
                        width: raster.width,
                        height: raster.height,
                        strategy: strategy.name(),
                        bytes_len: raster.png.len(),
                    });
                }
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), error = %e, "Capture strategy failed");
                    errors.push((strategy.name(), e));
                }
            }
        }

        if errors.len() == 1
            && let Some((_, error)) = errors.pop()
        {
            return Err(error);
        }
        Err(CaptureError::AllFailed(
            errors
                .into_iter()
                .map(|(strategy, e)| StrategyFailure {
                    strategy,
                    reason: e.to_string(),
                })
                .collect(),
        ))
    }
}
