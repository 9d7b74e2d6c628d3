//! Export of the rendered preview as a PNG.
//!
//! An [`ExportPipeline`] holds an ordered list of [`CaptureStrategy`]
//! implementations and tries them in turn:
//!
//! - [`VectorCapture`]: display list → SVG with bundled fonts → resvg
//! - [`SnapshotCapture`]: display list painted directly onto an RGBA buffer
//! - [`RemoteCapture`]: tree markup posted to a rendering service
//!
//! The first success is handed to a [`DeliverySink`]. Failures are returned
//! as [`CaptureError`] and never retried.

mod error;
mod fonts;
mod pipeline;
mod remote;
mod sink;
mod snapshot;
mod strategy;
mod vector;

pub use error::{CaptureError, StrategyFailure};
pub use fonts::{FontBundle, FontData, select_font};
pub use pipeline::{ExportPipeline, ExportedFile};
pub use remote::RemoteCapture;
pub use sink::{DeliverySink, DirectorySink, MemorySink};
pub use snapshot::SnapshotCapture;
pub use strategy::{CaptureStrategy, CaptureTarget, Raster};
pub use vector::{VectorCapture, VectorDocument};
