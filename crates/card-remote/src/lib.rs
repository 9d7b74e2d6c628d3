//! HTTP collaborators for the card editor.
//!
//! All requests go through a shared blocking [`ureq::Agent`] created by
//! [`create_agent`]. Error statuses never surface as transport errors; they
//! become [`RemoteError::Status`] with the response body.

mod error;
mod flight;
mod http;
mod render;
mod title;

pub use error::RemoteError;
pub use flight::{FlightGuard, InFlight};
pub use http::{create_agent, fetch_bytes, png_dimensions};
pub use render::RemoteRenderClient;
pub use title::TitleLookup;
pub use ureq::Agent;
