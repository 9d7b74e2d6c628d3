//! Live rendering of card templates.
//!
//! Turns raw template markup plus variable bindings into a visual tree and a
//! positioned display list, and keeps the mounted preview keyed by the
//! bindings' [`RenderKey`](card_vars::RenderKey):
//!
//! - [`interpolate`]: `{{ name }}` / `{{ query.name }}` substitution
//! - [`parse_markup`]: strict, JSX-like markup parsing into a [`VisualTree`]
//! - [`layout`]: block and inline layout into a [`DisplayList`]
//! - [`LiveRenderer`]: `Idle → Rendering → Rendered | Errored` state machine
//! - [`RemountController`]: remount on new keys, update in place otherwise
//!
//! # Example
//!
//! ```
//! use card_render::{LiveRenderer, RenderState};
//! use card_vars::VariableSet;
//!
//! let mut renderer = LiveRenderer::new();
//! let vars = VariableSet::from_pairs([("title", "Example")]);
//!
//! let state = renderer.render("<h1>{{ title }}</h1>", &vars);
//! assert!(matches!(state, RenderState::Rendered(_)));
//!
//! renderer.render("<h1>{{ title }}", &vars);
//! assert!(renderer.error().is_some());
//! assert!(renderer.last_good().is_some());
//! ```

mod error;
mod layout;
mod parser;
mod remount;
mod renderer;
mod style;
mod template;
mod tree;

pub use error::RenderError;
pub use layout::{DisplayItem, DisplayList, Rect, Viewport, char_advance, layout};
pub use parser::parse_markup;
pub use remount::{MountDecision, MountedPreview, RemountController, SubtreeHandle};
pub use renderer::{LiveRenderer, RenderState};
pub use style::{ComputedStyle, Display, LineHeight, TextAlign};
pub use template::interpolate;
pub use tree::{ElementNode, Node, VisualTree};
