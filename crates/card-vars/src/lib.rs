//! Variable bindings for card templates.
//!
//! Templates reference named query variables (`{{ title }}`). This crate holds
//! the current bindings and tells dependents when they change:
//!
//! - [`VariableSet`]: name → value mapping, replaced wholesale or upserted
//! - [`VariableStore`]: shared, snapshot-based store with change events
//! - [`RenderKey`]: remount token derived from the bindings and a generation
//! - [`VariableReceiver`]: per-subscriber change notifications
//!
//! # Example
//!
//! ```
//! use card_vars::{ChangeOrigin, VariableSet, VariableStore};
//!
//! let store = VariableStore::new();
//! let events = store.subscribe();
//!
//! let before = store.render_key();
//! let after = store.replace(VariableSet::from_pairs([("title", "Example")]), ChangeOrigin::Manual);
//!
//! assert_ne!(before, after);
//! assert_eq!(events.try_recv().map(|e| e.key), Some(after));
//! assert_eq!(store.snapshot().get("title"), Some("Example"));
//! ```

mod event;
mod key;
mod set;
mod store;

pub use event::{ChangeOrigin, VariableEvent, VariableReceiver};
pub use key::RenderKey;
pub use set::{VariableError, VariableSet};
pub use store::VariableStore;
