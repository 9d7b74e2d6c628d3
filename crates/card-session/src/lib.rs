//! Editor session for card templates.
//!
//! An [`EditorSession`] is the explicit context object of one editing
//! session. It owns the variable store, the live renderer, the remount
//! controller, the export pipeline and the title lookup, all created from a
//! [`SessionConfig`] when the session starts and torn down by
//! [`EditorSession::close`].
//!
//! ```no_run
//! use card_config::Config;
//! use card_session::{EditorSession, SessionConfig};
//!
//! let config = Config::load(None, None)?;
//! let session_config = SessionConfig::from_config(&config)?
//!     .with_markup("<h1>{{ query.title }}</h1>");
//! let mut session = EditorSession::new(session_config);
//! session.upsert_variable("title", "Hello");
//! let file = session.export()?;
//! assert!(file.bytes_len > 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod mode;
mod session;

pub use config::SessionConfig;
pub use error::EditError;
pub use mode::EditMode;
pub use session::EditorSession;
