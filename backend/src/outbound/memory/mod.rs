//! In-process adapters for the user directory and the session store.
//!
//! Used when no database or Redis URL is configured, and throughout the test
//! suites. State lives behind `tokio::sync::RwLock` and is lost on restart.

mod session_store;
mod user_directory;

pub use session_store::{DEFAULT_SESSION_TTL, MemorySessionStore};
pub use user_directory::MemoryUserDirectory;
