//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the auth core talks to driven adapters (user storage,
//! session storage, password hashing, the request's token carrier). Each
//! trait exposes strongly typed errors so adapters map their failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_hasher;
mod session_cookie;
mod session_store;
mod user_directory;

#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError};
#[cfg(test)]
pub use session_cookie::MockSessionCookie;
pub use session_cookie::{SessionCookie, SessionCookieError};
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{SessionStore, SessionStoreError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError};
