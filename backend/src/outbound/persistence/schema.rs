//! Diesel table definitions.
//!
//! Kept in sync with `backend/migrations` by hand; regenerate with
//! `diesel print-schema` after adding a migration.

diesel::table! {
    /// Registered accounts.
    ///
    /// `username` carries a unique index, which is what makes concurrent
    /// registrations for the same name safe.
    users (id) {
        /// Primary key allocated by the database sequence.
        id -> Int8,
        /// Login name, unique across all users.
        username -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Varchar,
        /// Row creation timestamp.
        created_at -> Timestamptz,
    }
}
