//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; conversions into domain types
//! live next to the repository that reads them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::users;

/// Row read from the `users` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    #[expect(dead_code, reason = "selected for completeness; not surfaced yet")]
    pub created_at: DateTime<Utc>,
}

/// Insertable user; `id` and `created_at` come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}
