//! PostgreSQL-backed `UserDirectory` using Diesel.
//!
//! Username uniqueness is enforced by the `users_username_key` index. A
//! concurrent insert that loses the race surfaces as a unique violation and is
//! reported as [`UserDirectoryError::DuplicateUsername`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{NewUser, PasswordHash, User, UserId, UserRecord, Username};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of [`UserDirectory`].
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a directory over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserDirectoryError {
    UserDirectoryError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error, username: Option<&Username>) -> UserDirectoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            UserDirectoryError::duplicate_username(username.map(Username::as_str).unwrap_or_default())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserDirectoryError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => UserDirectoryError::query("database query error"),
        _ => UserDirectoryError::query("database error"),
    }
}

fn row_to_user(id: i64, username: String) -> Result<User, UserDirectoryError> {
    let id = UserId::new(id)
        .map_err(|err| UserDirectoryError::query(format!("invalid user id in database: {err}")))?;
    Ok(User::new(id, Username::new(username)))
}

fn row_to_record(row: UserRow) -> Result<UserRecord, UserDirectoryError> {
    let hash = PasswordHash::new(row.password_hash).map_err(|err| {
        UserDirectoryError::query(format!("invalid password hash in database: {err}"))
    })?;
    Ok(UserRecord::new(row_to_user(row.id, row.username)?, hash))
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserRecord>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(row_to_record).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(i64, String)> = users::table
            .find(id.get())
            .select((users::id, users::username))
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, None))?;
        row.map(|(id, username)| row_to_user(id, username))
            .transpose()
    }

    async fn insert(&self, user: NewUser) -> Result<User, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            username: user.username().as_str(),
            password_hash: user.password_hash().as_str(),
        };
        let (id, username): (i64, String) = diesel::insert_into(users::table)
            .values(&row)
            .returning((users::id, users::username))
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(user.username())))?;
        row_to_user(id, username)
    }
}
