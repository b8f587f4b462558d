//! Persistence seams.
//!
//! Handlers and the authentication gate only see the `UserDirectory` and
//! `TodoStore` traits. `PgStore` backs them with PostgreSQL; `MemoryStore`
//! keeps everything in process and is what the test-suite runs against.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NewTodo, NewUser, Todo, TodoChanges, User, UserChanges};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Reported when a username or email is already taken at write time.
pub const DUPLICATE_ACCOUNT_MESSAGE: &str = "Username or email already exists";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let Some(db_err) = error.as_database_error() {
            if db_err.is_unique_violation() {
                return StoreError::Conflict(DUPLICATE_ACCOUNT_MESSAGE.to_string());
            }
        }
        StoreError::Database(error.to_string())
    }
}

/// Persistence operations for user records.
///
/// Username and email are each unique. `create` and `update` must report a
/// collision as `StoreError::Conflict` even when a caller's pre-check passed,
/// because two requests can race between the check and the write.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// First user whose username equals `username` or whose email equals `email`.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError>;

    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Returns `None` when no user has this id.
    async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<User>, StoreError>;

    /// Removes the user and every to-do item it owns. Returns `false` if absent.
    async fn delete(&self, id: i32) -> Result<bool, StoreError>;
}

/// Persistence operations for to-do items.
#[async_trait]
pub trait TodoStore: Send + Sync + 'static {
    async fn create(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Todo>, StoreError>;

    /// Items owned by `user_id`, newest first.
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Todo>, StoreError>;

    async fn update(&self, id: i32, changes: TodoChanges) -> Result<Option<Todo>, StoreError>;

    async fn delete(&self, id: i32) -> Result<bool, StoreError>;

    /// Case-insensitive substring match on the title, limited to one owner.
    async fn search_by_title(&self, user_id: i32, title: &str) -> Result<Vec<Todo>, StoreError>;
}
