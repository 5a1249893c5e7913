//! Persistence boundary for comments.
//!
//! The service only talks to `dyn CommentStore`, so the entity rules do not
//! depend on which database holds the rows.

mod postgres;

pub use postgres::PgCommentStore;

use async_trait::async_trait;
use taskboard_shared::{Comment, CommentFilter, CommentPatch, NewComment};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD over the comments collection with store-assigned identity and base
/// timestamps. Results are ordered by ascending id.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// First match, or `None` when nothing matches.
    async fn find_one(&self, filter: &CommentFilter) -> StoreResult<Option<Comment>>;

    async fn find(&self, filter: &CommentFilter) -> StoreResult<Vec<Comment>>;

    async fn create(&self, fields: &NewComment) -> StoreResult<Comment>;

    /// Applies `patch` to every match, refreshing `updated_at`.
    async fn update(&self, filter: &CommentFilter, patch: &CommentPatch)
        -> StoreResult<Vec<Comment>>;

    /// Removes every match and returns how many rows went away.
    async fn destroy(&self, filter: &CommentFilter) -> StoreResult<u64>;
}
