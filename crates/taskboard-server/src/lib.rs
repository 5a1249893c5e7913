pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod service;
pub mod store;

pub use config::Config;
pub use db::DbPool;
pub use error::AppError;
pub use routes::{create_router, AppState};
pub use service::{CascadeScope, CommentError, CommentService};
pub use store::{CommentStore, PgCommentStore, StoreError};
