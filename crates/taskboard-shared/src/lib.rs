pub mod api;
pub mod models;
pub mod time;

pub use models::*;
pub use time::StoreTimezone;
