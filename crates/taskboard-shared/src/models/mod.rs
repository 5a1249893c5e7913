mod base;
mod comment;

pub use base::*;
pub use comment::*;
