pub mod config;
pub mod logger;
pub mod error;
pub mod slug;
pub mod text_utils;
pub mod content;
pub mod discovery;
pub mod index;
pub mod resolver;
pub mod query_string;
pub mod toc;
pub mod paginator;
pub mod library;
#[cfg(test)]
mod test_data;

pub use content::{ContentKind, ContentRecord};
pub use error::{IndexError, Result};
pub use library::Library;
