pub mod config;
pub mod document;
pub mod grammar;
pub mod handlers;
pub mod position;
pub mod protocol;
pub mod server;

// Re-export from comment-translate-core
pub use comment_translate_core::{CoreError, Result, Settings};

// Re-export server
pub use server::Backend;
