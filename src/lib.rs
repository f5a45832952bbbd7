// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod observability;
pub mod remote_model;
pub mod render;
pub mod types;

// Re-exports
pub use client::Gemini;
pub use client_logger::{ClientLogger, JsonLinesLogger};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use remote_model::RemoteModel;
pub use render::{PlainTextRenderer, Renderer};
pub use types::*;
