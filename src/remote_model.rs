//! The seam between the chat session and the service that generates replies.

use std::path::Path;

use crate::error::Result;
use crate::types::{FileReference, OutgoingTurn, Turn};

/// A remote model that can take uploaded files and answer conversation turns.
///
/// The chat session only ever talks to the model through this trait, so anything
/// implementing it (the [`Gemini`](crate::Gemini) client, or a scripted stand-in in
/// tests) can drive a conversation.
#[async_trait::async_trait]
pub trait RemoteModel: Send + Sync {
    /// Register a local file with the service so it can be attached to a later turn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`](crate::Error::FileNotFound) when `path` does
    /// not name an existing file, and any other error when the upload fails.
    async fn register_file(&self, path: &Path) -> Result<FileReference>;

    /// Send `turn` following `history` and return the generated reply text.
    async fn send_turn(&self, history: &[Turn], turn: &OutgoingTurn) -> Result<String>;
}
