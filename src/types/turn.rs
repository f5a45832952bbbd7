use serde::{Deserialize, Serialize};

use crate::types::FileReference;

/// Who produced a turn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The person at the keyboard.
    User,

    /// The remote model.
    Model,
}

impl Speaker {
    /// The label used when exporting a transcript.
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "You",
            Speaker::Model => "Gemini",
        }
    }
}

/// One part of a turn's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    /// Plain text.
    Text(String),

    /// A previously uploaded file.
    FileReference(FileReference),
}

impl ContentPart {
    /// Returns the text of a `Text` part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text(text) => Some(text),
            ContentPart::FileReference(_) => None,
        }
    }
}

impl From<&str> for ContentPart {
    fn from(text: &str) -> Self {
        ContentPart::Text(text.to_string())
    }
}

impl From<String> for ContentPart {
    fn from(text: String) -> Self {
        ContentPart::Text(text)
    }
}

impl From<FileReference> for ContentPart {
    fn from(reference: FileReference) -> Self {
        ContentPart::FileReference(reference)
    }
}

/// A single message exchanged in either direction.
///
/// Turns are immutable once built; the fields are only readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: Speaker,
    content: Vec<ContentPart>,
}

impl Turn {
    /// Create a new turn from its parts.
    pub fn new(role: Speaker, content: Vec<ContentPart>) -> Self {
        Self { role, content }
    }

    /// Create a user turn holding a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Speaker::User, vec![ContentPart::Text(text.into())])
    }

    /// Create a model turn holding a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(Speaker::Model, vec![ContentPart::Text(text.into())])
    }

    /// Who produced this turn.
    pub fn role(&self) -> Speaker {
        self.role
    }

    /// The parts making up this turn.
    pub fn content(&self) -> &[ContentPart] {
        &self.content
    }

    /// All text parts joined by newlines, or `None` if the turn has no text.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self.content.iter().filter_map(ContentPart::as_text).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }
}
