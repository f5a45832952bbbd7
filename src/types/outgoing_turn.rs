use crate::types::{ContentPart, FileReference};

/// The new user turn handed to the remote model.
///
/// A turn either carries text alone or text together with the file that was
/// loaded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingTurn {
    /// Text only.
    Plain {
        /// The user's message.
        text: String,
    },

    /// Text plus a previously uploaded file.
    Attached {
        /// The user's message.
        text: String,
        /// The file to send along with the message.
        attachment: FileReference,
    },
}

impl OutgoingTurn {
    /// Build a turn, attaching `attachment` when present.
    pub fn new(text: impl Into<String>, attachment: Option<FileReference>) -> Self {
        let text = text.into();
        match attachment {
            Some(attachment) => OutgoingTurn::Attached { text, attachment },
            None => OutgoingTurn::Plain { text },
        }
    }

    /// The user's message.
    pub fn text(&self) -> &str {
        match self {
            OutgoingTurn::Plain { text } | OutgoingTurn::Attached { text, .. } => text,
        }
    }

    /// The attached file, if any.
    pub fn attachment(&self) -> Option<&FileReference> {
        match self {
            OutgoingTurn::Plain { .. } => None,
            OutgoingTurn::Attached { attachment, .. } => Some(attachment),
        }
    }

    /// The content parts sent for this turn, text first.
    pub fn parts(&self) -> Vec<ContentPart> {
        match self {
            OutgoingTurn::Plain { text } => vec![ContentPart::Text(text.clone())],
            OutgoingTurn::Attached { text, attachment } => vec![
                ContentPart::Text(text.clone()),
                ContentPart::FileReference(attachment.clone()),
            ],
        }
    }
}
