use serde::{Deserialize, Serialize};

use crate::types::{ContentPart, FileReference, OutgoingTurn, Speaker, Turn};

/// A message as it appears on the wire in a `generateContent` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// `user` or `model`; omitted for system instructions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// The parts of the message.
    pub parts: Vec<Part>,
}

/// One part of a wire message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    /// Inline text.
    Text(String),

    /// A reference to a file uploaded through the Files API.
    FileData(FileData),
}

/// Reference to an uploaded file inside a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    /// MIME type of the uploaded file.
    pub mime_type: String,

    /// URI returned by the Files API.
    pub file_uri: String,
}

impl Content {
    /// Create a new `Content` with the given role and parts.
    pub fn new(role: Option<String>, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    /// Create a role-less text content, as used for system instructions.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(None, vec![Part::Text(text.into())])
    }
}

fn role_name(speaker: Speaker) -> String {
    match speaker {
        Speaker::User => "user".to_string(),
        Speaker::Model => "model".to_string(),
    }
}

impl From<&FileReference> for FileData {
    fn from(reference: &FileReference) -> Self {
        Self {
            mime_type: reference.mime_type.clone(),
            file_uri: reference.uri.clone(),
        }
    }
}

impl From<&ContentPart> for Part {
    fn from(part: &ContentPart) -> Self {
        match part {
            ContentPart::Text(text) => Part::Text(text.clone()),
            ContentPart::FileReference(reference) => Part::FileData(FileData::from(reference)),
        }
    }
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Self::new(
            Some(role_name(turn.role())),
            turn.content().iter().map(Part::from).collect(),
        )
    }
}

impl From<&OutgoingTurn> for Content {
    fn from(turn: &OutgoingTurn) -> Self {
        Self::new(
            Some(role_name(Speaker::User)),
            turn.parts().iter().map(Part::from).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn plain_turn_serialization() {
        let content = Content::from(&Turn::model("Hello there"));
        assert_eq!(
            to_value(&content).unwrap(),
            json!({
                "role": "model",
                "parts": [{"text": "Hello there"}]
            })
        );
    }

    #[test]
    fn attached_turn_serialization() {
        let reference = FileReference::new(
            "files/abc",
            "https://generativelanguage.googleapis.com/v1beta/files/abc",
            "application/pdf",
        );
        let content = Content::from(&OutgoingTurn::new("Summarize this", Some(reference)));
        assert_eq!(
            to_value(&content).unwrap(),
            json!({
                "role": "user",
                "parts": [
                    {"text": "Summarize this"},
                    {"fileData": {
                        "mimeType": "application/pdf",
                        "fileUri": "https://generativelanguage.googleapis.com/v1beta/files/abc"
                    }}
                ]
            })
        );
    }

    #[test]
    fn system_instruction_has_no_role() {
        let content = Content::text("Be brief.");
        assert_eq!(
            to_value(&content).unwrap(),
            json!({"parts": [{"text": "Be brief."}]})
        );
    }
}
