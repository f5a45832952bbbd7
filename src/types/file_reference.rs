use serde::{Deserialize, Serialize};

/// An opaque handle to a file uploaded through the Gemini Files API.
///
/// The handle is only meaningful to the remote service; it can be attached to a
/// subsequent request but is never written to an exported transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileReference {
    /// Resource name assigned by the service, e.g. `files/abc-123`.
    pub name: String,

    /// URI used to reference the file from a request.
    pub uri: String,

    /// MIME type the file was uploaded with.
    pub mime_type: String,

    /// Human-readable name, usually the local file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl FileReference {
    /// Create a new `FileReference`.
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            mime_type: mime_type.into(),
            display_name: None,
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// The name to show the user: the display name when known, else the resource name.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}
