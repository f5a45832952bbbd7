use serde::{Deserialize, Serialize};

use crate::types::FileReference;

/// Metadata sent when starting a resumable upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadFileRequest {
    /// The file being created.
    pub file: UploadFileMetadata,
}

/// File metadata for an upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileMetadata {
    /// Human-readable name for the file.
    pub display_name: String,
}

impl UploadFileRequest {
    /// Create upload metadata with the given display name.
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            file: UploadFileMetadata {
                display_name: display_name.into(),
            },
        }
    }
}

/// Response of a finalized upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadFileResponse {
    /// The created file.
    pub file: FileReference,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn upload_request_serialization() {
        assert_eq!(
            to_value(UploadFileRequest::new("report.pdf")).unwrap(),
            json!({"file": {"displayName": "report.pdf"}})
        );
    }

    #[test]
    fn upload_response_deserialization() {
        let response: UploadFileResponse = serde_json::from_value(json!({
            "file": {
                "name": "files/r4nd0m",
                "displayName": "report.pdf",
                "mimeType": "application/pdf",
                "uri": "https://generativelanguage.googleapis.com/v1beta/files/r4nd0m"
            }
        }))
        .unwrap();
        assert_eq!(response.file.name, "files/r4nd0m");
        assert_eq!(response.file.label(), "report.pdf");
    }
}
