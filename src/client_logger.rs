//! Logging trait for Gemini client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows callers to capture
//! every API interaction passing through the [`Gemini`](crate::Gemini) client, and
//! [`JsonLinesLogger`], which appends each interaction to a file as one JSON object
//! per line.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{FileReference, GenerateContentRequest, GenerateContentResponse};

/// A trait for logging Gemini client operations.
///
/// Implementations must not fail the request they observe; errors while logging
/// are the implementation's to swallow.
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    fn log_request(&self, model: &str, request: &GenerateContentRequest);

    /// Log a successfully parsed response.
    fn log_response(&self, model: &str, response: &GenerateContentResponse);

    /// Log a completed file upload.
    fn log_upload(&self, reference: &FileReference);

    /// Log a failed call.
    fn log_error(&self, operation: &str, error: &Error);
}

/// A [`ClientLogger`] that appends one JSON object per event to a file.
pub struct JsonLinesLogger {
    file: Mutex<File>,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum LogEntry<'a> {
    Request {
        model: &'a str,
        request: &'a GenerateContentRequest,
    },
    Response {
        model: &'a str,
        response: &'a GenerateContentResponse,
    },
    Upload {
        file: &'a FileReference,
    },
    Error {
        operation: &'a str,
        message: String,
    },
}

impl JsonLinesLogger {
    /// Open (or create) `path` for appending.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| Error::io_at("failed to open request log", path, err))?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    fn write(&self, entry: &LogEntry<'_>) {
        let Ok(line) = serde_json::to_string(entry) else {
            return;
        };
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{line}");
        }
    }
}

impl ClientLogger for JsonLinesLogger {
    fn log_request(&self, model: &str, request: &GenerateContentRequest) {
        self.write(&LogEntry::Request { model, request });
    }

    fn log_response(&self, model: &str, response: &GenerateContentResponse) {
        self.write(&LogEntry::Response { model, response });
    }

    fn log_upload(&self, reference: &FileReference) {
        self.write(&LogEntry::Upload { file: reference });
    }

    fn log_error(&self, operation: &str, error: &Error) {
        self.write(&LogEntry::Error {
            operation,
            message: error.to_string(),
        });
    }
}
