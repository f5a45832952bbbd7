//! The conversation history and its plain-text export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Turn;

/// First line of an exported transcript.
pub const EXPORT_HEADER: &str = "# Conversation history with Gemini";

/// Line written after every exported turn.
pub const TURN_DELIMITER: &str = "---";

/// Ordered, append-only record of the conversation.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single turn.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Appends a user turn and the reply to it.
    pub fn commit_exchange(&mut self, user: Turn, reply: Turn) {
        self.turns.reserve(2);
        self.turns.push(user);
        self.turns.push(reply);
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if nothing has been said yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Renders the export text: a header, then one labeled block per turn.
    ///
    /// Turns without any text part are skipped.
    pub fn render(&self) -> String {
        let mut out = format!("{EXPORT_HEADER}\n\n");
        for turn in &self.turns {
            if let Some(text) = turn.text() {
                out.push_str(&format!(
                    "{}:\n{}\n\n{TURN_DELIMITER}\n\n",
                    turn.role().label(),
                    text
                ));
            }
        }
        out
    }

    /// Writes the export text to `path`, replacing any existing file.
    pub fn export_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|err| Error::io_at("failed to create history file", path, err))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(self.render().as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|err| Error::io_at("failed to write history file", path, err))
    }
}
