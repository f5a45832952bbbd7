//! Line input for the conversation loop.
//!
//! The session reads through [`LineReader`]; the binary uses a rustyline editor and
//! tests replay scripted lines.

use std::io;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::{Error, Result};

/// What a single prompt for input produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line of input without its trailing newline.
    Line(String),
    /// The user pressed Ctrl-C.
    Interrupted,
    /// Input is exhausted (Ctrl-D or a closed stdin).
    Eof,
}

/// Source of user input lines.
pub trait LineReader {
    /// Shows `prompt` and blocks until a line, an interrupt or end of input.
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome>;
}

/// Terminal line editor with in-memory history.
pub struct EditorReader {
    editor: DefaultEditor,
}

impl EditorReader {
    /// Creates an editor attached to the terminal.
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(readline_error)?;
        Ok(Self { editor })
    }
}

impl LineReader for EditorReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(ReadOutcome::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(err) => Err(readline_error(err)),
        }
    }
}

fn readline_error(err: ReadlineError) -> Error {
    match err {
        ReadlineError::Io(source) => Error::io("failed to read input", source),
        other => Error::io("failed to read input", io::Error::other(other.to_string())),
    }
}

/// Replays a fixed list of lines, then reports end of input.
///
/// Used to drive a session from something other than a terminal.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    lines: std::collections::VecDeque<ReadOutcome>,
}

impl ScriptedReader {
    /// Creates a reader yielding `lines` in order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|line| ReadOutcome::Line(line.into()))
                .collect(),
        }
    }

    /// Queues an interrupt after the lines already queued.
    pub fn push_interrupt(&mut self) {
        self.lines.push_back(ReadOutcome::Interrupted);
    }

    /// Queues another line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push_back(ReadOutcome::Line(line.into()));
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _prompt: &str) -> Result<ReadOutcome> {
        Ok(self.lines.pop_front().unwrap_or(ReadOutcome::Eof))
    }
}
