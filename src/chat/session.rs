//! Core chat session management.
//!
//! A [`ChatSession`] owns the transcript and the attachment slot and drives the
//! read-eval-print loop: every input line is either a slash command or a message for
//! the model.  Errors inside the loop are reported and the loop keeps going.

use std::path::Path;

use crate::chat::attachment::AttachmentSlot;
use crate::chat::commands::{ChatCommand, help_text, parse_command};
use crate::chat::input::{LineReader, ReadOutcome};
use crate::chat::transcript::Transcript;
use crate::error::Result;
use crate::observability::{
    CHAT_ATTACHMENTS_CONSUMED, CHAT_ATTACHMENTS_REPLACED, CHAT_COMMANDS, CHAT_EXPORTS,
    CHAT_TURN_ERRORS, CHAT_TURNS,
};
use crate::remote_model::RemoteModel;
use crate::render::Renderer;
use crate::types::{FileReference, OutgoingTurn, Turn};

/// Prompt shown when waiting for input.
pub const INPUT_PROMPT: &str = "You: ";

/// Whether the loop keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Reading and handling lines.
    Running,
    /// An exit command or end of input was seen.
    Terminated,
}

/// A conversation with a remote model.
pub struct ChatSession<M: RemoteModel> {
    model: M,
    transcript: Transcript,
    attachment: AttachmentSlot,
    state: SessionState,
}

impl<M: RemoteModel> ChatSession<M> {
    /// Creates a running session with an empty transcript and no attachment.
    pub fn new(model: M) -> Self {
        Self {
            model,
            transcript: Transcript::new(),
            attachment: AttachmentSlot::new(),
            state: SessionState::Running,
        }
    }

    /// Current loop state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Everything said so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The file waiting to go out with the next message.
    pub fn attachment(&self) -> &AttachmentSlot {
        &self.attachment
    }

    /// The remote model this session talks to.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Reads and handles lines until an exit command or end of input.
    ///
    /// Only a failure of the line reader itself ends the loop with an error.
    pub async fn run(
        &mut self,
        reader: &mut dyn LineReader,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        while self.state == SessionState::Running {
            match reader.read_line(INPUT_PROMPT)? {
                ReadOutcome::Line(line) => self.handle_line(&line, renderer).await,
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => self.terminate(renderer),
            }
        }
        Ok(())
    }

    /// Handles one line of input: a command, a message, or nothing.
    pub async fn handle_line(&mut self, line: &str, renderer: &mut dyn Renderer) {
        if let Some(command) = parse_command(line) {
            self.dispatch(command, renderer).await;
        } else if !line.trim().is_empty() {
            self.send_message(line, renderer).await;
        }
    }

    /// Executes a parsed command.
    pub async fn dispatch(&mut self, command: ChatCommand, renderer: &mut dyn Renderer) {
        CHAT_COMMANDS.click();
        match command {
            ChatCommand::Exit => self.terminate(renderer),
            ChatCommand::Help => {
                for line in help_text().lines() {
                    renderer.print_info(line);
                }
            }
            ChatCommand::Load(path) => self.load(&path, renderer).await,
            ChatCommand::Save(path) => self.save(&path, renderer),
            ChatCommand::Usage(usage) => renderer.print_warning(&usage),
            ChatCommand::Unknown(name) => {
                renderer.print_error(&format!("Unknown command: '/{name}'"));
            }
        }
    }

    /// Sends `text`, with the pending attachment if there is one, and records the
    /// exchange.
    ///
    /// The attachment slot is empty afterwards whatever the outcome.  The user turn
    /// and the reply are appended together, and only when the call succeeds.
    pub async fn send(&mut self, text: &str) -> Result<String> {
        let attachment = self.attachment.take();
        if attachment.is_some() {
            CHAT_ATTACHMENTS_CONSUMED.click();
        }
        let outgoing = OutgoingTurn::new(text, attachment);
        CHAT_TURNS.click();
        match self.model.send_turn(self.transcript.turns(), &outgoing).await {
            Ok(reply) => {
                self.transcript
                    .commit_exchange(Turn::user(text), Turn::model(reply.clone()));
                Ok(reply)
            }
            Err(err) => {
                CHAT_TURN_ERRORS.click();
                Err(err)
            }
        }
    }

    /// Sends `text` and shows the reply or the failure.
    pub async fn send_message(&mut self, text: &str, renderer: &mut dyn Renderer) {
        match self.send(text).await {
            Ok(reply) => renderer.print_reply(&reply),
            Err(err) => renderer.print_error(&format!("request failed: {err}")),
        }
    }

    /// Echoes and sends the prompt given on the command line before the loop starts.
    pub async fn prime(&mut self, prompt: &str, renderer: &mut dyn Renderer) {
        renderer.print_info(&format!("{INPUT_PROMPT}{prompt}"));
        self.send_message(prompt, renderer).await;
    }

    /// Uploads `path` and makes it the attachment for the next message.
    pub async fn load(&mut self, path: &str, renderer: &mut dyn Renderer) {
        let display = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        renderer.print_info(&format!("Uploading '{display}' to Gemini..."));

        match self.model.register_file(Path::new(path)).await {
            Ok(reference) => {
                if let Some(replaced) = self.store_attachment(reference) {
                    renderer.print_warning(&format!(
                        "Discarded unused attachment '{}'.",
                        replaced.label()
                    ));
                }
                renderer
                    .print_info("File ready. Ask your question about it in the next message.");
            }
            Err(err) if err.is_file_not_found() => {
                renderer.print_error(&format!("file not found at '{path}'"));
            }
            Err(err) => renderer.print_error(&format!("upload failed: {err}")),
        }
    }

    /// Exports the transcript to `path`.
    pub fn save(&self, path: &str, renderer: &mut dyn Renderer) {
        match self.transcript.export_to(path) {
            Ok(()) => {
                CHAT_EXPORTS.click();
                renderer.print_info(&format!("History saved to {path}"));
            }
            Err(err) => renderer.print_error(&format!("Failed to save history: {err}")),
        }
    }

    fn store_attachment(&mut self, reference: FileReference) -> Option<FileReference> {
        let replaced = self.attachment.set(reference);
        if replaced.is_some() {
            CHAT_ATTACHMENTS_REPLACED.click();
        }
        replaced
    }

    fn terminate(&mut self, renderer: &mut dyn Renderer) {
        self.state = SessionState::Terminated;
        renderer.print_info("Goodbye!");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::Error;

    /// Answers every turn with its own text reversed and never uploads anything.
    struct Echo {
        fail: Mutex<bool>,
    }

    #[async_trait::async_trait]
    impl RemoteModel for Echo {
        async fn register_file(&self, path: &Path) -> Result<FileReference> {
            Err(Error::file_not_found(path))
        }

        async fn send_turn(&self, _history: &[Turn], turn: &OutgoingTurn) -> Result<String> {
            if *self.fail.lock().unwrap() {
                return Err(Error::internal_server("boom"));
            }
            Ok(turn.text().chars().rev().collect())
        }
    }

    fn echo() -> Echo {
        Echo {
            fail: Mutex::new(false),
        }
    }

    #[tokio::test]
    async fn new_session_is_running_and_empty() {
        let session = ChatSession::new(echo());
        assert_eq!(session.state(), SessionState::Running);
        assert!(session.transcript().is_empty());
        assert!(session.attachment().is_empty());
    }

    #[tokio::test]
    async fn send_commits_pair() {
        let mut session = ChatSession::new(echo());
        assert_eq!(session.send("abc").await.unwrap(), "cba");
        let turns = session.transcript().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::user("abc"));
        assert_eq!(turns[1], Turn::model("cba"));
    }

    #[tokio::test]
    async fn failed_send_leaves_transcript_alone() {
        let mut session = ChatSession::new(echo());
        session.send("first").await.unwrap();
        *session.model().fail.lock().unwrap() = true;
        assert!(session.send("second").await.unwrap_err().is_server_error());
        assert_eq!(session.transcript().len(), 2);
    }
}
