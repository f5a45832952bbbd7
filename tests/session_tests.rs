//! Conversation loop tests driven by a scripted model and a recording renderer.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gemini_chat::chat::{ChatSession, ScriptedReader, SessionState, SingleShot};
use gemini_chat::{
    Error, FileReference, OutgoingTurn, RemoteModel, Renderer, Result, Speaker, Turn,
};

/// A remote model that records every call and answers from a script.
#[derive(Default)]
struct MockModel {
    sent: Mutex<Vec<OutgoingTurn>>,
    history_lengths: Mutex<Vec<usize>>,
    uploads: Mutex<Vec<PathBuf>>,
    fail_sends: Mutex<bool>,
    fail_uploads: Mutex<bool>,
}

impl MockModel {
    fn sent(&self) -> Vec<OutgoingTurn> {
        self.sent.lock().unwrap().clone()
    }

    fn fail_sends(&self, fail: bool) {
        *self.fail_sends.lock().unwrap() = fail;
    }

    fn fail_uploads(&self, fail: bool) {
        *self.fail_uploads.lock().unwrap() = fail;
    }
}

#[async_trait::async_trait]
impl RemoteModel for MockModel {
    async fn register_file(&self, path: &Path) -> Result<FileReference> {
        self.uploads.lock().unwrap().push(path.to_path_buf());
        if !path.is_file() {
            return Err(Error::file_not_found(path));
        }
        if *self.fail_uploads.lock().unwrap() {
            return Err(Error::service_unavailable("upload backend down", None));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(
            FileReference::new(format!("files/{name}"), format!("https://files/{name}"), "text/plain")
                .with_display_name(name),
        )
    }

    async fn send_turn(&self, history: &[Turn], turn: &OutgoingTurn) -> Result<String> {
        self.sent.lock().unwrap().push(turn.clone());
        self.history_lengths.lock().unwrap().push(history.len());
        if *self.fail_sends.lock().unwrap() {
            return Err(Error::internal_server("model exploded"));
        }
        Ok(format!("reply to {}", turn.text()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Output {
    Reply(String),
    Text(String),
    Info(String),
    Warning(String),
    Error(String),
}

#[derive(Default)]
struct RecordingRenderer {
    output: Vec<Output>,
}

impl RecordingRenderer {
    fn errors(&self) -> Vec<&str> {
        self.output
            .iter()
            .filter_map(|o| match o {
                Output::Error(e) => Some(e.as_str()),
                _ => None,
            })
            .collect()
    }

    fn warnings(&self) -> Vec<&str> {
        self.output
            .iter()
            .filter_map(|o| match o {
                Output::Warning(w) => Some(w.as_str()),
                _ => None,
            })
            .collect()
    }

    fn infos(&self) -> Vec<&str> {
        self.output
            .iter()
            .filter_map(|o| match o {
                Output::Info(i) => Some(i.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn print_reply(&mut self, text: &str) {
        self.output.push(Output::Reply(text.to_string()));
    }

    fn print_text(&mut self, text: &str) {
        self.output.push(Output::Text(text.to_string()));
    }

    fn print_info(&mut self, info: &str) {
        self.output.push(Output::Info(info.to_string()));
    }

    fn print_warning(&mut self, warning: &str) {
        self.output.push(Output::Warning(warning.to_string()));
    }

    fn print_error(&mut self, error: &str) {
        self.output.push(Output::Error(error.to_string()));
    }
}

#[tokio::test]
async fn successful_sends_grow_transcript_in_pairs() {
    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    let mut reader = ScriptedReader::new(["one", "two", "three", "/exit"]);

    session.run(&mut reader, &mut renderer).await.unwrap();

    let turns = session.transcript().turns();
    assert_eq!(turns.len(), 6);
    for (i, turn) in turns.iter().enumerate() {
        let expected = if i % 2 == 0 { Speaker::User } else { Speaker::Model };
        assert_eq!(turn.role(), expected);
    }
    assert_eq!(turns[4], Turn::user("three"));
    assert_eq!(turns[5], Turn::model("reply to three"));
    assert_eq!(*session.model().history_lengths.lock().unwrap(), vec![0, 2, 4]);
    assert!(renderer
        .output
        .contains(&Output::Reply("reply to two".to_string())));
    assert_eq!(session.state(), SessionState::Terminated);
}

#[tokio::test]
async fn exit_aliases_end_loop_without_remote_call() {
    for alias in ["/exit", "/quit", "/sair"] {
        let mut session = ChatSession::new(MockModel::default());
        let mut renderer = RecordingRenderer::default();
        let mut reader = ScriptedReader::new([alias, "never sent"]);

        session.run(&mut reader, &mut renderer).await.unwrap();

        assert_eq!(session.state(), SessionState::Terminated);
        assert!(session.model().sent().is_empty(), "{alias}");
        assert!(session.transcript().is_empty());
    }
}

#[tokio::test]
async fn end_of_input_terminates() {
    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    let mut reader = ScriptedReader::new(["hello"]);

    session.run(&mut reader, &mut renderer).await.unwrap();

    assert_eq!(session.state(), SessionState::Terminated);
    assert_eq!(session.transcript().len(), 2);
    assert!(renderer.infos().contains(&"Goodbye!"));
}

#[tokio::test]
async fn interrupt_and_blank_lines_are_ignored() {
    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    let mut reader = ScriptedReader::new(["", "   "]);
    reader.push_interrupt();
    reader.push_line("still here");

    session.run(&mut reader, &mut renderer).await.unwrap();

    assert_eq!(session.model().sent().len(), 1);
    assert_eq!(session.transcript().len(), 2);
}

#[tokio::test]
async fn attachment_goes_out_once_with_next_message() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("report.txt");
    std::fs::write(&file, "numbers").unwrap();

    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    let load = format!("/load {}", file.display());
    let mut reader = ScriptedReader::new([load.as_str(), "summarize", "and again?", "/exit"]);

    session.run(&mut reader, &mut renderer).await.unwrap();

    let sent = session.model().sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        sent[0].attachment().map(|a| a.name.as_str()),
        Some("files/report.txt")
    );
    assert!(sent[1].attachment().is_none());
    assert!(session.attachment().is_empty());
    assert_eq!(session.transcript().turns()[0], Turn::user("summarize"));
    assert!(renderer
        .infos()
        .iter()
        .any(|i| i.contains("Uploading 'report.txt'")));
}

#[tokio::test]
async fn attachment_is_consumed_even_when_send_fails() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("data.csv");
    std::fs::write(&file, "a,b").unwrap();

    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    session
        .handle_line(&format!("/load {}", file.display()), &mut renderer)
        .await;
    assert!(!session.attachment().is_empty());

    session.model().fail_sends(true);
    session.handle_line("what is this?", &mut renderer).await;

    assert!(session.attachment().is_empty());
    assert!(session.transcript().is_empty());
    assert_eq!(renderer.errors().len(), 1);
    assert!(renderer.errors()[0].contains("model exploded"));

    session.model().fail_sends(false);
    session.handle_line("retry", &mut renderer).await;
    let sent = session.model().sent();
    assert!(sent[1].attachment().is_none());
    assert_eq!(session.transcript().len(), 2);
}

#[tokio::test]
async fn failed_send_keeps_earlier_turns() {
    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    session.handle_line("first", &mut renderer).await;
    let before = session.transcript().turns().to_vec();

    session.model().fail_sends(true);
    session.handle_line("second", &mut renderer).await;

    assert_eq!(session.transcript().turns(), before.as_slice());
    assert_eq!(session.state(), SessionState::Running);
}

#[tokio::test]
async fn load_of_missing_file_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.pdf");

    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    session.handle_line("hi", &mut renderer).await;
    session
        .handle_line(&format!("/load {}", missing.display()), &mut renderer)
        .await;

    assert!(session.attachment().is_empty());
    assert_eq!(session.transcript().len(), 2);
    let errors = renderer.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("file not found at"));
}

#[tokio::test]
async fn failed_upload_keeps_previous_attachment() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");
    std::fs::write(&first, "1").unwrap();
    std::fs::write(&second, "2").unwrap();

    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    session
        .handle_line(&format!("/load {}", first.display()), &mut renderer)
        .await;
    session.model().fail_uploads(true);
    session
        .handle_line(&format!("/load {}", second.display()), &mut renderer)
        .await;

    assert_eq!(
        session.attachment().pending().map(|a| a.name.as_str()),
        Some("files/first.txt")
    );
    let errors = renderer.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("upload failed:"));
}

#[tokio::test]
async fn second_load_replaces_attachment_with_notice() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");
    std::fs::write(&first, "1").unwrap();
    std::fs::write(&second, "2").unwrap();

    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    session
        .handle_line(&format!("/load {}", first.display()), &mut renderer)
        .await;
    assert!(renderer.warnings().is_empty());
    session
        .handle_line(&format!("/load {}", second.display()), &mut renderer)
        .await;

    assert_eq!(
        session.attachment().pending().map(|a| a.name.as_str()),
        Some("files/second.txt")
    );
    assert_eq!(
        renderer.warnings(),
        vec!["Discarded unused attachment 'first.txt'."]
    );
}

#[tokio::test]
async fn load_path_with_spaces() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("my notes.txt");
    std::fs::write(&file, "x").unwrap();

    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    session
        .handle_line(&format!("/load {}", file.display()), &mut renderer)
        .await;

    assert_eq!(*session.model().uploads.lock().unwrap(), vec![file]);
    assert!(!session.attachment().is_empty());
}

#[tokio::test]
async fn save_without_argument_warns_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let cwd_listing_before = std::fs::read_dir(dir.path()).unwrap().count();

    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    session.handle_line("/save", &mut renderer).await;
    session.handle_line("/load", &mut renderer).await;

    assert_eq!(
        renderer.warnings(),
        vec!["Usage: /save <file path>", "Usage: /load <file path>"]
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), cwd_listing_before);
    assert!(session.model().sent().is_empty());
    assert!(session.model().uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn save_exports_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chat.md");

    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    session.handle_line("hi", &mut renderer).await;
    session
        .handle_line(&format!("/save {}", out.display()), &mut renderer)
        .await;

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(
        written,
        "# Conversation history with Gemini\n\nYou:\nhi\n\n---\n\nGemini:\nreply to hi\n\n---\n\n"
    );
    assert!(renderer
        .infos()
        .contains(&format!("History saved to {}", out.display()).as_str()));
}

#[tokio::test]
async fn save_failure_is_reported_and_loop_continues() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing-dir").join("chat.md");

    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    let save = format!("/save {}", out.display());
    let mut reader = ScriptedReader::new([save.as_str(), "after", "/quit"]);
    session.run(&mut reader, &mut renderer).await.unwrap();

    assert!(renderer.errors()[0].starts_with("Failed to save history:"));
    assert_eq!(session.transcript().len(), 2);
}

#[tokio::test]
async fn unknown_command_is_reported_and_changes_nothing() {
    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    session.handle_line("/frobnicate", &mut renderer).await;

    assert_eq!(renderer.errors(), vec!["Unknown command: '/frobnicate'"]);
    assert_eq!(session.state(), SessionState::Running);
    assert!(session.transcript().is_empty());
    assert!(session.attachment().is_empty());
    assert!(session.model().sent().is_empty());
}

#[tokio::test]
async fn help_lists_commands() {
    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    session.handle_line("/help", &mut renderer).await;

    assert!(renderer.infos().iter().any(|l| l.starts_with("/load")));
    assert!(session.model().sent().is_empty());
}

#[tokio::test]
async fn prime_sends_initial_prompt_before_loop() {
    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    session.prime("tell me a joke", &mut renderer).await;

    assert_eq!(renderer.output[0], Output::Info("You: tell me a joke".to_string()));
    assert_eq!(
        renderer.output[1],
        Output::Reply("reply to tell me a joke".to_string())
    );
    assert_eq!(session.transcript().len(), 2);
}

#[tokio::test]
async fn failed_priming_is_reported_and_loop_still_starts() {
    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    session.model().fail_sends(true);
    session.prime("tell me a joke", &mut renderer).await;

    assert_eq!(renderer.errors().len(), 1);
    assert!(session.transcript().is_empty());
    assert_eq!(session.state(), SessionState::Running);

    session.model().fail_sends(false);
    let mut reader = ScriptedReader::new(["second try", "/exit"]);
    session.run(&mut reader, &mut renderer).await.unwrap();

    let sent = session.model().sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].text(), "second try");
    assert_eq!(session.transcript().len(), 2);
    assert_eq!(session.state(), SessionState::Terminated);
}

#[tokio::test]
async fn indented_slash_line_is_sent_as_message() {
    let mut session = ChatSession::new(MockModel::default());
    let mut renderer = RecordingRenderer::default();
    let mut reader = ScriptedReader::new(["  /quit", "/exit"]);

    session.run(&mut reader, &mut renderer).await.unwrap();

    let sent = session.model().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text(), "  /quit");
    assert_eq!(session.transcript().turns()[0], Turn::user("  /quit"));
}

#[tokio::test]
async fn single_shot_prints_reply() {
    let model = MockModel::default();
    let mut renderer = RecordingRenderer::default();
    let job = SingleShot::new("what is rust?", None, None);

    job.run(&model, &mut renderer).await.unwrap();

    assert_eq!(
        renderer.output,
        vec![Output::Text("reply to what is rust?".to_string())]
    );
    assert!(model.sent()[0].attachment().is_none());
}

#[tokio::test]
async fn single_shot_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let output = dir.path().join("answer.txt");
    std::fs::write(&input, "the text").unwrap();

    let model = MockModel::default();
    let mut renderer = RecordingRenderer::default();
    let job = SingleShot::new("", Some(input), Some(output.clone()));

    job.run(&model, &mut renderer).await.unwrap();

    assert_eq!(
        model.sent()[0].text(),
        "Summarize the following text:\n\n---\nthe text\n---"
    );
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "reply to Summarize the following text:\n\n---\nthe text\n---"
    );
    assert_eq!(
        renderer.infos(),
        vec![format!("Response saved to {}", output.display()).as_str()]
    );
}

#[tokio::test]
async fn single_shot_without_input_is_usage_error() {
    let model = MockModel::default();
    let mut renderer = RecordingRenderer::default();
    let err = SingleShot::new("", None, Some(PathBuf::from("out.txt")))
        .run(&model, &mut renderer)
        .await
        .unwrap_err();

    assert!(err.is_usage());
    assert!(model.sent().is_empty());
}
