//! Command-line chat client for Google Gemini.
//!
//! Without `--file` or `--output` the program starts a conversation; any positional
//! words are sent as the first message.  With either flag it answers one prompt and
//! exits.
//!
//! # Usage
//!
//! ```bash
//! # Start a conversation
//! gemini-chat
//!
//! # Start a conversation with a first question
//! gemini-chat what is a monad
//!
//! # Summarize a file
//! gemini-chat --file notes.txt
//!
//! # Ask about a file and keep the answer
//! gemini-chat --file notes.txt --output answer.md "list the action items"
//! ```
//!
//! The API key is read from `GOOGLE_API_KEY`, or from `~/.env` when the variable is
//! not set.
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/load <file>` - Upload a file for the next question
//! - `/save <file>` - Save the conversation history
//! - `/help` - Show available commands
//! - `/exit`, `/quit`, `/sair` - Exit the application

use std::sync::Arc;

use arrrg::CommandLine;

use gemini_chat::chat::{
    ApiKey, ChatArgs, ChatConfig, ChatSession, EditorReader, Mode, PlainTextRenderer, Renderer,
};
use gemini_chat::{Gemini, JsonLinesLogger, Result};

const USAGE: &str = "gemini-chat [OPTIONS] [PROMPT]...";

fn build_client(config: &ChatConfig) -> Result<Gemini> {
    let client = Gemini::new(config)?;
    match &config.request_log {
        Some(path) => {
            let logger = JsonLinesLogger::open(path)?;
            Ok(client.with_logger(Arc::new(logger)))
        }
        None => Ok(client),
    }
}

async fn run(args: ChatArgs, words: Vec<String>) -> Result<()> {
    let config = ChatConfig::from_args(&args, ApiKey::load()?)?;
    let client = build_client(&config)?;
    let renderer = &mut PlainTextRenderer::with_color(config.use_color);

    match Mode::resolve(&args, &words) {
        Mode::SingleShot(job) => {
            renderer.print_info("Running in single-shot mode...");
            job.run(&client, renderer).await
        }
        Mode::Interactive { initial_prompt } => {
            renderer.print_info(&format!(
                "Chatting with Gemini (model: {}). Type /help for commands.",
                client.model()
            ));
            renderer.print_info(&"-".repeat(30));

            let mut session = ChatSession::new(client);
            if let Some(prompt) = initial_prompt {
                session.prime(&prompt, renderer).await;
            }
            let mut reader = EditorReader::new()?;
            session.run(&mut reader, renderer).await
        }
    }
}

/// Main entry point for the gemini-chat application.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let (args, words) = ChatArgs::from_command_line_relaxed(USAGE);

    if let Err(err) = run(args, words).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
