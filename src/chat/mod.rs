//! Chat application module for conversations with Gemini.
//!
//! This module provides the REPL and single-shot front ends built on top of the
//! [`RemoteModel`](crate::RemoteModel) seam.  It supports:
//!
//! - Slash commands for uploading files and saving the conversation
//! - A one-shot attachment slot consumed by the next message
//! - Markdown-style export of the transcript
//! - Single-shot prompts with an optional context file
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing, credentials and configuration
//! - [`session`]: the conversation loop
//! - [`commands`]: slash command parsing
//! - [`transcript`]: conversation history and export
//! - [`single_shot`]: the non-interactive mode

mod attachment;
mod commands;
pub mod config;
mod input;
pub mod session;
pub mod single_shot;
pub mod transcript;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use attachment::AttachmentSlot;
pub use commands::{COMMAND_SENTINEL, ChatCommand, help_text, parse_command};
pub use config::{API_KEY_VARIABLE, ApiKey, ChatArgs, ChatConfig, Mode};
pub use input::{EditorReader, LineReader, ReadOutcome, ScriptedReader};
pub use session::{ChatSession, INPUT_PROMPT, SessionState};
pub use single_shot::{SingleShot, compose_prompt};
pub use transcript::{EXPORT_HEADER, TURN_DELIMITER, Transcript};
