//! One prompt in, one answer out.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::remote_model::RemoteModel;
use crate::render::Renderer;
use crate::types::OutgoingTurn;

/// A single-shot job assembled from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleShot {
    prompt: String,
    file: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl SingleShot {
    /// Creates a job from the joined positional words and the optional paths.
    pub fn new(prompt: impl Into<String>, file: Option<PathBuf>, output: Option<PathBuf>) -> Self {
        Self {
            prompt: prompt.into(),
            file,
            output,
        }
    }

    /// The prompt as typed on the command line.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// File used as context, if any.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// File the answer goes to, if any.
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Reads the context file and builds the text sent to the model.
    pub fn compose(&self) -> Result<String> {
        let context = match &self.file {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .map_err(|err| Error::io_at("failed to read input file", path, err))?,
            ),
            None => None,
        };
        compose_prompt(&self.prompt, context.as_deref())
    }

    /// Sends the composed prompt with no history and delivers the answer.
    pub async fn run<M: RemoteModel + ?Sized>(
        &self,
        model: &M,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        let text = self.compose()?;
        let reply = model.send_turn(&[], &OutgoingTurn::new(text, None)).await?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, &reply)
                    .map_err(|err| Error::io_at("failed to write response", path, err))?;
                renderer.print_info(&format!("Response saved to {}", path.display()));
            }
            None => renderer.print_text(&reply),
        }
        Ok(())
    }
}

/// Combines a question and optional file contents into one prompt.
///
/// An empty file counts as no file.  With neither a question nor context there is
/// nothing to ask and a usage error is returned.
pub fn compose_prompt(prompt: &str, context: Option<&str>) -> Result<String> {
    let prompt = prompt.trim();
    let context = context.filter(|c| !c.is_empty());
    match (prompt.is_empty(), context) {
        (false, Some(context)) => Ok(format!(
            "Use the following text as context to answer the question.\n\n\
             CONTEXT:\n---\n{context}\n---\n\nQUESTION: {prompt}"
        )),
        (true, Some(context)) => Ok(format!(
            "Summarize the following text:\n\n---\n{context}\n---"
        )),
        (false, None) => Ok(prompt.to_string()),
        (true, None) => Err(Error::usage(
            "gemini-chat --file <path> [--output <path>] [PROMPT]...",
        )),
    }
}
