//! Output rendering for the chat application.
//!
//! Everything the user sees goes through the [`Renderer`] trait, so the chat session
//! can be driven and inspected without a terminal.  The default implementation
//! prints to stdout/stderr with optional ANSI colors.

use std::io::{self, Stdout, Write};

/// ANSI escape code for dim text (used for separators).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the model label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for warnings).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Line printed between a prompt and the response to it.
pub const SEPARATOR: &str = "----------------------------------------------";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print a reply from the model inside a conversation.
    fn print_reply(&mut self, text: &str);

    /// Print bare text with no decoration (single-shot output).
    fn print_text(&mut self, text: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print a warning, such as a usage hint.
    fn print_warning(&mut self, warning: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
        }
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_reply(&mut self, text: &str) {
        println!("{}", self.styled(ANSI_DIM, SEPARATOR));
        println!("{} {text}", self.styled(ANSI_CYAN, "Gemini:"));
        self.flush();
    }

    fn print_text(&mut self, text: &str) {
        println!("{text}");
        self.flush();
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }

    fn print_warning(&mut self, warning: &str) {
        println!("{}", self.styled(ANSI_YELLOW, warning));
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        eprintln!("{}", self.styled(ANSI_RED, &format!("Error: {error}")));
    }
}
