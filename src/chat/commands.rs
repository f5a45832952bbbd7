//! Slash command parsing for the chat application.
//!
//! Lines whose first character is `/` control the session and are never sent to the
//! model; a line with leading whitespace is an ordinary message.  Command names are
//! case-sensitive.  Everything after the first run of whitespace is one argument, so
//! file paths containing spaces survive intact.

/// Prefix marking a line as a command rather than a message.
pub const COMMAND_SENTINEL: char = '/';

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Exit the chat (`/exit`, `/quit` or `/sair`).
    Exit,

    /// Display help information.
    Help,

    /// Upload a file and attach it to the next message.
    Load(String),

    /// Save the conversation history to a file.
    Save(String),

    /// A known command used without its required argument; carries the usage hint.
    Usage(String),

    /// A command name nobody recognizes.
    Unknown(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use gemini_chat::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/quit"), Some(ChatCommand::Exit));
/// assert_eq!(
///     parse_command("/load my notes.txt"),
///     Some(ChatCommand::Load("my notes.txt".to_string()))
/// );
/// assert!(parse_command("Hello, Gemini!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let rest = input.trim_end().strip_prefix(COMMAND_SENTINEL)?;

    let (name, argument) = match rest.split_once(char::is_whitespace) {
        Some((name, argument)) => (name, Some(argument.trim_start())),
        None => (rest, None),
    };
    let argument = argument.filter(|arg| !arg.is_empty());

    let command = match name {
        "exit" | "quit" | "sair" => ChatCommand::Exit,
        "help" => ChatCommand::Help,
        "load" => match argument {
            Some(path) => ChatCommand::Load(path.to_string()),
            None => ChatCommand::Usage("Usage: /load <file path>".to_string()),
        },
        "save" => match argument {
            Some(path) => ChatCommand::Save(path.to_string()),
            None => ChatCommand::Usage("Usage: /save <file path>".to_string()),
        },
        _ => ChatCommand::Unknown(name.to_string()),
    };

    Some(command)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"------------------- Available commands -------------------
/load <file>           Upload a file to use with the next question
/save <file>           Save the conversation history
/help                  Show this help
/exit, /quit, /sair    End the conversation
----------------------------------------------------------"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exit_aliases() {
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Exit));
        assert_eq!(parse_command("/sair"), Some(ChatCommand::Exit));
        assert_eq!(parse_command("/quit  \n"), Some(ChatCommand::Exit));
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(
            parse_command("/EXIT"),
            Some(ChatCommand::Unknown("EXIT".to_string()))
        );
        assert_eq!(
            parse_command("/Help"),
            Some(ChatCommand::Unknown("Help".to_string()))
        );
    }

    #[test]
    fn parse_load_keeps_spaces_in_path() {
        assert_eq!(
            parse_command("/load ~/My Documents/report final.pdf"),
            Some(ChatCommand::Load("~/My Documents/report final.pdf".to_string()))
        );
        assert_eq!(
            parse_command("/load\tnotes.txt"),
            Some(ChatCommand::Load("notes.txt".to_string()))
        );
    }

    #[test]
    fn missing_arguments_are_usage_errors() {
        assert!(matches!(
            parse_command("/load"),
            Some(ChatCommand::Usage(msg)) if msg.contains("/load")
        ));
        assert!(matches!(
            parse_command("/save   "),
            Some(ChatCommand::Usage(msg)) if msg.contains("/save")
        ));
    }

    #[test]
    fn parse_save() {
        assert_eq!(
            parse_command("/save chat.md"),
            Some(ChatCommand::Save("chat.md".to_string()))
        );
    }

    #[test]
    fn unknown_commands() {
        assert_eq!(
            parse_command("/frobnicate now"),
            Some(ChatCommand::Unknown("frobnicate".to_string()))
        );
        assert_eq!(parse_command("/"), Some(ChatCommand::Unknown(String::new())));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello, Gemini!"), None);
        assert_eq!(parse_command("what does a/b mean?"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn leading_whitespace_is_not_a_command() {
        assert_eq!(parse_command("  /quit"), None);
        assert_eq!(parse_command("\t/load notes.txt"), None);
    }

    #[test]
    fn help_text_lists_commands() {
        let help = help_text();
        assert!(help.contains("/load"));
        assert!(help.contains("/save"));
        assert!(help.contains("/help"));
        assert!(help.contains("/sair"));
    }
}
