//! Slash command parsing for the chat application.
//!
//! Input whose first word is a known command is handled locally; everything
//! else, including unknown `/words`, is sent to the model as a message.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Exit the chat application.
    Exit,

    /// Save the transcript, under the given name or a generated one.
    Save(Option<String>),

    /// Load a saved transcript, replacing the current one.
    Load(String),

    /// List saved transcripts.
    List,

    /// Display help information.
    Help,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command, or `None` if it
/// should be treated as a regular message.  The command word is matched
/// case-insensitively; the argument keeps its case.  `/exit`, `/list`
/// and `/help` take no argument, so `/exit now` is a message.
///
/// # Examples
///
/// ```
/// # use askcli::chat::{ChatCommand, parse_command};
/// assert_eq!(parse_command("/EXIT"), Some(ChatCommand::Exit));
/// assert_eq!(parse_command("/save Notes"), Some(ChatCommand::Save(Some("Notes".into()))));
/// assert!(parse_command("Hello!").is_none());
/// assert!(parse_command("/shrug").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let (command, argument) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, Some(rest.trim()).filter(|s| !s.is_empty())),
        None => (input, None),
    };

    let result = match command[1..].to_lowercase().as_str() {
        "exit" if argument.is_none() => ChatCommand::Exit,
        "save" => ChatCommand::Save(argument.map(str::to_string)),
        "load" => match argument {
            Some(name) => ChatCommand::Load(name.to_string()),
            None => ChatCommand::Invalid("Please specify a filename to load".to_string()),
        },
        "list" if argument.is_none() => ChatCommand::List,
        "help" if argument.is_none() => ChatCommand::Help,
        _ => return None,
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Commands:
  /exit          - End the conversation
  /save [name]   - Save the conversation (optional name)
  /load <name>   - Load a conversation
  /list          - List saved conversations
  /help          - Show this list"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exit() {
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse_command("/Exit"), Some(ChatCommand::Exit));
        assert_eq!(parse_command("  /EXIT  "), Some(ChatCommand::Exit));
    }

    #[test]
    fn parse_save() {
        assert_eq!(parse_command("/save"), Some(ChatCommand::Save(None)));
        assert_eq!(parse_command("/save   "), Some(ChatCommand::Save(None)));
        assert_eq!(
            parse_command("/SAVE My Chat"),
            Some(ChatCommand::Save(Some("My Chat".to_string())))
        );
        assert_eq!(
            parse_command("/save\tnotes.json"),
            Some(ChatCommand::Save(Some("notes.json".to_string())))
        );
    }

    #[test]
    fn parse_load() {
        assert_eq!(
            parse_command("/load conversation_20250101_120000.json"),
            Some(ChatCommand::Load(
                "conversation_20250101_120000.json".to_string()
            ))
        );
        assert_eq!(
            parse_command("/load"),
            Some(ChatCommand::Invalid(
                "Please specify a filename to load".to_string()
            ))
        );
    }

    #[test]
    fn parse_list_and_help() {
        assert_eq!(parse_command("/list"), Some(ChatCommand::List));
        assert_eq!(parse_command("/LIST"), Some(ChatCommand::List));
        assert_eq!(parse_command("/help"), Some(ChatCommand::Help));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello!"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
        assert_eq!(parse_command("what does /exit do?"), None);
        assert_eq!(parse_command("/saved"), None);
        assert_eq!(parse_command("/unknown thing"), None);
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command("/exit now"), None);
        assert_eq!(parse_command("/EXIT the building please"), None);
        assert_eq!(parse_command("/list everything"), None);
        assert_eq!(parse_command("/help me write a poem"), None);
    }

    #[test]
    fn help_text_lists_every_command() {
        let help = help_text();
        for command in ["/exit", "/save", "/load", "/list", "/help"] {
            assert!(help.contains(command), "missing {command}");
        }
    }
}
