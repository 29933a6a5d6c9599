use logsentinel_core::RepoField;
use std::path::PathBuf;

/// Result of processing a slash command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Quit the application.
    Quit,
    /// Read a file and attach it.
    Attach(PathBuf),
    /// Remove the attachment at this zero-based index.
    Detach(usize),
    /// List attached files.
    ListFiles,
    /// Show the repository context.
    ShowRepo,
    /// Turn repository access on or off.
    SetRepoAccess(bool),
    /// Replace one text field of the repository context.
    SetRepoField(RepoField, String),
    /// Load the code snippet from a file.
    LoadSnippet(PathBuf),
    /// Change the theme.
    ThemeChanged(String),
    /// Start a fresh conversation, keeping files and repository context.
    NewConversation,
    /// Show status (model, tokens, diagnosis).
    ShowStatus,
    /// Not a command - treat as regular input.
    NotACommand,
}

const COMMANDS: &[&str] = &[
    "/help", "/quit", "/exit", "/attach", "/detach", "/files", "/repo", "/theme", "/new",
    "/status", "/version",
];

pub fn handle_command(input: &str) -> CommandResult {
    let parts: Vec<&str> = input.trim_start().splitn(2, ' ').collect();
    let cmd = parts[0];
    let arg = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/new" => CommandResult::NewConversation,
        "/status" => CommandResult::ShowStatus,
        "/version" => {
            CommandResult::Message(format!("LogSentinel v{}", env!("CARGO_PKG_VERSION")))
        }

        // Attachments
        "/attach" | "/a" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: /attach <path>".into())
            } else {
                CommandResult::Attach(PathBuf::from(arg))
            }
        }
        "/detach" | "/rm" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => CommandResult::Detach(n - 1),
            _ => CommandResult::Message(
                "Usage: /detach <n>  (positions are listed by /files, starting at 1)".into(),
            ),
        },
        "/files" => CommandResult::ListFiles,

        // Repository context
        "/repo" => handle_repo(arg),

        "/theme" => {
            if arg.is_empty() {
                let themes = crate::theme::Theme::all_names().join(", ");
                CommandResult::Message(format!(
                    "Available themes: {themes}\nUsage: /theme <theme-name>"
                ))
            } else {
                CommandResult::ThemeChanged(arg.to_string())
            }
        }

        // Unknown command
        _ => {
            if input.starts_with('/') {
                CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands."))
            } else {
                CommandResult::NotACommand
            }
        }
    }
}

fn handle_repo(arg: &str) -> CommandResult {
    let mut parts = arg.splitn(2, ' ');
    let sub = parts.next().unwrap_or("");
    let value = parts.next().map(str::trim).unwrap_or("");

    match sub {
        "" | "show" => CommandResult::ShowRepo,
        "on" => CommandResult::SetRepoAccess(true),
        "off" => CommandResult::SetRepoAccess(false),
        "snippet" => match value {
            "" => CommandResult::Message(
                "Usage: /repo snippet <path> | /repo snippet clear".into(),
            ),
            "clear" => CommandResult::SetRepoField(RepoField::Snippet, String::new()),
            path => CommandResult::LoadSnippet(PathBuf::from(path)),
        },
        other => match RepoField::parse(other) {
            Some(field) => CommandResult::SetRepoField(field, value.to_string()),
            None => CommandResult::Message(format!(
                "Unknown repo option: {other}\nUsage: /repo [on|off|url <v>|branch <v>|build <v>|snippet <path>|snippet clear]"
            )),
        },
    }
}

/// Complete a partially typed command name when exactly one matches.
pub fn complete_command(input: &str) -> Option<String> {
    if input.contains(' ') {
        return None;
    }
    let matches: Vec<&&str> = COMMANDS.iter().filter(|c| c.starts_with(input)).collect();

    if matches.len() == 1 {
        Some(format!("{} ", matches[0]))
    } else {
        None
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ LogSentinel Commands ─────────────────────────────────────────╮

  FILES
    /attach <path>            Attach a log or config file
    /detach <n>               Remove attachment n (see /files)
    /files                    List attached files

  REPOSITORY CONTEXT
    /repo                     Show repository context
    /repo on | off            Enable or disable repository access
    /repo url <url>           Set the repository URL
    /repo branch <name>       Set the branch
    /repo build <version>     Set the build version
    /repo snippet <path>      Load a relevant code snippet from a file
    /repo snippet clear       Remove the snippet

  SESSION
    /new                      Start a fresh conversation
    /status                   Show model, tokens and last diagnosis
    /theme <name>             Change color theme

  OTHER
    /help, /h                 Show this help message
    /version                  Show version information
    /exit, /quit, /q          Quit the application

  Enter sends, Shift+Enter or Alt+Enter inserts a newline.
  A message may be empty when at least one file is attached.

╰────────────────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}
