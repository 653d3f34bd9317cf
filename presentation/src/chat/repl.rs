//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use crate::chat::command::ReplCommand;
use crate::progress::reporter::ExchangeReporter;
use chrono::Utc;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use relay_application::{ChatController, ControllerError, StopHandle};
use relay_domain::{ExchangeOutcome, SessionId};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::debug;

const HISTORY_SIZE: usize = 1000;

/// Interactive chat REPL
pub struct ChatRepl {
    controller: ChatController,
    relay_url: String,
    history_path: Option<PathBuf>,
}

impl ChatRepl {
    pub fn new(controller: ChatController, relay_url: impl Into<String>) -> Self {
        Self {
            controller,
            relay_url: relay_url.into(),
            history_path: dirs::data_dir().map(|p| p.join("chat-relay").join("history.txt")),
        }
    }

    /// Keep input history somewhere else, or nowhere.
    pub fn with_history_path(mut self, path: Option<PathBuf>) -> Self {
        self.history_path = path;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Reedline::create();
        if let Some(history) = self.history_path.as_deref().and_then(open_history) {
            editor = editor.with_history(Box::new(history));
        }
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic(">>> ".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line.starts_with('/') {
                        if self.handle_command(line).await {
                            break;
                        }
                        continue;
                    }
                    self.send(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                #[allow(unreachable_patterns)]
                _ => continue,
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", ConsoleFormatter::header("Chat Relay"));
        println!();
        println!("Relay: {}", self.relay_url);
        println!("Press Ctrl-C while a reply is streaming to stop it.");
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /new          - Start a new chat");
        println!("  /history      - List chats");
        println!("  /load <n>     - Open chat number n");
        println!("  /delete <n>   - Delete chat number n");
        println!("  /retry        - Resend the last failed message");
        println!("  /help         - Show this help");
        println!("  /quit         - Exit");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, line: &str) -> bool {
        match ReplCommand::parse(line) {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::New => {
                self.controller.new_chat();
                println!("{}\n", "Started a new chat.".dimmed());
            }
            ReplCommand::History => {
                println!(
                    "{}",
                    ConsoleFormatter::format_history(
                        self.controller.sessions(),
                        self.controller.current_session(),
                        Utc::now()
                    )
                );
            }
            ReplCommand::Load(n) => match self.session_at(n) {
                Some(id) => match self.controller.load_session(id) {
                    Ok(()) => {
                        println!();
                        print!(
                            "{}",
                            ConsoleFormatter::format_transcript(self.controller.conversation())
                        );
                    }
                    Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
                },
                None => println!("No chat number {}. Type /history to list chats.", n),
            },
            ReplCommand::Delete(n) => match self.session_at(n) {
                Some(id) => match self.controller.delete_session(id) {
                    Ok(session) => println!("Deleted \"{}\".\n", session.title()),
                    Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
                },
                None => println!("No chat number {}. Type /history to list chats.", n),
            },
            ReplCommand::Retry => {
                let reporter = ExchangeReporter::new();
                let watcher = stop_on_ctrl_c(self.controller.stop_handle());
                let result = self.controller.retry(&reporter).await;
                watcher.abort();
                Self::report(result);
            }
            ReplCommand::Usage(usage) => println!("Usage: {}", usage),
            ReplCommand::Unknown(cmd) => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        false
    }

    fn session_at(&self, n: usize) -> Option<SessionId> {
        self.controller
            .sessions()
            .get(n.checked_sub(1)?)
            .map(|s| s.id())
    }

    async fn send(&mut self, text: &str) {
        println!();
        let reporter = ExchangeReporter::new();
        let watcher = stop_on_ctrl_c(self.controller.stop_handle());
        let result = self.controller.submit(text, &reporter).await;
        watcher.abort();
        Self::report(result);
    }

    fn report(result: Result<ExchangeOutcome, ControllerError>) {
        match result {
            Ok(outcome) => {
                if let Some(message) = outcome.state.error() {
                    eprintln!("{}\n", ConsoleFormatter::format_error(message));
                } else if outcome.malformed > 0 {
                    debug!("{} malformed frames were skipped", outcome.malformed);
                }
            }
            Err(e) => eprintln!("{} {}\n", "Error:".red().bold(), e),
        }
    }
}

/// Open the input history file, creating its directory first.
fn open_history(path: &Path) -> Option<FileBackedHistory> {
    if let Some(parent) = path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        debug!("Cannot create history directory {}: {}", parent.display(), e);
    }
    match FileBackedHistory::with_file(HISTORY_SIZE, path.to_path_buf()) {
        Ok(history) => Some(history),
        Err(e) => {
            debug!("Input history disabled: {}", e);
            None
        }
    }
}

/// Stop the in-flight exchange on the next Ctrl-C.
fn stop_on_ctrl_c(stop: StopHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.stop();
        }
    })
}
