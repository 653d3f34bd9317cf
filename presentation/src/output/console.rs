//! Console output formatter for the chat client

use chrono::{DateTime, Utc};
use colored::Colorize;
use relay_domain::{ChatSession, Conversation, Role, SessionId};

/// Formats chat client output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Age of a timestamp in coarse human terms.
    ///
    /// Under an hour is "Just now", under a day counts hours, under two days
    /// is "Yesterday", anything older counts days.
    pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let hours = (now - timestamp).num_minutes() as f64 / 60.0;
        if hours < 1.0 {
            "Just now".to_string()
        } else if hours < 24.0 {
            format!("{} hours ago", hours.floor() as i64)
        } else if hours < 48.0 {
            "Yesterday".to_string()
        } else {
            format!("{} days ago", (hours / 24.0).floor() as i64)
        }
    }

    /// Numbered session list, newest first; the current session is marked.
    pub fn format_history(
        sessions: &[ChatSession],
        current: Option<SessionId>,
        now: DateTime<Utc>,
    ) -> String {
        if sessions.is_empty() {
            return format!("{}\n", "No chat history yet.".dimmed());
        }

        let mut output = format!("{}\n", "Chat history:".cyan().bold());
        for (i, session) in sessions.iter().enumerate() {
            let marker = if Some(session.id()) == current { "*" } else { " " };
            output.push_str(&format!(
                "{} {:>2}. {}  {}\n",
                marker.green().bold(),
                i + 1,
                session.title(),
                Self::relative_time(session.updated_at(), now).dimmed()
            ));
        }
        output
    }

    /// Full transcript of a conversation, used after loading a session.
    pub fn format_transcript(conversation: &Conversation) -> String {
        let mut output = String::new();
        for turn in conversation.turns() {
            let label = match turn.role {
                Role::User => "You:".blue().bold(),
                Role::Assistant => "Assistant:".green().bold(),
            };
            output.push_str(&format!("{} {}\n\n", label, turn.content));
        }
        output
    }

    /// Exchange failure with a hint on how to retry.
    pub fn format_error(message: &str) -> String {
        format!(
            "{} {}\n{}",
            "Error:".red().bold(),
            message,
            "Type /retry to send the message again.".dimmed()
        )
    }

    pub fn header(title: &str) -> String {
        let line = "─".repeat(title.chars().count() + 4);
        format!("╭{}╮\n│  {}  │\n╰{}╯", line, title.bold(), line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ago(minutes: i64) -> String {
        let now = Utc::now();
        ConsoleFormatter::relative_time(now - Duration::minutes(minutes), now)
    }

    #[test]
    fn test_relative_time_buckets() {
        assert_eq!(ago(0), "Just now");
        assert_eq!(ago(59), "Just now");
        assert_eq!(ago(60), "1 hours ago");
        assert_eq!(ago(23 * 60 + 59), "23 hours ago");
        assert_eq!(ago(24 * 60), "Yesterday");
        assert_eq!(ago(47 * 60 + 59), "Yesterday");
        assert_eq!(ago(48 * 60), "2 days ago");
        assert_eq!(ago(10 * 24 * 60), "10 days ago");
    }

    #[test]
    fn test_history_lists_titles_in_order() {
        let mut sessions = Vec::new();
        for text in ["newest topic", "older topic"] {
            let mut conversation = Conversation::new();
            conversation.push_user(text);
            sessions.push(ChatSession::from_conversation(conversation).unwrap());
        }

        let output = ConsoleFormatter::format_history(&sessions, Some(sessions[0].id()), Utc::now());
        let newest = output.find("newest topic").unwrap();
        let older = output.find("older topic").unwrap();
        assert!(newest < older);
        assert!(output.contains("Just now"));
    }

    #[test]
    fn test_empty_history() {
        assert!(ConsoleFormatter::format_history(&[], None, Utc::now()).contains("No chat history"));
    }

    #[test]
    fn test_error_mentions_retry() {
        let output = ConsoleFormatter::format_error("HTTP error! status: 500");
        assert!(output.contains("HTTP error! status: 500"));
        assert!(output.contains("/retry"));
    }
}
