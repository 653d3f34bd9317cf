//! Slash command parsing

/// A line of REPL input that starts with `/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    New,
    History,
    /// 1-based position in the history list.
    Load(usize),
    Delete(usize),
    Retry,
    Help,
    Quit,
    /// Known command with a bad argument; carries the usage line.
    Usage(&'static str),
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match name {
            "/new" | "/n" => ReplCommand::New,
            "/history" | "/h" => ReplCommand::History,
            "/load" => match parse_index(arg) {
                Some(n) => ReplCommand::Load(n),
                None => ReplCommand::Usage("/load <n>"),
            },
            "/delete" | "/del" => match parse_index(arg) {
                Some(n) => ReplCommand::Delete(n),
                None => ReplCommand::Usage("/delete <n>"),
            },
            "/retry" | "/r" => ReplCommand::Retry,
            "/help" | "/?" => ReplCommand::Help,
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}

fn parse_index(arg: Option<&str>) -> Option<usize> {
    arg?.parse().ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_commands() {
        assert_eq!(ReplCommand::parse("/new"), ReplCommand::New);
        assert_eq!(ReplCommand::parse("/history"), ReplCommand::History);
        assert_eq!(ReplCommand::parse("/retry"), ReplCommand::Retry);
        assert_eq!(ReplCommand::parse("/q"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/?"), ReplCommand::Help);
    }

    #[test]
    fn parses_indexed_commands() {
        assert_eq!(ReplCommand::parse("/load 2"), ReplCommand::Load(2));
        assert_eq!(ReplCommand::parse("/delete  1"), ReplCommand::Delete(1));
    }

    #[test]
    fn bad_index_shows_usage() {
        assert_eq!(ReplCommand::parse("/load"), ReplCommand::Usage("/load <n>"));
        assert_eq!(ReplCommand::parse("/load 0"), ReplCommand::Usage("/load <n>"));
        assert_eq!(
            ReplCommand::parse("/delete x"),
            ReplCommand::Usage("/delete <n>")
        );
    }

    #[test]
    fn unknown_command_is_kept() {
        assert_eq!(
            ReplCommand::parse("/models"),
            ReplCommand::Unknown("/models".into())
        );
    }
}
