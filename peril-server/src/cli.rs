//! Command line flags and REPL commands.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "peril-server", version, about = "Peril game server")]
pub struct Cli {
    /// AMQP URI; overrides PERIL_AMQP_URI.
    #[arg(long)]
    pub uri: Option<String>,
}

/// One line typed at the server prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Pause,
    Resume,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    /// `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let word = line.split_whitespace().next()?;
        Some(match word {
            "pause" => Command::Pause,
            "resume" => Command::Resume,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        })
    }
}

pub const HELP: &str = "\
Possible commands:
* pause
* resume
* quit
* help";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_word() {
        assert_eq!(Command::parse("  pause now"), Some(Command::Pause));
        assert_eq!(Command::parse("resume"), Some(Command::Resume));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
        assert_eq!(Command::parse("spam 3"), Some(Command::Unknown("spam".into())));
        assert_eq!(Command::parse("   "), None);
    }

    #[test]
    fn uri_flag_is_optional() {
        let cli = Cli::parse_from(["peril-server"]);
        assert!(cli.uri.is_none());
        let cli = Cli::parse_from(["peril-server", "--uri", "amqp://rabbit:5672/%2f"]);
        assert_eq!(cli.uri.as_deref(), Some("amqp://rabbit:5672/%2f"));
    }
}
