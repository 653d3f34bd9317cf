//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for chat-relay
#[derive(Parser, Debug)]
#[command(name = "chat-relay")]
#[command(author, version, about = "Streaming chat relay for Gemini, with a terminal client")]
#[command(long_about = r#"
chat-relay forwards a conversation to Gemini and streams the reply back as
Server-Sent Events. The `chat` subcommand is a terminal client for a relay.

Configuration files are loaded from (in priority order):
1. --config <path>                       Explicit config file
2. ./chat-relay.toml                     Project-level config
3. ~/.config/chat-relay/config.toml      Global config

Environment variables prefixed with CHAT_RELAY_ override files,
e.g. CHAT_RELAY_SERVER__PORT=8080.

Example:
  chat-relay serve --port 3000
  chat-relay chat --relay-url http://127.0.0.1:3000
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the relay server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with a running relay
    Chat {
        /// Base URL of the relay
        #[arg(long, value_name = "URL")]
        relay_url: Option<String>,
    },
}
