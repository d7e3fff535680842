//! Command-line interface for Palingua
//!
//! Provides argument parsing and subcommand handling for the binary.

use clap::{Parser, Subcommand};

/// Pali translation service backed by a hosted generative-model API
#[derive(Parser)]
#[command(name = "palingua")]
#[command(version)]
#[command(about = "Pali translation service backed by a hosted generative-model API")]
#[command(
    long_about = "Palingua serves a single-page Pali translation form. Submitted passages \
    are forwarded to a hosted generative-model API through a credential pool and an ordered \
    model preference list, with exact-string memoization of results."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# Palingua Configuration
# ======================
#
# This file configures the HTTP server, the remote model preference list,
# the credential pool, the prompt template, and observability settings.
# Secrets never live in this file: [credentials].env names environment
# variables whose values are read at startup.

[server]
# IP address to bind to (127.0.0.1 for localhost only)
host = "127.0.0.1"

# Port to listen on
port = 3000

# Timeout for each remote generation call in seconds (1-300)
request_timeout_seconds = 30

[credentials]
# Environment variables holding API secrets, in pool order.
# Unset variables are skipped with a warning; an empty pool makes
# translation requests fail with a configuration banner until fixed.
env = ["GEMINI_API_KEY"]

# How a credential is picked per request: "first" | "random" | "round_robin"
strategy = "first"

[models]
# Base URL of the remote generation API
base_url = "https://generativelanguage.googleapis.com/v1beta"

# Ordered model preference list, most-preferred first. A malformed entry
# only costs its own slot; resolution advances to the next candidate.
preference = ["gemini-1.5-flash", "gemini-1.5-flash-latest", "gemini-pro"]

# When true, a model-unavailable (404) failure triggers exactly one
# re-resolution with the failed model excluded. Off by default.
retry_on_unavailable = false

[prompt]
# Instruction template; {passage} is replaced with the submitted text.
template = """You are a Pali scholar. Translate the following passage into English, then provide a short commentary and a word-by-word gloss.

Passage: {passage}"""

[cache]
# Memoize results by exact passage string for the process lifetime
enabled = true

[observability]
# Log level: trace, debug, info, warn, error
log_level = "info"
"#
}
