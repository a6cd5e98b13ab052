//! Console Bot
//!
//! Runs the builtin command set against the terminal. Every stdin line is one
//! message; replies are printed to stdout and logs go to stderr.
//!
//! A plain line is sent by the console user into the `console` guild, and
//! `@name` words become mentions. A line starting with `{` is parsed as a full
//! JSON `MessageEvent` instead.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package console-bot -- --admin
//! $echo hello
//! $mod kick @troll
//! ```

mod session;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use chatter::core::{Author, BoxedSession, MessageEvent};
use chatter::prelude::{ChatterConfig, ChatterRuntime, Incoming, register_default_routes};
use chatter::runtime::config::LogOutput;
use session::{ADMIN_ROLE, ConsoleSession, MEMBER_ROLE};

const GUILD_ID: &str = "console";
const CHANNEL_ID: &str = "console";
const BOT_USER_ID: &str = "chatter";

#[derive(Debug, Parser)]
#[command(name = "console-bot", about = "Chat with the Chatter command bot on the terminal")]
struct Args {
    /// Configuration file to load instead of searching for chatter.toml.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile.
    #[arg(long)]
    profile: Option<String>,

    /// User id the typed messages are sent as.
    #[arg(long, default_value = "console-user")]
    user: String,

    /// Give the console user the administrator role.
    #[arg(long)]
    admin: bool,

    /// Mark the console user as a bot account.
    #[arg(long)]
    bot: bool,
}

impl Args {
    fn author(&self) -> Author {
        if self.bot {
            Author::bot(&self.user, &self.user)
        } else {
            Author::new(&self.user, &self.user)
        }
    }

    fn roles(&self) -> Vec<String> {
        let mut roles = vec![MEMBER_ROLE.to_string()];
        if self.admin {
            roles.push(ADMIN_ROLE.to_string());
        }
        roles
    }
}

/// Turns one input line into a message event.
fn parse_line(line: &str, seq: usize, author: &Author, roles: &[String]) -> Result<MessageEvent> {
    if line.starts_with('{') {
        return serde_json::from_str(line).context("invalid message event JSON");
    }

    let mut event =
        MessageEvent::new(CHANNEL_ID, author.clone(), line).in_guild(GUILD_ID, roles.to_vec());
    event.id = seq.to_string();

    for name in line.split_whitespace().filter_map(|w| w.strip_prefix('@')) {
        if !name.is_empty() {
            event = event.mention(Author::new(name, name));
        }
    }

    Ok(event)
}

/// Forwards stdin lines until EOF or until the runtime stops listening.
fn read_stdin(
    tx: mpsc::Sender<Incoming>,
    session: BoxedSession,
    author: Author,
    roles: Vec<String>,
) {
    let stdin = std::io::stdin();

    for (seq, line) in stdin.lock().lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "could not read stdin");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(&line, seq, &author, &roles) {
            Ok(event) => {
                if tx.blocking_send(Incoming::new(session.clone(), event)).is_err() {
                    break;
                }
            }
            Err(e) => warn!(error = %e, "ignoring malformed input"),
        }
    }

    debug!("stdin closed");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Keep stdout for replies unless the configuration says otherwise.
    let mut defaults = ChatterConfig::default();
    defaults.logging.output = LogOutput::Stderr;

    let mut builder = ChatterRuntime::builder().merge(defaults);
    if let Some(path) = &args.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = &args.profile {
        builder = builder.profile(profile);
    }
    let runtime = builder.build(register_default_routes)?;

    let session: BoxedSession = Arc::new(ConsoleSession::new(BOT_USER_ID));
    let (tx, rx) = mpsc::channel(64);
    let (author, roles) = (args.author(), args.roles());
    std::thread::spawn(move || read_stdin(tx, session, author, roles));

    runtime.run(rx).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Author {
        Author::new("alice", "alice")
    }

    #[test]
    fn plain_line_becomes_guild_message() {
        let roles = vec![MEMBER_ROLE.to_string(), ADMIN_ROLE.to_string()];
        let event = parse_line("$mod kick @troll @ @spammer", 7, &alice(), &roles).unwrap();

        assert_eq!(event.id, "7");
        assert_eq!(event.content, "$mod kick @troll @ @spammer");
        assert_eq!(event.guild_id.as_deref(), Some(GUILD_ID));
        assert_eq!(event.member.unwrap().roles, roles);
        let mentioned: Vec<_> = event.mentions.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(mentioned, ["troll", "spammer"]);
    }

    #[test]
    fn json_line_is_parsed_verbatim() {
        let line = r#"{"channel_id":"dev","author":{"id":"bob","username":"bob"},"content":"$echo hi"}"#;
        let event = parse_line(line, 0, &alice(), &[]).unwrap();

        assert_eq!(event.channel_id, "dev");
        assert_eq!(event.author.id, "bob");
        assert!(event.guild_id.is_none());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(parse_line("{not json", 0, &alice(), &[]).is_err());
    }

    #[test]
    fn cli_flags_shape_the_author() {
        let args = Args::parse_from(["console-bot", "--user", "ops", "--admin", "--bot"]);

        assert!(args.author().bot);
        assert_eq!(args.author().id, "ops");
        assert_eq!(args.roles(), [MEMBER_ROLE, ADMIN_ROLE]);
    }
}
