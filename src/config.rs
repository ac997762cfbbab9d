//! Configuration for rollbook
//!
//! CLI arguments and environment variable handling using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::session::Session;

/// Rollbook - roster level tracker
///
/// Reads go to anyone; mutations require an admin identity (any name other
/// than "Guest"). State syncs to a remote tabular store when reachable and
/// always lands in the local cache.
#[derive(Parser, Debug, Clone)]
#[command(name = "rollbook")]
#[command(about = "Roster level tracker with remote sync and local fallback")]
pub struct Args {
    /// Base URL of the remote tabular store
    #[arg(long, env = "REMOTE_URL", default_value = "http://localhost:3000")]
    pub remote_url: String,

    /// API key sent with every remote request
    #[arg(long, env = "REMOTE_API_KEY")]
    pub remote_api_key: Option<String>,

    /// Directory for the local fallback cache
    #[arg(long, env = "CACHE_DIR", default_value = ".rollbook")]
    pub cache_dir: PathBuf,

    /// Identity for this session (omit for read-only access, "Guest" for a
    /// named read-only session, anything else for admin)
    #[arg(long, env = "ROLLBOOK_USER")]
    pub user: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Remote request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "5000")]
    pub request_timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the roster
    List,
    /// Show the activity log, most recent first
    Log {
        /// Maximum entries to show
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Set a person's level (clamped to 0-10)
    SetLevel {
        id: u32,
        #[arg(allow_negative_numbers = true)]
        level: i32,
    },
    /// Overwrite a person's shared notes
    SetNotes { id: u32, text: String },
    /// Write your private admin note for a person
    Note { id: u32, text: String },
    /// Reset roster and log to the default seed
    Reset,
}

impl Args {
    /// Validate configuration consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.remote_url.is_empty() {
            return Err("REMOTE_URL must not be empty".to_string());
        }
        if !self.remote_url.starts_with("http://") && !self.remote_url.starts_with("https://") {
            return Err(format!(
                "REMOTE_URL must be an http(s) URL, got '{}'",
                self.remote_url
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err("REQUEST_TIMEOUT_MS must be positive".to_string());
        }
        Ok(())
    }

    /// Session for this invocation, derived from the configured identity
    pub fn session(&self) -> Session {
        match &self.user {
            Some(user) => Session::login(user.clone()),
            None => Session::logged_out(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["rollbook"];
        argv.extend_from_slice(extra);
        argv.push("list");
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_validate() {
        assert!(args(&[]).validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let a = args(&["--remote-url", "ftp://example.com"]);
        assert!(a.validate().is_err());
    }

    #[test]
    fn test_session_classification() {
        assert!(!args(&[]).session().can_mutate());
        assert!(!args(&["--user", "Guest"]).session().can_mutate());
        assert!(args(&["--user", "Alice"]).session().can_mutate());
    }
}
