//! Command line surface.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::SyncError;
use crate::mapping::Mapping;
use crate::models::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "confluence-sync",
    version,
    about = "Publish markdown notes to Confluence pages",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Settings file (default: .confluence-sync/settings.ron).
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync contents of current page to remote.
    Sync(NoteArgs),

    /// Create new connection between the note and a Confluence page.
    Connect(ConnectArgs),

    /// Show or change the Confluence host and access token.
    #[command(subcommand)]
    Config(ConfigCommand),

    /// List note identifiers and the pages they are connected to.
    Mappings,
}

#[derive(Args, Debug)]
pub struct NoteArgs {
    /// Note to act on (default: $CONFLUENCE_SYNC_ACTIVE_NOTE).
    pub note: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Note to act on (default: $CONFLUENCE_SYNC_ACTIVE_NOTE).
    pub note: Option<PathBuf>,

    /// Confluence page id. Prompted for when omitted.
    #[arg(long, value_name = "ID")]
    pub page_id: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the current settings.
    Show,

    /// Set the Confluence base URL (e.g. https://wiki.example.com).
    SetHost { url: String },

    /// Set the personal access token.
    SetToken { token: String },
}

/// Ask for a page id on `input`. Returns an empty string when dismissed.
pub fn prompt_page_id(input: &mut impl BufRead, output: &mut impl Write) -> Result<String, SyncError> {
    write!(output, "Confluence page id: ").map_err(SyncError::Prompt)?;
    output.flush().map_err(SyncError::Prompt)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(SyncError::Prompt)?;
    Ok(line.trim().to_string())
}

pub fn prompt_page_id_stdin() -> Result<String, SyncError> {
    prompt_page_id(&mut io::stdin().lock(), &mut io::stdout())
}

/// Show only the last four characters of a token
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.is_empty() {
        return "(not set)".to_string();
    }
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

pub fn render_settings(settings: &Settings) -> String {
    let host = if settings.confluence_host.is_empty() {
        "(not set)"
    } else {
        settings.confluence_host.as_str()
    };
    format!(
        "confluence host:       {}\npersonal access token: {}\nconnected notes:       {}",
        host,
        mask_token(&settings.personal_access_token),
        settings
            .mapping
            .iter()
            .filter(|(_, page)| !page.is_empty())
            .count()
    )
}

pub fn render_mappings(mapping: &Mapping) -> String {
    if mapping.is_empty() {
        return "No notes have an identifier yet".to_string();
    }
    mapping
        .iter()
        .map(|(id, page)| {
            if page.is_empty() {
                format!("{}  (not connected)", id)
            } else {
                format!("{}  {}", id, page)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
