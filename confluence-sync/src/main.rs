//! confluence-sync — publish markdown notes to Confluence pages.
//!
//! Each note gets a stable `uniqueId` in its front matter; a settings file maps
//! that identifier to a Confluence page id, so notes can be renamed or moved
//! without losing their page.

use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;

mod cli;
mod config;
mod confluence;
mod error;
mod mapping;
mod models;
mod notes;
mod notify;
mod sync;

use cli::{Cli, Commands, ConfigCommand};
use config::Config;
use error::SyncError;
use models::SettingsRepository;
use notify::ConsoleNotifier;
use sync::{SyncOutcome, SyncService};

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.settings.clone());

    match run(cli.command, config).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        // already shown to the user as a notice
        Err(SyncError::Remote(e)) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Runs one command. `Ok(false)` means the command completed but Confluence
/// refused the update.
async fn run(command: Commands, config: Config) -> Result<bool, SyncError> {
    let settings = SettingsRepository::open(&config.settings_path)?;
    let mut service = SyncService::new(settings, Arc::new(ConsoleNotifier), config.http_timeout);

    match command {
        Commands::Sync(args) => {
            let note = config.resolve_note(args.note);
            let outcome = service.sync_note(note.as_deref()).await?;
            log::debug!("Sync finished: {:?}", outcome);
            if let SyncOutcome::Rejected { .. } = outcome {
                return Ok(false);
            }
        }
        Commands::Connect(args) => {
            let Some(note) = config.resolve_note(args.note) else {
                log::debug!("No active note, connect skipped");
                return Ok(true);
            };
            let page_id = match args.page_id {
                Some(page_id) => page_id,
                None => cli::prompt_page_id_stdin()?,
            };
            service.connect(Some(note.as_path()), &page_id)?;
        }
        Commands::Config(ConfigCommand::Show) => {
            println!("settings file:         {:?}", service.settings().path());
            println!("{}", cli::render_settings(service.settings().settings()));
        }
        Commands::Config(ConfigCommand::SetHost { url }) => {
            service.settings_mut().set_host(&url)?;
            println!("Confluence host set to {}", service.settings().settings().confluence_host);
        }
        Commands::Config(ConfigCommand::SetToken { token }) => {
            service.settings_mut().set_token(&token)?;
            println!("Personal access token saved");
        }
        Commands::Mappings => {
            println!("{}", cli::render_mappings(service.settings().mapping()));
        }
    }

    Ok(true)
}
