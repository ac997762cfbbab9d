//! Rollbook - roster level tracker with remote sync and local fallback

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rollbook::{
    config::{Args, Command},
    engine::{MutationEngine, MutationOutcome},
    notify::TracingNotifier,
    persist::{HttpRemoteStore, LocalCache, PersistenceAdapter},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("rollbook={log_level},warn").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("Remote: {}", args.remote_url);
    info!("Cache: {}", args.cache_dir.display());

    let session = args.session();
    let remote = HttpRemoteStore::new(
        &args.remote_url,
        args.remote_api_key.clone(),
        args.request_timeout_ms,
    )?;
    let adapter = PersistenceAdapter::new(Arc::new(remote), LocalCache::new(&args.cache_dir));
    let mut engine = MutationEngine::load(adapter, Arc::new(TracingNotifier)).await;

    match args.command {
        Command::List => {
            for person in engine.roster().list() {
                let note = if person.notes.is_empty() {
                    String::new()
                } else {
                    format!("  notes: {}", person.notes)
                };
                println!(
                    "{:>3}  {:<12} level {:>2}  (zeroed {}x){}",
                    person.id, person.name, person.level, person.zero_count, note
                );
                if let Some(mine) = session.current_user().and_then(|u| person.admin_notes.get(u))
                {
                    println!("     your note: {mine}");
                }
            }
        }
        Command::Log { limit } => {
            let entries = engine.audit_log().list();
            let shown = limit.unwrap_or(entries.len());
            for entry in entries.iter().take(shown) {
                println!("{entry}");
            }
        }
        Command::SetLevel { id, level } => {
            match engine.set_level(&session, id, level).await? {
                MutationOutcome::Applied => {}
                MutationOutcome::Unchanged => println!("Level unchanged."),
            }
        }
        Command::SetNotes { id, text } => {
            engine.set_notes(&session, id, &text).await?;
        }
        Command::Note { id, text } => {
            engine.set_admin_note(&session, id, &text).await?;
        }
        Command::Reset => {
            engine.reset_all(&session).await?;
        }
    }

    Ok(())
}
