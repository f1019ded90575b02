//! Sync subcommand for the cloud document store.
//!
//! Every network action runs on a current-thread tokio runtime built for
//! the single command.

use std::future::Future;

use clap::Subcommand;
use serde::Serialize;
use shiftbook_core::sync::{
    apply_snapshot, local_snapshot, record_sync, sanitize_user_id, sync_status, CloudClient,
};
use shiftbook_core::{Config, ShiftDb};

use super::print_json;

/// Sync actions.
#[derive(Subcommand)]
pub enum SyncAction {
    /// Store the user id (derived from an e-mail address) and endpoint
    Login {
        /// E-mail address
        email: String,
        /// Cloud store base URL
        #[arg(long)]
        endpoint: Option<String>,
        /// API key sent as a bearer token
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Forget the stored user id
    Logout,
    /// Overwrite the cloud document with local data and pay settings
    Push,
    /// Replace local data and pay settings with the cloud document
    Pull,
    /// Merge local and cloud data in both directions
    Run,
    /// Show sync status
    Status,
}

#[derive(Serialize)]
struct SyncReport {
    action: &'static str,
    shifts: usize,
    holidays: usize,
    /// Config keys updated from the cloud
    settings_applied: Vec<String>,
    synced_at: String,
}

/// Run the sync command.
pub fn run(action: SyncAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SyncAction::Login {
            email,
            endpoint,
            api_key,
        } => login(&email, endpoint, api_key),
        SyncAction::Logout => {
            let mut config = Config::load()?;
            config.sync.user_id = None;
            config.save()?;
            println!("logged out");
            Ok(())
        }
        SyncAction::Push => push(),
        SyncAction::Pull => pull(),
        SyncAction::Run => sync_both(),
        SyncAction::Status => {
            let config = Config::load()?;
            let db = ShiftDb::open()?;
            print_json(&sync_status(&config.sync, &db)?)
        }
    }
}

fn block_on<F: Future>(future: F) -> Result<F::Output, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(future))
}

fn login(
    email: &str,
    endpoint: Option<String>,
    api_key: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let user_id = sanitize_user_id(email);
    if user_id.is_empty() {
        return Err("e-mail address is empty".into());
    }

    let mut config = Config::load()?;
    config.sync.user_id = Some(user_id.clone());
    if endpoint.is_some() {
        config.sync.endpoint = endpoint;
    }
    if api_key.is_some() {
        config.sync.api_key = api_key;
    }
    // Validates the endpoint before anything is written.
    CloudClient::from_config(&config.sync)?;
    config.save()?;

    tracing::info!(user = %user_id, "logged in");
    println!("logged in as {user_id}");
    Ok(())
}

fn open_client() -> Result<(CloudClient, ShiftDb, Config), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = CloudClient::from_config(&config.sync)?;
    let db = ShiftDb::open()?;
    Ok((client, db, config))
}

fn push() -> Result<(), Box<dyn std::error::Error>> {
    let (client, db, config) = open_client()?;
    let snapshot = local_snapshot(&db, &config)?;
    let synced_at = block_on(client.upload(&snapshot))??;
    record_sync(&db, synced_at)?;

    print_json(&SyncReport {
        action: "push",
        shifts: snapshot.shifts.len(),
        holidays: snapshot.holidays.len(),
        settings_applied: Vec::new(),
        synced_at: synced_at.to_rfc3339(),
    })
}

fn pull() -> Result<(), Box<dyn std::error::Error>> {
    let (client, db, mut config) = open_client()?;
    let Some(snapshot) = block_on(client.download())?? else {
        return Err(format!("no cloud data for {}", client.user_id()).into());
    };
    let settings_applied = apply_snapshot(&db, &mut config, &snapshot)?;
    config.save()?;
    let synced_at = chrono::Utc::now();
    record_sync(&db, synced_at)?;

    print_json(&SyncReport {
        action: "pull",
        shifts: snapshot.shifts.len(),
        holidays: snapshot.holidays.len(),
        settings_applied,
        synced_at: synced_at.to_rfc3339(),
    })
}

fn sync_both() -> Result<(), Box<dyn std::error::Error>> {
    let (client, db, mut config) = open_client()?;
    let local = local_snapshot(&db, &config)?;
    let outcome = block_on(client.sync(&local))??;
    let settings_applied = apply_snapshot(&db, &mut config, &outcome.snapshot)?;
    config.save()?;
    record_sync(&db, outcome.synced_at)?;

    print_json(&SyncReport {
        action: if outcome.cloud_was_empty { "upload" } else { "merge" },
        shifts: outcome.snapshot.shifts.len(),
        holidays: outcome.snapshot.holidays.len(),
        settings_applied,
        synced_at: outcome.synced_at.to_rfc3339(),
    })
}
