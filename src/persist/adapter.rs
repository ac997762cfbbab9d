//! Persistence adapter - one fallback policy across both tiers
//!
//! Load: remote first, local cache on any remote failure, compiled-in
//! defaults when the cache is also empty. Never fails; the winning source is
//! reported so callers can surface degraded mode.
//!
//! Save and reset: best-effort remote write, guaranteed-attempt local write.
//! Remote failures degrade silently to local-only persistence; a local
//! failure is surfaced as a warning but never rolls back the in-memory
//! mutation the caller already observed.

use std::sync::Arc;
use tracing::{info, warn};

use crate::persist::local::LocalCache;
use crate::persist::remote::{PersonRow, RemoteStore};
use crate::roster::{default_roster, Person};
use crate::types::{Result, RollbookError};

/// Which tier satisfied a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Remote store answered; fully consistent
    Remote,
    /// Remote failed; local cache snapshot in use
    LocalCache,
    /// Nothing persisted anywhere; compiled-in default roster
    Defaults,
}

/// Result of a load: a usable state, always
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub roster: Vec<Person>,
    pub log: Vec<String>,
    pub source: DataSource,
}

/// Per-tier result of a write dispatch
#[derive(Debug, Clone, Copy)]
pub struct TierStatus {
    pub remote_ok: bool,
    pub cache_ok: bool,
}

impl TierStatus {
    /// Combine two dispatches: a tier succeeded only if it succeeded in both
    pub fn and(self, other: TierStatus) -> TierStatus {
        TierStatus {
            remote_ok: self.remote_ok && other.remote_ok,
            cache_ok: self.cache_ok && other.cache_ok,
        }
    }

    /// The change survives a restart through at least one tier
    pub fn durable(&self) -> bool {
        self.remote_ok || self.cache_ok
    }
}

/// Two-tier persistence with a uniform fallback policy
pub struct PersistenceAdapter {
    remote: Arc<dyn RemoteStore>,
    cache: LocalCache,
}

impl PersistenceAdapter {
    pub fn new(remote: Arc<dyn RemoteStore>, cache: LocalCache) -> Self {
        Self { remote, cache }
    }

    /// Load roster and log. Never fails.
    ///
    /// On remote failure the local cache is used; an empty cache bootstraps
    /// the default roster (and writes it back so the next run has a cache).
    pub async fn load_all(&self) -> LoadOutcome {
        match self.load_remote().await {
            Ok(outcome) => {
                info!(persons = outcome.roster.len(), "Loaded state from remote store");
                // Keep the fallback tier warm with what the remote returned
                if let Err(e) = self.cache.save_roster(&outcome.roster) {
                    warn!(error = %e, "Could not refresh cached roster snapshot");
                }
                if let Err(e) = self.cache.save_log(&outcome.log) {
                    warn!(error = %e, "Could not refresh cached log snapshot");
                }
                outcome
            }
            Err(e) => {
                warn!(error = %e, "Remote load failed, falling back to local cache");
                match self.cache.load_roster() {
                    Some(roster) => {
                        let log = self.cache.load_log().unwrap_or_default();
                        LoadOutcome {
                            roster,
                            log,
                            source: DataSource::LocalCache,
                        }
                    }
                    None => {
                        let roster = default_roster();
                        if let Err(e) = self.cache.save_roster(&roster) {
                            warn!(error = %e, "Could not seed cached roster snapshot");
                        }
                        LoadOutcome {
                            roster,
                            log: Vec::new(),
                            source: DataSource::Defaults,
                        }
                    }
                }
            }
        }
    }

    async fn load_remote(&self) -> Result<LoadOutcome> {
        let rows = self.remote.fetch_roster().await?;
        let log_rows = self.remote.fetch_log().await?;

        let roster: Vec<Person> = rows.into_iter().filter_map(PersonRow::into_person).collect();
        if roster.is_empty() {
            // An unseeded remote is not a usable source of truth
            return Err(RollbookError::Remote("remote roster is empty".to_string()));
        }

        Ok(LoadOutcome {
            roster,
            log: log_rows.into_iter().map(|r| r.message).collect(),
            source: DataSource::Remote,
        })
    }

    /// Persist one person: remote point update (best-effort) plus a full
    /// roster snapshot to the cache (guaranteed attempt).
    pub async fn save_person(&self, person: &Person, roster_snapshot: &[Person]) -> TierStatus {
        let remote_ok = match self.remote.update_person(&PersonRow::from_person(person)).await {
            Ok(()) => true,
            Err(e) => {
                warn!(id = person.id, error = %e, "Remote person update failed, continuing local-only");
                false
            }
        };

        let cache_ok = match self.cache.save_roster(roster_snapshot) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Local roster snapshot failed; change lives in memory only");
                false
            }
        };

        TierStatus { remote_ok, cache_ok }
    }

    /// Persist one audit entry: remote insert (best-effort) plus a full log
    /// snapshot to the cache.
    pub async fn append_audit(&self, message: &str, log_snapshot: &[String]) -> TierStatus {
        let remote_ok = match self.remote.insert_log(message).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Remote log insert failed, continuing local-only");
                false
            }
        };

        let cache_ok = match self.cache.save_log(log_snapshot) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Local log snapshot failed; entry lives in memory only");
                false
            }
        };

        TierStatus { remote_ok, cache_ok }
    }

    /// Reset both tiers to the default roster and a single reset entry
    pub async fn reset_all(&self, roster: &[Person], reset_message: &str) -> TierStatus {
        let rows: Vec<PersonRow> = roster.iter().map(PersonRow::from_person).collect();

        let remote_ok = match self.remote.replace_all(&rows, reset_message).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Remote reset failed, continuing local-only");
                false
            }
        };

        let mut cache_ok = true;
        if let Err(e) = self.cache.save_roster(roster) {
            warn!(error = %e, "Local roster reset failed");
            cache_ok = false;
        }
        if let Err(e) = self.cache.save_log(&[reset_message.to_string()]) {
            warn!(error = %e, "Local log reset failed");
            cache_ok = false;
        }

        TierStatus { remote_ok, cache_ok }
    }
}
