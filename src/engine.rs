//! Mutation engine - the single path for every observable state change
//!
//! Each call consults the session gate, applies the in-memory mutation
//! synchronously, then dispatches persistence. The in-memory roster and log
//! are settled before any remote await, so readers observe the change
//! immediately whether or not the remote write lands (cache-behind).
//!
//! Authorization failures are no-ops surfaced as `AccessDenied`; they change
//! no state and emit no audit entry.

use std::sync::Arc;
use tracing::{debug, info};

use crate::audit::{self, AuditLog};
use crate::notify::Notifier;
use crate::persist::{DataSource, PersistenceAdapter, TierStatus};
use crate::roster::{clamp_level, default_roster, RosterStore};
use crate::session::Session;
use crate::types::{Result, RollbookError};

/// Whether a mutation changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// State changed and was dispatched to persistence
    Applied,
    /// Idempotent no-op (same value as current)
    Unchanged,
}

/// Owns the roster, the audit log, and the persistence dispatch
pub struct MutationEngine {
    roster: RosterStore,
    log: AuditLog,
    persist: PersistenceAdapter,
    notifier: Arc<dyn Notifier>,
}

impl MutationEngine {
    /// Load state through the adapter's fallback chain and build the engine.
    ///
    /// Never fails; a degraded source is surfaced through the notifier.
    pub async fn load(persist: PersistenceAdapter, notifier: Arc<dyn Notifier>) -> Self {
        let outcome = persist.load_all().await;
        match outcome.source {
            DataSource::Remote => {
                info!(persons = outcome.roster.len(), "Engine ready (remote state)");
            }
            DataSource::LocalCache => {
                notifier.warning(
                    "Connection Error",
                    "Could not reach the remote store. Using local data instead.",
                );
            }
            DataSource::Defaults => {
                notifier.warning(
                    "Connection Error",
                    "No remote or cached data found. Starting from the default roster.",
                );
            }
        }

        Self {
            roster: RosterStore::new(outcome.roster),
            log: AuditLog::new(outcome.log),
            persist,
            notifier,
        }
    }

    /// Read access to the roster
    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    /// Read access to the audit log
    pub fn audit_log(&self) -> &AuditLog {
        &self.log
    }

    fn authorize(&self, session: &Session, action: &str) -> Result<String> {
        if session.can_mutate() {
            Ok(session.actor().to_string())
        } else {
            self.notifier.error(
                "Access Denied",
                "Guest users cannot modify data. Please login as admin.",
            );
            Err(RollbookError::AccessDenied(format!(
                "{action} requires an admin session"
            )))
        }
    }

    /// Set a person's level.
    ///
    /// The requested value is clamped to the valid range, never rejected.
    /// Writing the current level is an idempotent no-op: no history entry,
    /// no audit entry, no persistence dispatch.
    pub async fn set_level(
        &mut self,
        session: &Session,
        id: u32,
        requested: i32,
    ) -> Result<MutationOutcome> {
        let actor = self.authorize(session, "set_level")?;
        let new_level = clamp_level(requested);

        let person = self.roster.get_mut(id).ok_or(RollbookError::NotFound(id))?;
        if !person.apply_level(new_level) {
            debug!(id = id, level = new_level, "Level unchanged, skipping");
            return Ok(MutationOutcome::Unchanged);
        }
        let name = person.name.clone();
        let changed = person.clone();

        let entry = audit::level_change_entry(&actor, &name, new_level);
        self.log.prepend(entry.clone());

        // Memory is settled; everything past here is durability
        let roster_snapshot = self.roster.snapshot();
        let log_snapshot = self.log.snapshot();
        let status = self
            .persist
            .save_person(&changed, &roster_snapshot)
            .await
            .and(self.persist.append_audit(&entry, &log_snapshot).await);

        self.report(
            "Level Updated",
            &format!("{name}'s level is now {new_level}"),
            status,
        );
        Ok(MutationOutcome::Applied)
    }

    /// Overwrite a person's shared notes.
    ///
    /// Last-write-wins across admins and silent by design: notes changes
    /// emit no audit entry.
    pub async fn set_notes(&mut self, session: &Session, id: u32, text: &str) -> Result<()> {
        self.authorize(session, "set_notes")?;

        let person = self.roster.get_mut(id).ok_or(RollbookError::NotFound(id))?;
        person.notes = text.to_string();
        let changed = person.clone();

        let roster_snapshot = self.roster.snapshot();
        let status = self.persist.save_person(&changed, &roster_snapshot).await;

        self.report("Notes Updated", "Person notes have been saved.", status);
        Ok(())
    }

    /// Write the calling admin's private annotation for a person.
    ///
    /// Each admin's key is exclusively theirs; entries are created lazily on
    /// first write and never deleted. Not audit-logged.
    pub async fn set_admin_note(&mut self, session: &Session, id: u32, text: &str) -> Result<()> {
        let actor = self.authorize(session, "set_admin_note")?;

        let person = self.roster.get_mut(id).ok_or(RollbookError::NotFound(id))?;
        person.admin_notes.insert(actor, text.to_string());
        let changed = person.clone();

        let roster_snapshot = self.roster.snapshot();
        let status = self.persist.save_person(&changed, &roster_snapshot).await;

        self.report("Note Saved", "Your note has been saved.", status);
        Ok(())
    }

    /// Destroy all state and re-seed from the default roster.
    ///
    /// The audit log is replaced with exactly one entry naming the actor.
    pub async fn reset_all(&mut self, session: &Session) -> Result<()> {
        let actor = self.authorize(session, "reset_all")?;

        let roster = default_roster();
        let entry = audit::reset_entry(&actor);
        self.roster.replace(roster.clone());
        self.log.replace(vec![entry.clone()]);

        let status = self.persist.reset_all(&roster, &entry).await;

        self.report("Data Reset", "All data has been reset to default values.", status);
        Ok(())
    }

    fn report(&self, title: &str, detail: &str, status: TierStatus) {
        self.notifier.success(title, detail);
        if !status.cache_ok {
            self.notifier.warning(
                "Save Warning",
                "Change applied but may not survive a restart.",
            );
        } else if !status.remote_ok {
            self.notifier.warning(
                "Sync Warning",
                "Saved locally; the remote store could not be reached.",
            );
        }
    }
}
