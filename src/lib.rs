//! Rollbook - roster level tracker with two-tier persistence
//!
//! Tracks a small roster of named persons, each with a 0-10 proficiency
//! level, an append-only level history, shared notes, per-admin annotations,
//! and a zero-crossing counter. Every level change and reset lands in a
//! shared, most-recent-first activity log.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   mutations    ┌─────────────────────────────┐
//! │ CLI / UI     │───────────────►│ MutationEngine              │
//! │ (read-only   │                │  - Session gate             │
//! │  for guests) │◄───list()──────│  - clamp + derived fields   │
//! └──────────────┘                │  - audit emission           │
//!                                 └──────────────┬──────────────┘
//!                                                │ dispatch
//!                                 ┌──────────────▼──────────────┐
//!                                 │ PersistenceAdapter          │
//!                                 │  remote (best-effort)       │
//!                                 │  local cache (guaranteed)   │
//!                                 └─────────────────────────────┘
//! ```
//!
//! The remote tabular store is authoritative when reachable; the local
//! file-backed cache is the fallback on load and the durability floor on
//! every write. In-memory state is updated synchronously before any remote
//! I/O, so readers observe mutations immediately (cache-behind, not
//! cache-through).

pub mod audit;
pub mod config;
pub mod engine;
pub mod notify;
pub mod persist;
pub mod roster;
pub mod session;
pub mod types;

pub use audit::AuditLog;
pub use config::Args;
pub use engine::{MutationEngine, MutationOutcome};
pub use notify::{Notifier, TracingNotifier};
pub use persist::{DataSource, LocalCache, PersistenceAdapter, RemoteStore};
pub use roster::{default_roster, Person, RosterStore};
pub use session::Session;
pub use types::{Result, RollbookError};
