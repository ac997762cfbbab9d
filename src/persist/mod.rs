//! Two-tier persistence
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  PersistenceAdapter                     │
//! ├─────────────────────────────────────────────────────────┤
//! │  ┌──────────────────┐       ┌─────────────────────────┐ │
//! │  │  RemoteStore     │       │  LocalCache             │ │
//! │  │  (HTTP tabular)  │       │  (two snapshot files)   │ │
//! │  │  - authoritative │       │  - fallback on load     │ │
//! │  │  - best-effort   │       │  - durability floor     │ │
//! │  └──────────────────┘       └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! One fallback policy applies uniformly to load, save and reset: the remote
//! tier is tried first and allowed to fail; the local tier is always written
//! and is the only operation expected to succeed. Load never errors - it
//! degrades through cache to the compiled-in defaults and reports which
//! source won via [`DataSource`].

pub mod adapter;
pub mod local;
pub mod remote;

pub use adapter::{DataSource, LoadOutcome, PersistenceAdapter, TierStatus};
pub use local::{LocalCache, LOG_KEY, ROSTER_KEY};
pub use remote::{HttpRemoteStore, LogRow, PersonRow, RemoteStore};
