//! labhost core - lab host bookmarks and reachability probing
//!
//! This crate keeps a small, persisted catalogue of lab machines (grouped into
//! environments, tagged and pinned) and periodically checks whether they are
//! reachable. The implementation prioritizes:
//!
//! 1. **Durability** - A failed load never loses the catalogue; concurrent
//!    writers are detected instead of silently overwritten
//! 2. **Logging** - Every mutation and probe outcome logged with context
//! 3. **Bounded probing** - Every attempt is time-bounded, one host at a time
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `model` - Host records, environments, the document and settings
//! - `validation` - Host field, selection and import checks
//! - `storage` - Key/value persistence backends
//! - `store` - Document operations, queries, import/export and the `Store` service
//! - `probe` - Reachability prober and the sequential sweep
//! - `launch` - Web/SSH/RDP/copy actions and the outbound seam
//! - `logging` - Structured logging with run context

pub mod launch;
pub mod logging;
pub mod model;
pub mod probe;
pub mod storage;
pub mod store;
pub mod validation;

pub use model::{Document, Environment, HealthStatus, HostFields, HostRecord, Settings};
pub use probe::{HostProber, ProbeResult, Prober, SweepSummary};
pub use storage::{FileBackend, MemoryBackend, StorageBackend};
pub use store::{Store, StoreError};

/// Initialize the process-wide logger.
///
/// Info level unless `RUST_LOG` says otherwise. Safe to call more than once.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
