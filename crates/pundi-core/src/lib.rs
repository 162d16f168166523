//! pundi-core
//!
//! Synchronization and aggregation engine for the Pundi finance tracker.
//! Depends on pundi-domain. No terminal I/O; all persistence goes through
//! the [`BackendClient`] seam.

pub mod aggregation;
pub mod backend;
pub mod codec;
pub mod error;
pub mod events;
pub mod format;
pub mod memory;
pub mod offline;
pub mod record_store;
pub mod sync;

pub use aggregation::*;
pub use backend::*;
pub use codec::*;
pub use error::{BackendError, CoreError, CoreResult};
pub use events::SyncEvent;
pub use format::*;
pub use memory::MemoryBackend;
pub use offline::offline_dataset;
pub use record_store::{RecordStore, Rollback};
pub use sync::*;
