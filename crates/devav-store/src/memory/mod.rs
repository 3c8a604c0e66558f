//! In-memory stores
//!
//! - [`MemorySourceStore`]: serves a [`SourceSnapshot`] loaded from JSON
//! - [`MemoryTargetStore`]: transactional store with atomic, validated commits

mod snapshot;
mod source;
mod target;

pub use snapshot::SourceSnapshot;
pub use source::MemorySourceStore;
pub use target::MemoryTargetStore;
