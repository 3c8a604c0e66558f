//! DevAV Store - the two stores the migration moves data between
//!
//! - [`SourceStore`]: read-only legacy collections, enumerated as streams
//! - [`TargetStore`]: transactional object store with commit barriers and
//!   a clone-schema query
//! - [`memory`]: in-memory implementations of both
//!
//! # Example
//!
//! ```rust
//! use devav_model::target::Customer;
//! use devav_store::{MemoryTargetStore, TargetStore, TargetStoreExt};
//!
//! # async fn example() -> Result<(), devav_store::StoreError> {
//! let store = MemoryTargetStore::new();
//! let acme = store.create(Customer { name: "Acme".into(), ..Customer::default() });
//! store.commit().await?;
//! assert_eq!(store.get(acme).map(|c| c.name), Some("Acme".to_string()));
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod error;
pub mod memory;
pub mod source;
pub mod target;

pub use error::StoreError;
pub use memory::{MemorySourceStore, MemoryTargetStore, SourceSnapshot};
pub use source::{SourceQuery, SourceStore, SourceStoreExt};
pub use target::{CommitReceipt, TargetStore, TargetStoreExt};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
