//! DevAV Import - staged migration of the legacy DevAV dataset
//!
//! Moves every legacy collection into a transactional target store and
//! rebuilds the references between them:
//! - The scheduler orders import jobs into dependency stages
//! - Each stage runs its jobs concurrently, then commits once
//! - The reference resolver maps legacy keys to committed target entities
//! - The aggregate cloner duplicates orders and quotes for load testing
//!
//! # Example
//!
//! ```rust,ignore
//! use devav_import::{generate_clones, import_all};
//! use devav_store::{MemorySourceStore, MemoryTargetStore, SourceSnapshot};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Arc::new(MemorySourceStore::new(SourceSnapshot::load("devav.json")?));
//! let target = Arc::new(MemoryTargetStore::new());
//!
//! let report = import_all(target.clone(), source).await?;
//! println!("imported {} entities", report.entities_created());
//!
//! generate_clones(target, 10).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cloner;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod importers;
pub mod registry;
pub mod resolver;
pub mod scheduler;
pub mod state;

pub use cloner::{
    generate_clones, generate_quote_clones, Aggregate, CloneReport, Cloner, OrderAggregate,
    QuoteAggregate,
};
pub use config::MigrationConfig;
pub use coordinator::{import_all, Migration, MigrationReport, StageReport};
pub use error::MigrationError;
pub use importers::{ImportContext, ImportJob, ImportStats, Transform, TransformContext, TransformJob};
pub use registry::ImportRegistry;
pub use resolver::SourceIndex;
pub use scheduler::{ScheduleError, StagePlan};
pub use state::{PipelineState, StateError};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running a migration
    pub use crate::{
        generate_clones, import_all, Migration, MigrationConfig, MigrationError, MigrationReport,
        PipelineState,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
