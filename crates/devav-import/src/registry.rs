//! Import task registry
//!
//! Provides [`ImportRegistry`], the set of import jobs a run schedules.

use crate::importers::{
    CrestImport, CustomerCommunicationImport, CustomerEmployeeImport, CustomerImport,
    CustomerStoreImport, EmployeeImport, EmployeeTaskImport, EvaluationImport, ImportJob,
    OrderImport, OrderItemImport, PictureImport, ProbationImport, ProductCatalogImport,
    ProductImageImport, ProductImport, QuoteImport, QuoteItemImport, StateImport,
    TaskAttachedFileImport, Transform, TransformJob,
};
use crate::scheduler::{self, ScheduleError, StagePlan};
use devav_model::EntityKind;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Import jobs keyed by the kind they import
#[derive(Clone, Default)]
pub struct ImportRegistry {
    jobs: BTreeMap<EntityKind, Arc<dyn ImportJob>>,
}

impl std::fmt::Debug for ImportRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl ImportRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with one job per imported kind
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_transform::<CrestImport>();
        registry.register_transform::<StateImport>();
        registry.register_transform::<CustomerImport>();
        registry.register_transform::<PictureImport>();
        registry.register_transform::<ProbationImport>();
        registry.register_transform::<CustomerStoreImport>();
        registry.register_transform::<EmployeeImport>();
        registry.register_transform::<EvaluationImport>();
        registry.register_transform::<ProductImport>();
        registry.register_transform::<ProductImageImport>();
        registry.register_transform::<ProductCatalogImport>();
        registry.register_transform::<OrderImport>();
        registry.register_transform::<OrderItemImport>();
        registry.register_transform::<QuoteImport>();
        registry.register_transform::<QuoteItemImport>();
        registry.register_transform::<CustomerEmployeeImport>();
        registry.register_transform::<CustomerCommunicationImport>();
        registry.register_transform::<EmployeeTaskImport>();
        registry.register_transform::<TaskAttachedFileImport>();
        registry
    }

    /// Register a job, replacing any job for the same kind
    pub fn register(&mut self, job: Arc<dyn ImportJob>) -> Option<Arc<dyn ImportJob>> {
        self.jobs.insert(job.kind(), job)
    }

    /// Register the job driving transform `X`
    pub fn register_transform<X: Transform>(&mut self) {
        self.register(Arc::new(TransformJob::<X>::new()));
    }

    /// Remove the job for `kind`
    pub fn remove(&mut self, kind: EntityKind) -> Option<Arc<dyn ImportJob>> {
        self.jobs.remove(&kind)
    }

    /// Job importing `kind`
    #[inline]
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> Option<Arc<dyn ImportJob>> {
        self.jobs.get(&kind).cloned()
    }

    /// Registered kinds, in kind order
    #[must_use]
    pub fn kinds(&self) -> Vec<EntityKind> {
        self.jobs.keys().copied().collect()
    }

    /// Get number of registered jobs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Stage plan for the registered jobs
    ///
    /// # Errors
    /// As [`scheduler::plan`]
    pub fn plan(&self) -> Result<StagePlan, ScheduleError> {
        scheduler::plan(
            self.jobs
                .values()
                .map(|job| (job.kind(), job.depends_on())),
        )
    }
}
