//! Capability contracts for the orchestrator's external collaborators.
//!
//! Each collaborator is injected as a narrow trait so tests can
//! substitute in-memory fakes without network access.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{FailedMapping, MealMapping, StoredMeal};

/// Failures from the document store backing meals and mappings.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// The external meal/mapping document store.
#[async_trait]
pub trait MealStore: Send + Sync {
    /// All candidate meal documents, flattened to one record per meal.
    async fn list_meals(&self) -> Result<Vec<StoredMeal>, StoreError>;

    /// Names that already have a persisted mapping; used to skip
    /// already-mapped meals in fetch mode.
    async fn list_mapped_names(&self) -> Result<HashSet<String>, StoreError>;

    /// Append one successful mapping document.
    async fn append_mapping(&self, mapping: &MealMapping) -> Result<(), StoreError>;

    /// Append one failed/audit mapping document.
    async fn append_failed(&self, failed: &FailedMapping) -> Result<(), StoreError>;
}

/// Failures from the embedding provider. Always recoverable at the
/// per-meal level: the orchestrator records them and moves on.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("invalid embedding config: {0}")]
    InvalidConfig(String),
    #[error("embedding request failed: {0}")]
    Request(String),
    #[error("unusable embedding response: {0}")]
    Response(String),
}

/// Turns meal text into a fixed-length embedding vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Remaining wall-clock execution budget. Checked between batches; there
/// is no mid-batch cancellation.
pub trait RunBudget: Send + Sync {
    fn remaining(&self) -> Duration;
}

/// Deadline-based budget for real invocations.
pub struct WallClockBudget {
    deadline: Instant,
}

impl WallClockBudget {
    pub fn starting_now(budget: Duration) -> Self {
        Self {
            deadline: Instant::now() + budget,
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self { deadline }
    }
}

impl RunBudget for WallClockBudget {
    fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}
