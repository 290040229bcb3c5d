//! Batch orchestration for meal-to-image matching.
//!
//! The [`Orchestrator`] drives one invocation end to end: load the image
//! catalog (cached per process), resolve the candidate meal list from
//! either a request payload or the meal store, then match and persist in
//! batches, stopping early when the wall-clock budget nears exhaustion.
//!
//! External collaborators (meal store, embedding endpoint, catalog
//! source, clock) are injected through the traits in [`traits`], so the
//! whole pipeline runs against in-memory fakes in tests.

pub mod config;
pub mod embed;
pub mod error;
pub mod orchestrator;
pub mod traits;
pub mod types;

pub use config::RunnerConfig;
pub use embed::{EmbeddingConfig, HttpEmbeddingProvider};
pub use error::RunnerError;
pub use orchestrator::Orchestrator;
pub use traits::{
    EmbeddingError, EmbeddingProvider, MealStore, RunBudget, StoreError, WallClockBudget,
};
pub use types::{
    FailedMapping, FailureReport, Meal, MealMapping, Provenance, RunMode, RunReport, RunRequest,
    StoredMeal, WeeklyPlanDoc,
};
