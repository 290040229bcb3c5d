//! Umbrella crate for the platepix meal-to-image matching engine.
//!
//! This crate stitches the member crates together so callers get the
//! whole pipeline from one dependency: dietary classification
//! ([`diet`]), scoring primitives ([`similarity`]), per-meal best-image
//! selection ([`selector`]), and batch orchestration ([`runner`]).

pub use diet::{classify, detect_image_vegetarian, detect_meal_vegetarian};
pub use runner::{
    EmbeddingConfig, EmbeddingError, EmbeddingProvider, FailedMapping, FailureReport,
    HttpEmbeddingProvider, Meal, MealMapping, MealStore, Orchestrator, Provenance, RunBudget,
    RunMode, RunReport, RunRequest, RunnerConfig, RunnerError, StoreError, StoredMeal,
    WallClockBudget, WeeklyPlanDoc,
};
pub use selector::{
    Catalog, CatalogCache, CatalogError, CatalogSource, ImageRecord, JsonFileSource, MatchMethod,
    MatchResult, MatchedImage, MealRef, RawImageRecord, Selector, SelectorConfig, SelectorError,
    StaticSource,
};
pub use similarity::{cosine, text_overlap, SimilarityError};

use std::sync::Arc;

/// Match a single meal name against an already-resolved catalog.
///
/// One-shot convenience for callers that do not need batching or
/// persistence: classifies the meal name, builds a [`Selector`] with the
/// given thresholds, and returns the full [`MatchResult`].
pub fn match_meal(
    catalog: Arc<Catalog>,
    meal_name: &str,
    meal_embedding: &[f32],
    cfg: SelectorConfig,
) -> Result<MatchResult, SelectorError> {
    let meal_ref = MealRef {
        id: format!("adhoc-{meal_name}"),
        name: meal_name.to_string(),
    };
    let is_vegetarian = diet::detect_meal_vegetarian(meal_name, "");
    let selector = Selector::new(catalog, cfg)?;
    selector.select(&meal_ref, meal_embedding, is_vegetarian)
}

/// Run one full orchestrated invocation with the wall-clock budget taken
/// from the configuration.
pub async fn run_once<C, S, E>(
    orchestrator: &Orchestrator<C, S, E>,
    request: Option<RunRequest>,
) -> Result<RunReport, RunnerError>
where
    C: CatalogSource,
    S: MealStore,
    E: EmbeddingProvider,
{
    let budget = WallClockBudget::starting_now(orchestrator.config().time_budget());
    orchestrator.run(request, &budget).await
}
