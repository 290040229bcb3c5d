//! End-to-end batch orchestration.
//!
//! One invocation walks `LOAD_CATALOG → RESOLVE_MEALS → (PROCESS_BATCH →
//! PERSIST)* → DONE | TIMEOUT_STOP`. Catalog and store-listing failures
//! are fatal; everything that goes wrong for a single meal is recorded
//! as a `method = "error"` result and processing continues. Persistence
//! happens after every batch so partial progress survives an early stop.

use std::time::Instant;

use selector::{CatalogCache, CatalogSource, MatchResult, Selector};

use crate::config::RunnerConfig;
use crate::error::RunnerError;
use crate::traits::{EmbeddingProvider, MealStore, RunBudget};
use crate::types::{FailedMapping, Meal, MealMapping, RunMode, RunReport, RunRequest};

pub struct Orchestrator<C, S, E> {
    catalog: CatalogCache<C>,
    store: S,
    embedder: E,
    cfg: RunnerConfig,
}

impl<C, S, E> Orchestrator<C, S, E>
where
    C: CatalogSource,
    S: MealStore,
    E: EmbeddingProvider,
{
    pub fn new(
        catalog_source: C,
        store: S,
        embedder: E,
        cfg: RunnerConfig,
    ) -> Result<Self, RunnerError> {
        cfg.validate()?;
        Ok(Self {
            catalog: CatalogCache::new(catalog_source),
            store,
            embedder,
            cfg,
        })
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.cfg
    }

    /// Run one invocation. `request` is the parsed payload (request
    /// mode) or `None` (fetch mode); `budget` is the remaining
    /// wall-clock execution budget.
    pub async fn run(
        &self,
        request: Option<RunRequest>,
        budget: &dyn RunBudget,
    ) -> Result<RunReport, RunnerError> {
        let started = Instant::now();

        let catalog = self.catalog.get_or_load().await?;
        let selector = Selector::new(catalog, self.cfg.selector_config())?;

        let mode = if request.is_some() {
            RunMode::Request
        } else {
            RunMode::Fetch
        };
        let meals = self.resolve_meals(request).await?;

        if meals.is_empty() {
            let message = match mode {
                RunMode::Request => "No meal names provided in request",
                RunMode::Fetch => "No unmapped meals found",
            };
            tracing::info!(?mode, "{message}");
            return Ok(RunReport::empty(mode, message, started.elapsed()));
        }

        let mut results: Vec<MatchResult> = Vec::with_capacity(meals.len());
        let mut processed = 0;
        let mut timed_out = false;

        while processed < meals.len() {
            let remaining = budget.remaining();
            if remaining <= self.cfg.safety_buffer() {
                tracing::warn!(
                    processed,
                    total = meals.len(),
                    remaining_secs = remaining.as_secs(),
                    "stopping before the next batch: execution budget nearly exhausted"
                );
                timed_out = true;
                break;
            }

            let end = (processed + self.cfg.batch_size).min(meals.len());
            let batch = &meals[processed..end];
            let batch_results = self.process_batch(&selector, batch).await;
            self.persist_batch(batch, &batch_results).await;

            processed = end;
            results.extend(batch_results);
        }

        let successful = results
            .iter()
            .filter(|r| r.matched_image.is_some())
            .count();
        let (successful_mappings, meal_image_mappings) = match mode {
            RunMode::Fetch => (Some(successful), None),
            RunMode::Request => (
                None,
                Some(
                    results
                        .iter()
                        .filter_map(|r| {
                            r.matched_image
                                .as_ref()
                                .map(|img| (r.meal_ref.name.clone(), img.url.clone()))
                        })
                        .collect(),
                ),
            ),
        };

        let message = if timed_out {
            format!(
                "Processed {processed} of {} meals before the time budget ran out",
                meals.len()
            )
        } else {
            format!("Processed {processed} meals")
        };
        tracing::info!(?mode, processed, successful, "{message}");

        Ok(RunReport {
            message,
            mode,
            processed_count: processed,
            successful_mappings,
            meal_image_mappings,
            execution_time_ms: started.elapsed().as_millis() as u64,
            results,
        })
    }

    /// Resolve the candidate meal list for this invocation.
    ///
    /// Request mode turns each supplied name into a synthetic meal.
    /// Fetch mode pulls meal documents from the store and drops names
    /// that already have a persisted mapping.
    async fn resolve_meals(&self, request: Option<RunRequest>) -> Result<Vec<Meal>, RunnerError> {
        match request {
            Some(req) => Ok(req
                .meal_names
                .iter()
                .map(|name| Meal::synthetic(name))
                .collect()),
            None => {
                let mapped = self.store.list_mapped_names().await?;
                let meals = self
                    .store
                    .list_meals()
                    .await?
                    .into_iter()
                    .filter(|m| !mapped.contains(&m.name))
                    .map(Meal::from_stored)
                    .collect();
                Ok(meals)
            }
        }
    }

    /// Match every meal in the batch, sequentially. A per-meal embedding
    /// or scoring failure becomes an error result, never an abort.
    async fn process_batch(&self, selector: &Selector, batch: &[Meal]) -> Vec<MatchResult> {
        let mut batch_results = Vec::with_capacity(batch.len());
        for meal in batch {
            let result = match self.embedder.embed(&meal.embedding_text()).await {
                Ok(embedding) => {
                    match selector.select(&meal.meal_ref(), &embedding, meal.is_vegetarian) {
                        Ok(result) => result,
                        Err(err) => {
                            tracing::warn!(meal = %meal.name, %err, "scoring failed for meal");
                            MatchResult::failed(meal.meal_ref(), meal.is_vegetarian, err.to_string())
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(meal = %meal.name, %err, "embedding generation failed");
                    MatchResult::failed(meal.meal_ref(), meal.is_vegetarian, err.to_string())
                }
            };
            batch_results.push(result);
        }
        batch_results
    }

    /// Checkpoint one batch: mapped results into the mapping store,
    /// unmapped ones into the failure/audit store. Append failures are
    /// logged and skipped; the meal is simply re-discovered next run.
    async fn persist_batch(&self, batch: &[Meal], batch_results: &[MatchResult]) {
        for (meal, result) in batch.iter().zip(batch_results) {
            match MealMapping::from_result(meal, result) {
                Some(mapping) => {
                    if let Err(err) = self.store.append_mapping(&mapping).await {
                        tracing::warn!(meal = %meal.name, %err, "failed to persist mapping");
                    }
                }
                None => {
                    let failed = FailedMapping::from_result(meal, result);
                    if let Err(err) = self.store.append_failed(&failed).await {
                        tracing::warn!(meal = %meal.name, %err, "failed to persist audit record");
                    }
                }
            }
        }
    }
}
