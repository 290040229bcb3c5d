//! Single-pass best-image selection.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::types::{
    MatchMethod, MatchResult, MatchedImage, MealRef, SelectorConfig, SelectorError,
};

/// Selects the best catalog image for one meal.
///
/// Cosine matches strictly dominate text matches: a qualifying cosine
/// score replaces any text match, while a text match is only retained
/// as long as no cosine match has qualified. Within a method, a later
/// image wins only with a strictly higher score, so catalog order
/// breaks ties in favor of the earlier image.
pub struct Selector {
    catalog: Arc<Catalog>,
    cfg: SelectorConfig,
}

struct Candidate {
    index: usize,
    method: MatchMethod,
    cosine: f32,
    text: f32,
}

impl Selector {
    pub fn new(catalog: Arc<Catalog>, cfg: SelectorConfig) -> Result<Self, SelectorError> {
        cfg.validate()?;
        Ok(Self { catalog, cfg })
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.cfg
    }

    /// Scan the catalog once and return the best match for the meal, or
    /// a `none` result if nothing qualifies.
    ///
    /// A vegetarian meal never sees a non-vegetarian image: such images
    /// are skipped before scoring, regardless of similarity. An
    /// embedding length mismatch aborts only this meal.
    pub fn select(
        &self,
        meal_ref: &MealRef,
        meal_embedding: &[f32],
        meal_is_vegetarian: bool,
    ) -> Result<MatchResult, SelectorError> {
        let mut best: Option<Candidate> = None;
        let mut top_cosine_seen: Option<f32> = None;
        let mut top_text_seen: Option<f32> = None;

        for (index, image) in self.catalog.images().iter().enumerate() {
            // Hard dietary filter: never an eligible candidate.
            if meal_is_vegetarian && !image.is_vegetarian {
                continue;
            }

            let cosine = similarity::cosine(meal_embedding, &image.embedding)?;
            let text = similarity::text_overlap(&meal_ref.name, &image.name);

            // Best raw scores are tracked unconditionally so a failed
            // match can still report how close the catalog came.
            top_cosine_seen = Some(top_cosine_seen.map_or(cosine, |s| s.max(cosine)));
            top_text_seen = Some(top_text_seen.map_or(text, |s| s.max(text)));

            let candidate = Candidate {
                index,
                method: MatchMethod::Cosine,
                cosine,
                text,
            };

            match &best {
                Some(b) if b.method == MatchMethod::Cosine => {
                    if cosine >= self.cfg.cosine_threshold && cosine > b.cosine {
                        best = Some(candidate);
                    }
                }
                _ => {
                    if cosine >= self.cfg.cosine_threshold {
                        // First qualifying cosine match: takes over from
                        // any text match found so far.
                        best = Some(candidate);
                    } else if text >= self.cfg.text_threshold
                        && best.as_ref().is_none_or(|b| text > b.text)
                    {
                        best = Some(Candidate {
                            method: MatchMethod::Text,
                            ..candidate
                        });
                    }
                }
            }
        }

        Ok(match best {
            Some(b) => {
                let image = &self.catalog.images()[b.index];
                let reason = match b.method {
                    MatchMethod::Cosine => format!(
                        "Cosine similarity {:.3} >= {}",
                        b.cosine, self.cfg.cosine_threshold
                    ),
                    _ => format!(
                        "Text similarity {:.3} >= {}",
                        b.text, self.cfg.text_threshold
                    ),
                };
                MatchResult {
                    meal_ref: meal_ref.clone(),
                    matched_image: Some(MatchedImage {
                        name: image.name.clone(),
                        url: image.url.clone(),
                    }),
                    cosine_score: b.cosine,
                    text_score: b.text,
                    method: b.method,
                    reason,
                    meal_is_vegetarian,
                    image_is_vegetarian: Some(image.is_vegetarian),
                }
            }
            None => MatchResult {
                meal_ref: meal_ref.clone(),
                matched_image: None,
                cosine_score: top_cosine_seen.unwrap_or(0.0),
                text_score: top_text_seen.unwrap_or(0.0),
                method: MatchMethod::None,
                reason: "No suitable match found".into(),
                meal_is_vegetarian,
                image_is_vegetarian: None,
            },
        })
    }
}
