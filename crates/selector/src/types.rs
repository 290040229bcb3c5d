use serde::{Deserialize, Serialize};
use similarity::SimilarityError;
use thiserror::Error;

/// Catalog entry as it appears on the wire: a JSON array of camelCase
/// records with precomputed embeddings. The vegetarian flag is optional
/// in the data; missing flags are resolved by the dietary classifier
/// when the catalog is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImageRecord {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub is_vegetarian: Option<bool>,
}

/// Resolved catalog entry. The vegetarian flag is authoritative for the
/// remainder of the run once set, and embeddings are immutable.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub name: String,
    pub url: String,
    pub description: String,
    pub embedding: Vec<f32>,
    pub is_vegetarian: bool,
}

impl ImageRecord {
    /// Resolve a raw record: a catalog-provided flag wins, otherwise the
    /// classifier decides from url + name + description.
    pub fn resolve(raw: RawImageRecord) -> Self {
        let is_vegetarian = raw
            .is_vegetarian
            .unwrap_or_else(|| diet::detect_image_vegetarian(&raw.url, &raw.name, &raw.description));
        Self {
            name: raw.name,
            url: raw.url,
            description: raw.description,
            embedding: raw.embedding,
            is_vegetarian,
        }
    }
}

/// Identity of the meal a result belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MealRef {
    pub id: String,
    pub name: String,
}

/// The image chosen for a meal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchedImage {
    pub name: String,
    pub url: String,
}

/// How the winning score was obtained.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    /// Embedding cosine similarity met its threshold.
    Cosine,
    /// No cosine match qualified; word-set overlap met its threshold.
    Text,
    /// Nothing qualified (or the catalog was empty after filtering).
    None,
    /// The meal failed before or during scoring; see `reason`.
    Error,
}

/// Outcome of matching one meal against the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub meal_ref: MealRef,
    pub matched_image: Option<MatchedImage>,
    pub cosine_score: f32,
    pub text_score: f32,
    pub method: MatchMethod,
    pub reason: String,
    pub meal_is_vegetarian: bool,
    pub image_is_vegetarian: Option<bool>,
}

impl MatchResult {
    /// Result for a meal that failed before a match decision could be
    /// made (embedding failure, catalog data integrity problem).
    pub fn failed(meal_ref: MealRef, meal_is_vegetarian: bool, message: impl Into<String>) -> Self {
        Self {
            meal_ref,
            matched_image: None,
            cosine_score: 0.0,
            text_score: 0.0,
            method: MatchMethod::Error,
            reason: message.into(),
            meal_is_vegetarian,
            image_is_vegetarian: None,
        }
    }
}

/// Thresholds for the two scoring paths.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SelectorConfig {
    /// Minimum qualifying cosine similarity, in [-1, 1].
    #[serde(default = "SelectorConfig::default_cosine_threshold")]
    pub cosine_threshold: f32,
    /// Minimum qualifying word-set overlap, in [0, 1].
    #[serde(default = "SelectorConfig::default_text_threshold")]
    pub text_threshold: f32,
}

impl SelectorConfig {
    pub(crate) fn default_cosine_threshold() -> f32 {
        0.2
    }

    pub(crate) fn default_text_threshold() -> f32 {
        0.2
    }

    pub fn validate(&self) -> Result<(), SelectorError> {
        if !(-1.0..=1.0).contains(&self.cosine_threshold) {
            return Err(SelectorError::InvalidConfig(
                "cosine_threshold must be within [-1.0, 1.0]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.text_threshold) {
            return Err(SelectorError::InvalidConfig(
                "text_threshold must be within [0.0, 1.0]".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            cosine_threshold: Self::default_cosine_threshold(),
            text_threshold: Self::default_text_threshold(),
        }
    }
}

/// Errors produced while selecting a match for a single meal.
#[derive(Debug, Error)]
pub enum SelectorError {
    /// Invalid selector configuration.
    #[error("invalid selector config: {0}")]
    InvalidConfig(String),
    /// Scoring failed; with the catalog immutable this means the meal
    /// embedding does not fit the catalog and only this meal fails.
    #[error("scoring error: {0}")]
    Similarity(#[from] SimilarityError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = SelectorConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.cosine_threshold, 0.2);
        assert_eq!(cfg.text_threshold, 0.2);
    }

    #[test]
    fn out_of_range_thresholds_rejected() {
        let cfg = SelectorConfig {
            cosine_threshold: 1.5,
            ..SelectorConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = SelectorConfig {
            text_threshold: -0.1,
            ..SelectorConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn resolve_prefers_catalog_provided_flag() {
        // The classifier would call this non-vegetarian; the catalog's
        // explicit flag must win.
        let raw = RawImageRecord {
            name: "Chicken Biryani".into(),
            url: "https://cdn.example.com/a.jpg".into(),
            description: String::new(),
            embedding: vec![1.0],
            is_vegetarian: Some(true),
        };
        assert!(ImageRecord::resolve(raw).is_vegetarian);
    }

    #[test]
    fn resolve_classifies_missing_flag_from_all_text_fields() {
        let raw = RawImageRecord {
            name: "House Special".into(),
            url: "https://cdn.example.com/img/butter-chicken.jpg".into(),
            description: String::new(),
            embedding: vec![1.0],
            is_vegetarian: None,
        };
        assert!(!ImageRecord::resolve(raw).is_vegetarian);
    }

    #[test]
    fn match_method_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&MatchMethod::Cosine).unwrap(),
            "\"cosine\""
        );
        assert_eq!(
            serde_json::to_string(&MatchMethod::None).unwrap(),
            "\"none\""
        );
    }

    #[test]
    fn match_result_wire_fields_are_camel_case() {
        let result = MatchResult::failed(
            MealRef {
                id: "m1".into(),
                name: "Dal Makhani".into(),
            },
            true,
            "embedding generation failed",
        );
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("mealRef").is_some());
        assert!(json.get("cosineScore").is_some());
        assert!(json.get("imageIsVegetarian").is_some());
        assert_eq!(json["method"], "error");
    }

    #[test]
    fn raw_record_parses_camel_case_with_optional_fields() {
        let raw: RawImageRecord = serde_json::from_str(
            r#"{"name":"Idli","url":"u","embedding":[0.1,0.2],"isVegetarian":true}"#,
        )
        .unwrap();
        assert_eq!(raw.description, "");
        assert_eq!(raw.is_vegetarian, Some(true));
    }
}
