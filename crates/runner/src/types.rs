use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use selector::{MatchMethod, MatchResult, MealRef};
use serde::{Deserialize, Serialize};

/// Source coordinates of a meal, carried through to persistence without
/// interpretation by the matching engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// A meal candidate as stored in the external meal store. The vegetarian
/// flag may have been decided by an earlier run; when absent the
/// orchestrator classifies the name once at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMeal {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_vegetarian: Option<bool>,
    #[serde(default)]
    pub provenance: Provenance,
}

/// Nested weekly meal-plan document (day → slot → meal name), the other
/// shape the meal store may hold. Store implementations flatten it into
/// [`StoredMeal`] records before handing meals to the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlanDoc {
    pub week: String,
    #[serde(default)]
    pub user: Option<String>,
    pub days: BTreeMap<String, BTreeMap<String, String>>,
}

impl WeeklyPlanDoc {
    /// Flatten into per-slot meals with stable ids and full provenance.
    pub fn flatten(&self) -> Vec<StoredMeal> {
        let mut meals = Vec::new();
        for (day, slots) in &self.days {
            for (slot, name) in slots {
                meals.push(StoredMeal {
                    id: format!("{}-{day}-{slot}", self.week),
                    name: name.clone(),
                    description: String::new(),
                    is_vegetarian: None,
                    provenance: Provenance {
                        day: Some(day.clone()),
                        slot: Some(slot.clone()),
                        week: Some(self.week.clone()),
                        user: self.user.clone(),
                    },
                });
            }
        }
        meals
    }
}

/// A fully resolved meal, ready for matching. The vegetarian flag is
/// computed once here and never recomputed downstream.
#[derive(Debug, Clone)]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_vegetarian: bool,
    pub provenance: Provenance,
}

impl Meal {
    pub fn from_stored(stored: StoredMeal) -> Self {
        let is_vegetarian = stored
            .is_vegetarian
            .unwrap_or_else(|| diet::detect_meal_vegetarian(&stored.name, &stored.description));
        Self {
            id: stored.id,
            name: stored.name,
            description: stored.description,
            is_vegetarian,
            provenance: stored.provenance,
        }
    }

    /// Synthetic meal for a caller-supplied name (request mode).
    pub fn synthetic(name: &str) -> Self {
        Self {
            id: format!("req-{}", uuid::Uuid::new_v4()),
            name: name.to_string(),
            description: String::new(),
            is_vegetarian: diet::detect_meal_vegetarian(name, ""),
            provenance: Provenance::default(),
        }
    }

    pub fn meal_ref(&self) -> MealRef {
        MealRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }

    /// Text handed to the embedding provider.
    pub fn embedding_text(&self) -> String {
        if self.description.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.description)
        }
    }
}

/// Parsed invocation payload. Present only when the body carried a
/// `mealNames` array; anything else (missing body, unparsable JSON, a
/// non-array field) silently means fetch mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    #[serde(default)]
    pub meal_names: Vec<String>,
}

impl RunRequest {
    pub fn parse(body: Option<&[u8]>) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_slice(body?).ok()?;
        let names = value.get("mealNames")?.clone();
        let meal_names: Vec<String> = serde_json::from_value(names).ok()?;
        Some(Self { meal_names })
    }
}

/// How the candidate meal list was obtained.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Fetch,
    Request,
}

/// Successful invocation response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub message: String,
    pub mode: RunMode,
    pub processed_count: usize,
    /// Fetch mode only: how many meals got an image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successful_mappings: Option<usize>,
    /// Request mode only: meal name → matched image url.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_image_mappings: Option<BTreeMap<String, String>>,
    pub execution_time_ms: u64,
    pub results: Vec<MatchResult>,
}

impl RunReport {
    /// Zero-processed response for an empty meal list.
    pub fn empty(mode: RunMode, message: impl Into<String>, elapsed: Duration) -> Self {
        let (successful_mappings, meal_image_mappings) = match mode {
            RunMode::Fetch => (Some(0), None),
            RunMode::Request => (None, Some(BTreeMap::new())),
        };
        Self {
            message: message.into(),
            mode,
            processed_count: 0,
            successful_mappings,
            meal_image_mappings,
            execution_time_ms: elapsed.as_millis() as u64,
            results: Vec::new(),
        }
    }
}

/// Fatal invocation response (5xx-equivalent).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport {
    pub error: String,
    pub mode: RunMode,
    pub processed_count: usize,
    pub execution_time_ms: u64,
}

impl FailureReport {
    pub fn new(error: impl ToString, mode: RunMode, elapsed: Duration) -> Self {
        Self {
            error: error.to_string(),
            mode,
            processed_count: 0,
            execution_time_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Persisted record for a successful mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealMapping {
    pub meal_id: String,
    pub meal_name: String,
    pub image_name: String,
    pub image_url: String,
    pub cosine_score: f32,
    pub text_score: f32,
    pub method: MatchMethod,
    pub reason: String,
    pub meal_is_vegetarian: bool,
    pub image_is_vegetarian: bool,
    pub matched_at: DateTime<Utc>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl MealMapping {
    /// Build the mapping document for a matched result. Returns `None`
    /// when the result carries no image.
    pub fn from_result(meal: &Meal, result: &MatchResult) -> Option<Self> {
        let image = result.matched_image.as_ref()?;
        Some(Self {
            meal_id: meal.id.clone(),
            meal_name: meal.name.clone(),
            image_name: image.name.clone(),
            image_url: image.url.clone(),
            cosine_score: result.cosine_score,
            text_score: result.text_score,
            method: result.method,
            reason: result.reason.clone(),
            meal_is_vegetarian: result.meal_is_vegetarian,
            image_is_vegetarian: result.image_is_vegetarian.unwrap_or(false),
            matched_at: Utc::now(),
            provenance: meal.provenance.clone(),
        })
    }
}

/// Persisted audit record for a meal that could not be mapped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedMapping {
    pub meal_id: String,
    pub meal_name: String,
    pub method: MatchMethod,
    pub reason: String,
    pub cosine_score: f32,
    pub text_score: f32,
    pub meal_is_vegetarian: bool,
    pub failed_at: DateTime<Utc>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl FailedMapping {
    pub fn from_result(meal: &Meal, result: &MatchResult) -> Self {
        Self {
            meal_id: meal.id.clone(),
            meal_name: meal.name.clone(),
            method: result.method,
            reason: result.reason.clone(),
            cosine_score: result.cosine_score,
            text_score: result.text_score,
            meal_is_vegetarian: result.meal_is_vegetarian,
            failed_at: Utc::now(),
            provenance: meal.provenance.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_returns_request_only_when_meal_names_present() {
        assert_eq!(RunRequest::parse(None), None);
        assert_eq!(RunRequest::parse(Some(b"")), None);
        assert_eq!(RunRequest::parse(Some(b"{}")), None);
        assert_eq!(RunRequest::parse(Some(b"not json at all")), None);
        // A non-array mealNames field is malformed input: fetch mode.
        assert_eq!(RunRequest::parse(Some(br#"{"mealNames":"Idli"}"#)), None);

        let req = RunRequest::parse(Some(br#"{"mealNames":[]}"#)).unwrap();
        assert!(req.meal_names.is_empty());

        let req = RunRequest::parse(Some(br#"{"mealNames":["Idli","Dosa"]}"#)).unwrap();
        assert_eq!(req.meal_names, vec!["Idli", "Dosa"]);
    }

    #[test]
    fn stored_meal_keeps_predecided_flag() {
        let stored = StoredMeal {
            id: "m1".into(),
            name: "Chicken Biryani".into(),
            description: String::new(),
            is_vegetarian: Some(true),
            provenance: Provenance::default(),
        };
        // Pre-decided flags are never recomputed, even when the
        // classifier would disagree.
        assert!(Meal::from_stored(stored).is_vegetarian);
    }

    #[test]
    fn stored_meal_without_flag_is_classified() {
        let stored = StoredMeal {
            id: "m2".into(),
            name: "Chicken Biryani".into(),
            description: String::new(),
            is_vegetarian: None,
            provenance: Provenance::default(),
        };
        assert!(!Meal::from_stored(stored).is_vegetarian);
    }

    #[test]
    fn synthetic_meals_get_unique_ids_and_fresh_flags() {
        let a = Meal::synthetic("Dal Makhani");
        let b = Meal::synthetic("Dal Makhani");
        assert_ne!(a.id, b.id);
        assert!(a.is_vegetarian);
        assert!(!Meal::synthetic("Chicken Biryani").is_vegetarian);
    }

    #[test]
    fn weekly_plan_flattens_with_provenance() {
        let mut slots = BTreeMap::new();
        slots.insert("lunch".to_string(), "Dal Makhani".to_string());
        slots.insert("dinner".to_string(), "Idli".to_string());
        let mut days = BTreeMap::new();
        days.insert("monday".to_string(), slots);

        let doc = WeeklyPlanDoc {
            week: "2024-w31".into(),
            user: Some("u1".into()),
            days,
        };
        let meals = doc.flatten();
        assert_eq!(meals.len(), 2);
        let lunch = meals.iter().find(|m| m.name == "Dal Makhani").unwrap();
        assert_eq!(lunch.id, "2024-w31-monday-lunch");
        assert_eq!(lunch.provenance.day.as_deref(), Some("monday"));
        assert_eq!(lunch.provenance.user.as_deref(), Some("u1"));
    }

    #[test]
    fn run_report_serializes_mode_specific_fields() {
        let report = RunReport::empty(RunMode::Fetch, "No unmapped meals found", Duration::ZERO);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "fetch");
        assert_eq!(json["successfulMappings"], 0);
        assert!(json.get("mealImageMappings").is_none());

        let report = RunReport::empty(
            RunMode::Request,
            "No meal names provided in request",
            Duration::ZERO,
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "request");
        assert!(json.get("successfulMappings").is_none());
        assert!(json["mealImageMappings"].as_object().unwrap().is_empty());
    }

    #[test]
    fn mapping_from_result_requires_an_image() {
        let meal = Meal::synthetic("Dal Makhani");
        let unmatched = MatchResult::failed(meal.meal_ref(), true, "embedding failed");
        assert!(MealMapping::from_result(&meal, &unmatched).is_none());

        let failed = FailedMapping::from_result(&meal, &unmatched);
        assert_eq!(failed.meal_name, "Dal Makhani");
        assert_eq!(failed.method, MatchMethod::Error);
    }
}
