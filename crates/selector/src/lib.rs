//! Match selection over a fixed catalog of precomputed image embeddings.
//!
//! The catalog is loaded at most once per process through an injected
//! [`CatalogSource`] and scanned linearly per meal. Selection applies the
//! hard vegetarian filter first, then scores each surviving image with
//! both similarity signals and keeps the best candidate under the
//! cosine-over-text priority rule.

mod catalog;
mod engine;
mod types;

pub use catalog::{Catalog, CatalogCache, CatalogError, CatalogSource, JsonFileSource, StaticSource};
pub use engine::Selector;
pub use types::{
    ImageRecord, MatchMethod, MatchResult, MatchedImage, MealRef, RawImageRecord, SelectorConfig,
    SelectorError,
};
