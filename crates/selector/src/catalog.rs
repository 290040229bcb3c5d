//! Catalog loading and the per-process cache.
//!
//! The catalog is read from an injected [`CatalogSource`] at most once
//! per process and treated as read-only afterwards. A load failure is
//! always propagated to the caller; there is no silent fallback to an
//! empty catalog on any read path.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::types::{ImageRecord, RawImageRecord};

/// Errors raised while obtaining or parsing the catalog. All of them are
/// fatal to the invocation: without a catalog nothing can be matched.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog source failure: {0}")]
    Source(String),
}

/// Where raw catalog records come from. Implementations may be backed by
/// a blob store, a local file, or an in-memory fixture; the contract is
/// "returns a parseable record list, fails loudly if unavailable".
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawImageRecord>, CatalogError>;
}

/// The resolved, immutable image catalog plus its name lookup index.
#[derive(Debug)]
pub struct Catalog {
    images: Vec<ImageRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from raw records, resolving each vegetarian flag
    /// exactly once. Insertion order is preserved; on duplicate names the
    /// index keeps the first occurrence.
    pub fn resolve(raw: Vec<RawImageRecord>) -> Self {
        let images: Vec<ImageRecord> = raw.into_iter().map(ImageRecord::resolve).collect();
        let mut index = HashMap::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            index.entry(image.name.clone()).or_insert(i);
        }
        Self { images, index }
    }

    /// Parse a JSON array of records and resolve it into a catalog.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CatalogError> {
        let raw: Vec<RawImageRecord> = serde_json::from_slice(bytes)?;
        Ok(Self::resolve(raw))
    }

    /// All images, in catalog order.
    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    /// Look up an image by its display name.
    pub fn by_name(&self, name: &str) -> Option<&ImageRecord> {
        self.index.get(name).map(|&i| &self.images[i])
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Explicit load-if-absent cell around a [`CatalogSource`].
///
/// The first successful load wins and is shared for the process
/// lifetime; concurrent callers coalesce onto one fetch. A failed load
/// is not cached, so a later invocation may retry.
pub struct CatalogCache<S> {
    source: S,
    cell: OnceCell<Arc<Catalog>>,
}

impl<S: CatalogSource> CatalogCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
        }
    }

    pub async fn get_or_load(&self) -> Result<Arc<Catalog>, CatalogError> {
        let catalog = self
            .cell
            .get_or_try_init(|| async {
                let raw = self.source.fetch().await?;
                let catalog = Catalog::resolve(raw);
                tracing::info!(images = catalog.len(), "catalog loaded");
                Ok::<_, CatalogError>(Arc::new(catalog))
            })
            .await?;
        Ok(Arc::clone(catalog))
    }
}

/// Catalog source backed by a local JSON file.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<RawImageRecord>, CatalogError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// In-memory catalog source for tests and fixtures.
#[derive(Clone)]
pub struct StaticSource {
    records: Vec<RawImageRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<RawImageRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<RawImageRecord>, CatalogError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn raw(name: &str, veg: Option<bool>) -> RawImageRecord {
        RawImageRecord {
            name: name.into(),
            url: format!("https://cdn.example.com/{name}.jpg"),
            description: String::new(),
            embedding: vec![1.0, 0.0],
            is_vegetarian: veg,
        }
    }

    #[test]
    fn resolve_preserves_order_and_indexes_first_occurrence() {
        let catalog = Catalog::resolve(vec![
            raw("Idli", Some(true)),
            raw("Dosa", Some(true)),
            raw("Idli", Some(false)),
        ]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.images()[1].name, "Dosa");
        // Duplicate name: lookup resolves to the first record.
        assert!(catalog.by_name("Idli").unwrap().is_vegetarian);
    }

    #[test]
    fn from_json_slice_parses_array() {
        let catalog = Catalog::from_json_slice(
            br#"[{"name":"Idli","url":"u","embedding":[0.1],"isVegetarian":true}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.by_name("Idli").is_some());
    }

    #[test]
    fn from_json_slice_rejects_non_array() {
        let err = Catalog::from_json_slice(b"{\"not\":\"an array\"}").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    struct CountingSource {
        fetches: AtomicUsize,
        fail_first: bool,
    }

    #[async_trait]
    impl CatalogSource for &CountingSource {
        async fn fetch(&self) -> Result<Vec<RawImageRecord>, CatalogError> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && n == 0 {
                return Err(CatalogError::Source("blob store unavailable".into()));
            }
            Ok(vec![raw("Idli", Some(true))])
        }
    }

    #[tokio::test]
    async fn cache_loads_at_most_once() {
        let source = CountingSource {
            fetches: AtomicUsize::new(0),
            fail_first: false,
        };
        let cache = CatalogCache::new(&source);

        let a = cache.get_or_load().await.unwrap();
        let b = cache.get_or_load().await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cache_propagates_failure_and_allows_retry() {
        let source = CountingSource {
            fetches: AtomicUsize::new(0),
            fail_first: true,
        };
        let cache = CatalogCache::new(&source);

        let err = cache.get_or_load().await.unwrap_err();
        assert!(matches!(err, CatalogError::Source(_)));

        // The failure is not cached; the next invocation may succeed.
        let catalog = cache.get_or_load().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn json_file_source_round_trips() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"name":"Dosa","url":"u","embedding":[0.5,0.5]}]"#)
            .unwrap();

        let source = JsonFileSource::new(file.path());
        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Dosa");
    }

    #[tokio::test]
    async fn json_file_source_fails_loudly_when_missing() {
        let source = JsonFileSource::new("/nonexistent/catalog.json");
        assert!(matches!(
            source.fetch().await.unwrap_err(),
            CatalogError::Io(_)
        ));
    }
}
