use selector::{CatalogError, SelectorError};
use thiserror::Error;

use crate::traits::StoreError;

/// Fatal orchestration errors. Everything here fails the whole
/// invocation; per-meal problems never surface as a `RunnerError` but
/// become `method = "error"` results instead.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Invalid or unloadable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The image catalog could not be obtained or parsed.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The selector rejected its configuration.
    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),

    /// The meal store could not be listed. Append failures are not
    /// fatal and are only logged.
    #[error("meal store error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_identify_the_failing_collaborator() {
        let err = RunnerError::Config("batch_size must be >= 1".into());
        assert!(err.to_string().contains("configuration error"));

        let err: RunnerError = CatalogError::Source("blob store unavailable".into()).into();
        assert!(err.to_string().contains("catalog error"));

        let err: RunnerError = StoreError::Backend("query failed".into()).into();
        assert!(err.to_string().contains("meal store error"));
    }
}
