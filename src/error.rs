use thiserror::Error;

/// Convenience result type for fallible operations around the inference engine.
pub type InferenceResult<T> = Result<T, InferenceError>;

/// Error type returned by dataset construction, tag parsing and engine setup.
///
/// Inference itself never fails: a column that no detector accepts is reported as
/// [`crate::types::TypeTag::Object`]. These variants cover the preconditions a caller is
/// responsible for.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Two columns in the same dataset share a name.
    #[error("duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    /// A column does not have the same number of rows as the first column.
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A type tag string is not part of the supported vocabulary.
    #[error("unknown type tag '{tag}'")]
    UnknownTypeTag { tag: String },

    /// Engine options failed validation.
    #[error("invalid inference options: {message}")]
    InvalidOptions { message: String },

    /// The worker pool could not be built.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Options could not be decoded from JSON.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}
