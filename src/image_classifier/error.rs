use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClassifyError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("classification cancelled")]
    Cancelled,
}

impl ClassifyError {
    pub fn shape_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        ClassifyError::ShapeMismatch {
            context: context.to_string(),
            expected,
            actual,
        }
    }
}
