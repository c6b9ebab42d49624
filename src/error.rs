//! Loss computation errors

use thiserror::Error;

/// Result alias for loss computation
pub type Result<T> = std::result::Result<T, LossError>;

/// Errors surfaced by the causal LM loss pipeline
///
/// Shape violations are detected by the reshape step or by the fused
/// backend and propagate directly; there is no retry or recovery path.
#[derive(Error, Debug)]
pub enum LossError {
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("num_items_in_batch must be positive when supplied")]
    InvalidItemCount,

    #[error("Softcap must be finite and nonzero, got {0}")]
    InvalidSoftcap(f32),

    #[error("Label {label} out of range for vocabulary of size {vocab_size}")]
    LabelOutOfRange { label: i64, vocab_size: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = LossError::DimensionMismatch {
            expected: "(n, 8)".to_string(),
            actual: "(n, 4)".to_string(),
        };
        assert!(err.to_string().contains("expected (n, 8)"));

        let err = LossError::LabelOutOfRange {
            label: 32000,
            vocab_size: 32000,
        };
        assert!(err.to_string().contains("32000"));
    }

    #[test]
    fn test_shape_error_conversion() {
        use ndarray::Array1;

        let arr = Array1::<f32>::zeros(7);
        let result = arr.to_shape((2, 4)).map(|_| ());
        let err: LossError = result.unwrap_err().into();
        assert!(matches!(err, LossError::Shape(_)));
    }
}
