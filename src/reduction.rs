//! Reduction modes for combining per-token losses

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy for combining per-token losses into a scalar
///
/// - [`Reduction::Mean`]: divide the summed loss by the count of
///   non-ignored tokens.
/// - [`Reduction::Sum`]: return the raw total, for callers that normalize
///   externally (e.g. gradient accumulation over several forward passes).
///
/// # Example
///
/// ```
/// use perdida::Reduction;
///
/// assert_eq!(Reduction::default(), Reduction::Mean);
/// assert_eq!(format!("{}", Reduction::Sum), "sum");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    /// Sum of per-token losses divided by the number of non-ignored tokens
    #[default]
    Mean,
    /// Raw sum of per-token losses
    Sum,
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reduction::Mean => write!(f, "mean"),
            Reduction::Sum => write!(f, "sum"),
        }
    }
}
