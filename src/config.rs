//! Causal LM loss configuration

use serde::{Deserialize, Serialize};

use crate::error::{LossError, Result};

/// Sentinel label value excluded from loss and gradient computation
pub const DEFAULT_IGNORE_INDEX: i64 = -100;

/// Configuration for [`CausalLMLoss`](crate::CausalLMLoss)
///
/// Named, documented defaults instead of implicit call-site arguments:
///
/// | Field | Default | Meaning |
/// |-------|---------|---------|
/// | `ignore_index` | `-100` | labels equal to this value are skipped |
/// | `final_logit_softcapping` | `None` | tanh softcap on final logits (Gemma2-style) |
///
/// # Example
///
/// ```
/// use perdida::CausalLMLossConfig;
///
/// let config = CausalLMLossConfig::default().with_softcap(30.0);
/// assert_eq!(config.ignore_index, -100);
/// assert_eq!(config.final_logit_softcapping, Some(30.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CausalLMLossConfig {
    /// Labels with this value contribute neither to the loss nor to the
    /// mean denominator
    #[serde(default = "default_ignore_index")]
    pub ignore_index: i64,
    /// When set, each final logit `x` becomes `cap * tanh(x / cap)`,
    /// bounding extreme values before the cross-entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_logit_softcapping: Option<f32>,
}

fn default_ignore_index() -> i64 {
    DEFAULT_IGNORE_INDEX
}

impl Default for CausalLMLossConfig {
    fn default() -> Self {
        Self {
            ignore_index: DEFAULT_IGNORE_INDEX,
            final_logit_softcapping: None,
        }
    }
}

impl CausalLMLossConfig {
    /// Override the ignore sentinel
    pub fn with_ignore_index(mut self, ignore_index: i64) -> Self {
        self.ignore_index = ignore_index;
        self
    }

    /// Enable final-logit softcapping
    pub fn with_softcap(mut self, softcap: f32) -> Self {
        self.final_logit_softcapping = Some(softcap);
        self
    }

    /// Check that the softcap, when present, is usable as a divisor
    pub fn validate(&self) -> Result<()> {
        if let Some(cap) = self.final_logit_softcapping {
            if !cap.is_finite() || cap == 0.0 {
                return Err(LossError::InvalidSoftcap(cap));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CausalLMLossConfig::default();
        assert_eq!(config.ignore_index, -100);
        assert_eq!(config.final_logit_softcapping, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = CausalLMLossConfig::default()
            .with_ignore_index(-1)
            .with_softcap(50.0);
        assert_eq!(config.ignore_index, -1);
        assert_eq!(config.final_logit_softcapping, Some(50.0));
    }

    #[test]
    fn test_validate_rejects_zero_softcap() {
        let config = CausalLMLossConfig::default().with_softcap(0.0);
        assert!(matches!(
            config.validate(),
            Err(LossError::InvalidSoftcap(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_softcap() {
        let config = CausalLMLossConfig::default().with_softcap(f32::NAN);
        assert!(config.validate().is_err());

        let config = CausalLMLossConfig::default().with_softcap(f32::INFINITY);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_defaults_from_empty() {
        let config: CausalLMLossConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CausalLMLossConfig::default());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = CausalLMLossConfig::default().with_softcap(30.0);
        let json = serde_json::to_string(&config).unwrap();
        let back: CausalLMLossConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_serde_omits_absent_softcap() {
        let json = serde_json::to_string(&CausalLMLossConfig::default()).unwrap();
        assert!(!json.contains("final_logit_softcapping"));
    }
}
