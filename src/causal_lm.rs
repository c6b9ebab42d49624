//! Causal LM loss wrapper
//!
//! The forward-pass entry point for language-model training:
//!
//! - shifts labels for next-token prediction (unless the caller already did)
//! - flattens `(batch, seq, hidden)` activations to `(n, hidden)` and labels
//!   to `(n,)`
//! - selects the reduction (sum when a batch item count is supplied, mean
//!   otherwise) and normalizes a summed loss by that count
//! - delegates the numeric work to a [`FusedLinearCrossEntropy`] backend
//!
//! Stateless; one synchronous call per forward pass.

use ndarray::{ArrayView1, ArrayView2, ArrayViewD, Order};

use crate::config::CausalLMLossConfig;
use crate::error::{LossError, Result};
use crate::kernel::FusedLinearCrossEntropy;
use crate::reduction::Reduction;
use crate::shift::shift_labels;

/// Select a reduction, invoke the backend, and normalize a summed loss
///
/// `num_items_in_batch = Some(k)` switches the backend to
/// [`Reduction::Sum`] and divides the returned total by `k`. This keeps
/// the loss scale correct when gradients are accumulated over several
/// forward passes before an optimizer step: each sub-batch contributes
/// `sum / total_items`, and the contributions add up to the full-batch
/// mean. With `None` the backend reduces with [`Reduction::Mean`] and the
/// result is returned untouched.
pub fn fused_linear_cross_entropy<K: FusedLinearCrossEntropy>(
    kernel: &K,
    hidden: ArrayView2<f32>,
    weight: ArrayView2<f32>,
    targets: ArrayView1<i64>,
    num_items_in_batch: Option<usize>,
    ignore_index: i64,
    softcap: Option<f32>,
) -> Result<f32> {
    let reduction = match num_items_in_batch {
        Some(0) => return Err(LossError::InvalidItemCount),
        Some(_) => Reduction::Sum,
        None => Reduction::Mean,
    };

    let loss = kernel.forward(hidden, weight, targets, reduction, ignore_index, softcap)?;

    match num_items_in_batch {
        Some(k) => Ok(loss / k as f32),
        None => Ok(loss),
    }
}

/// Causal language model loss
///
/// Owns a fused backend and a [`CausalLMLossConfig`]; called once per
/// training step by the surrounding model.
///
/// # Example
///
/// ```
/// use ndarray::{array, Array2, Array3};
/// use perdida::{CausalLMLoss, ReferenceKernel};
///
/// let loss_fn = CausalLMLoss::new(ReferenceKernel);
///
/// let hidden = Array3::<f32>::zeros((1, 3, 4)); // (batch, seq, hidden)
/// let weight = Array2::<f32>::zeros((7, 4));    // (vocab, hidden)
/// let labels = array![[1i64, 2, 3]];
///
/// let loss = loss_fn
///     .forward(hidden.view().into_dyn(), weight.view(), labels.view(), 4, None, None)
///     .unwrap();
/// // Uniform logits over 7 tokens.
/// assert!((loss - 7.0f32.ln()).abs() < 1e-6);
/// ```
pub struct CausalLMLoss<K> {
    kernel: K,
    config: CausalLMLossConfig,
}

impl<K: FusedLinearCrossEntropy> CausalLMLoss<K> {
    /// Create with the default configuration (ignore index -100, no softcap)
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            config: CausalLMLossConfig::default(),
        }
    }

    /// Create with an explicit configuration
    ///
    /// Fails with [`LossError::InvalidSoftcap`] when the configured softcap
    /// is zero or not finite.
    pub fn with_config(kernel: K, config: CausalLMLossConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { kernel, config })
    }

    /// The active configuration
    pub fn config(&self) -> &CausalLMLossConfig {
        &self.config
    }

    /// Compute the training loss for one forward pass
    ///
    /// - `hidden_states`: activations with any leading shape and trailing
    ///   `hidden_size` elements per token; flattened to `(n, hidden_size)`
    /// - `lm_head_weight`: `(vocab, hidden_size)` output projection
    /// - `labels`: `(batch, seq)` token ids; shifted here unless
    ///   `shift_labels` is supplied, in which case `labels` is unused and
    ///   the pre-shifted targets are trusted verbatim
    /// - `num_items_in_batch`: when `Some(k)`, the backend sums and the
    ///   result is divided by `k` (gradient-accumulation normalization)
    ///
    /// Shape violations surface as [`LossError::Shape`] from the flatten
    /// step or as backend errors; no other validation is performed here.
    pub fn forward(
        &self,
        hidden_states: ArrayViewD<f32>,
        lm_head_weight: ArrayView2<f32>,
        labels: ArrayView2<i64>,
        hidden_size: usize,
        num_items_in_batch: Option<usize>,
        shift_labels_in: Option<ArrayView2<i64>>,
    ) -> Result<f32> {
        if hidden_size == 0 {
            return Err(LossError::DimensionMismatch {
                expected: "hidden_size > 0".to_string(),
                actual: "hidden_size = 0".to_string(),
            });
        }

        let shifted_owned;
        let shifted = match &shift_labels_in {
            Some(pre_shifted) => pre_shifted.view(),
            None => {
                shifted_owned = shift_labels(labels, self.config.ignore_index);
                shifted_owned.view()
            }
        };

        // Row-major flattening preserves the row/label correspondence and
        // materializes both operands contiguously, so the backend sees one
        // shared memory discipline (the device-colocation step of the
        // parallel-training setting).
        let n = hidden_states.len() / hidden_size;
        let hidden2d = hidden_states.to_shape(((n, hidden_size), Order::RowMajor))?;
        let targets = shifted.to_shape((n, Order::RowMajor))?;

        fused_linear_cross_entropy(
            &self.kernel,
            hidden2d.view(),
            lm_head_weight,
            targets.view(),
            num_items_in_batch,
            self.config.ignore_index,
            self.config.final_logit_softcapping,
        )
    }
}
