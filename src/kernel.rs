//! The fused linear cross-entropy seam
//!
//! The projection-plus-cross-entropy primitive is an external collaborator:
//! an optimized backend computes the loss directly from hidden states
//! without materializing the full `(n, vocab)` logits tensor. This module
//! defines the trait that backends implement; the loss wrapper treats any
//! implementation as a correct black box.

use ndarray::{ArrayView1, ArrayView2};

use crate::error::Result;
use crate::reduction::Reduction;

/// A fused output-projection + cross-entropy backend
///
/// Computes `cross_entropy(hidden · weightᵀ, targets)` in a single
/// operation. Implementations own their numeric strategy; they must
/// document their internal accumulation precision, since the caller
/// performs no upcasting of its own.
pub trait FusedLinearCrossEntropy {
    /// Compute the loss from flattened activations
    ///
    /// - `hidden`: `(n, hidden_size)` per-token activations
    /// - `weight`: `(vocab_size, hidden_size)` output projection
    /// - `targets`: `(n,)` token ids, with `ignore_index` marking
    ///   positions excluded from the loss and from the mean denominator
    /// - `softcap`: when set, final logits are bounded via
    ///   `cap * tanh(x / cap)` before the cross-entropy
    ///
    /// Returns the reduced scalar loss. Shape mismatches between the
    /// operands are backend errors and propagate to the caller.
    fn forward(
        &self,
        hidden: ArrayView2<f32>,
        weight: ArrayView2<f32>,
        targets: ArrayView1<i64>,
        reduction: Reduction,
        ignore_index: i64,
        softcap: Option<f32>,
    ) -> Result<f32>;
}

impl<K: FusedLinearCrossEntropy + ?Sized> FusedLinearCrossEntropy for &K {
    fn forward(
        &self,
        hidden: ArrayView2<f32>,
        weight: ArrayView2<f32>,
        targets: ArrayView1<i64>,
        reduction: Reduction,
        ignore_index: i64,
        softcap: Option<f32>,
    ) -> Result<f32> {
        (**self).forward(hidden, weight, targets, reduction, ignore_index, softcap)
    }
}
