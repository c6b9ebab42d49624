//! Unfused reference backend
//!
//! A straightforward CPU implementation of [`FusedLinearCrossEntropy`]:
//! one projection and one numerically stable log-softmax per token row.
//! It materializes logits a row at a time, so it is suitable for tests
//! and small CPU runs, not as a replacement for an optimized fused
//! kernel.

use ndarray::{ArrayView1, ArrayView2};

use crate::error::{LossError, Result};
use crate::kernel::FusedLinearCrossEntropy;
use crate::reduction::Reduction;

/// Row-by-row projection + cross-entropy backend
///
/// Per valid token row: `logits = weight · hidden_row`, optional tanh
/// softcap, then `loss = logsumexp(logits) - logits[target]`. Losses are
/// accumulated in f64; the returned scalar is f32.
///
/// # Example
///
/// ```
/// use ndarray::{array, Array2};
/// use perdida::{FusedLinearCrossEntropy, Reduction, ReferenceKernel};
///
/// // Uniform logits over a 4-token vocabulary: loss is ln(4).
/// let hidden = Array2::<f32>::zeros((2, 3));
/// let weight = Array2::<f32>::zeros((4, 3));
/// let targets = array![0i64, 1];
///
/// let loss = ReferenceKernel
///     .forward(hidden.view(), weight.view(), targets.view(),
///              Reduction::Mean, -100, None)
///     .unwrap();
/// assert!((loss - 4.0f32.ln()).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceKernel;

impl FusedLinearCrossEntropy for ReferenceKernel {
    fn forward(
        &self,
        hidden: ArrayView2<f32>,
        weight: ArrayView2<f32>,
        targets: ArrayView1<i64>,
        reduction: Reduction,
        ignore_index: i64,
        softcap: Option<f32>,
    ) -> Result<f32> {
        let (n, hidden_size) = hidden.dim();
        let (vocab_size, weight_hidden) = weight.dim();

        if hidden_size != weight_hidden {
            return Err(LossError::DimensionMismatch {
                expected: format!("weight (vocab, {hidden_size})"),
                actual: format!("weight ({vocab_size}, {weight_hidden})"),
            });
        }
        if targets.len() != n {
            return Err(LossError::DimensionMismatch {
                expected: format!("{n} targets"),
                actual: format!("{} targets", targets.len()),
            });
        }

        let mut total = 0f64;
        let mut valid = 0usize;

        for (row, &label) in hidden.rows().into_iter().zip(targets.iter()) {
            if label == ignore_index {
                continue;
            }
            if label < 0 || label as usize >= vocab_size {
                return Err(LossError::LabelOutOfRange { label, vocab_size });
            }

            let mut logits = weight.dot(&row);
            if let Some(cap) = softcap {
                logits.mapv_inplace(|x| cap * (x / cap).tanh());
            }

            let max = logits.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
            let sum_exp: f64 = logits.iter().map(|&x| f64::from(x - max).exp()).sum();
            let lse = f64::from(max) + sum_exp.ln();

            total += lse - f64::from(logits[label as usize]);
            valid += 1;
        }

        match reduction {
            Reduction::Sum => Ok(total as f32),
            Reduction::Mean => {
                if valid == 0 {
                    // Every position ignored: nothing contributes.
                    Ok(0.0)
                } else {
                    Ok((total / valid as f64) as f32)
                }
            }
        }
    }
}
