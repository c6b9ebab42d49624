//! perdida — causal language model loss utilities
//!
//! This crate computes the training loss for autoregressive language
//! models:
//!
//! - [`shift_labels`] - next-token label shifting with an ignore sentinel
//! - [`Reduction`] - explicit mean/sum reduction selection
//! - [`CausalLMLossConfig`] - ignore index and final-logit softcapping
//! - [`FusedLinearCrossEntropy`] - the fused projection + cross-entropy
//!   backend seam
//! - [`ReferenceKernel`] - unfused CPU backend for tests and small runs
//! - [`CausalLMLoss`] - the per-forward-pass entry point
//!
//! The optimized fused kernel (single-pass matmul + softmax + cross-entropy
//! that never materializes the full logits tensor) is an external
//! collaborator reached through the [`FusedLinearCrossEntropy`] trait.
//!
//! # Example
//!
//! ```
//! use ndarray::{array, Array2, Array3};
//! use perdida::{CausalLMLoss, CausalLMLossConfig, ReferenceKernel};
//!
//! let config = CausalLMLossConfig::default();
//! let loss_fn = CausalLMLoss::with_config(ReferenceKernel, config).unwrap();
//!
//! let hidden = Array3::<f32>::zeros((2, 3, 4)); // (batch, seq, hidden)
//! let weight = Array2::<f32>::zeros((10, 4));   // (vocab, hidden)
//! let labels = array![[1i64, 2, 3], [4, 5, 6]];
//!
//! let loss = loss_fn
//!     .forward(hidden.view().into_dyn(), weight.view(), labels.view(), 4, None, None)
//!     .unwrap();
//! assert!(loss.is_finite());
//! ```

mod causal_lm;
mod config;
mod error;
mod kernel;
mod reduction;
mod reference;
mod shift;

pub use causal_lm::{fused_linear_cross_entropy, CausalLMLoss};
pub use config::{CausalLMLossConfig, DEFAULT_IGNORE_INDEX};
pub use error::{LossError, Result};
pub use kernel::FusedLinearCrossEntropy;
pub use reduction::Reduction;
pub use reference::ReferenceKernel;
pub use shift::shift_labels;
