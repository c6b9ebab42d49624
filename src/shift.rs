//! Next-token label shifting
//!
//! Causal LM training predicts token `n` from tokens `< n`, so the target
//! for position `i` is the label at position `i + 1`. Shifting drops the
//! first column and appends an ignore-sentinel column at the sequence end,
//! keeping the output the same shape as the input.

use ndarray::{s, Array2, ArrayView2};

/// Shift labels left by one position for next-token prediction
///
/// Position `i` of each output row holds the input label at `i + 1`; the
/// last column is filled with `ignore_index`. Pure transformation, no
/// side effects.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use perdida::shift_labels;
///
/// let labels = array![[1i64, 2, 3], [4, 5, 6]];
/// let shifted = shift_labels(labels.view(), -100);
/// assert_eq!(shifted, array![[2i64, 3, -100], [5, 6, -100]]);
/// ```
pub fn shift_labels(labels: ArrayView2<i64>, ignore_index: i64) -> Array2<i64> {
    let (rows, cols) = labels.dim();
    let mut shifted = Array2::from_elem((rows, cols), ignore_index);
    if cols > 1 {
        shifted
            .slice_mut(s![.., ..cols - 1])
            .assign(&labels.slice(s![.., 1..]));
    }
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn test_shift_two_by_three() {
        let labels = array![[1i64, 2, 3], [4, 5, 6]];
        let shifted = shift_labels(labels.view(), -100);
        assert_eq!(shifted, array![[2i64, 3, -100], [5, 6, -100]]);
    }

    #[test]
    fn test_shift_preserves_shape() {
        let labels = Array2::<i64>::zeros((3, 7));
        let shifted = shift_labels(labels.view(), -100);
        assert_eq!(shifted.dim(), (3, 7));
    }

    #[test]
    fn test_shift_single_column_all_ignored() {
        // A one-token sequence has no next token to predict.
        let labels = array![[9i64], [8]];
        let shifted = shift_labels(labels.view(), -100);
        assert_eq!(shifted, array![[-100i64], [-100]]);
    }

    #[test]
    fn test_shift_empty_sequence() {
        let labels = Array2::<i64>::zeros((2, 0));
        let shifted = shift_labels(labels.view(), -100);
        assert_eq!(shifted.dim(), (2, 0));
    }

    #[test]
    fn test_shift_custom_ignore_index() {
        let labels = array![[1i64, 2]];
        let shifted = shift_labels(labels.view(), -1);
        assert_eq!(shifted, array![[2i64, -1]]);
    }

    #[test]
    fn test_shift_keeps_ignored_positions() {
        // Ignore sentinels inside the sequence move with everything else.
        let labels = array![[1i64, -100, 3, 4]];
        let shifted = shift_labels(labels.view(), -100);
        assert_eq!(shifted, array![[-100i64, 3, 4, -100]]);
    }

    proptest! {
        #[test]
        fn prop_shift_structure(
            rows in 1usize..6,
            cols in 1usize..12,
            seed in 0i64..1000
        ) {
            let labels = Array2::from_shape_fn((rows, cols), |(i, j)| {
                seed + (i * cols + j) as i64
            });
            let shifted = shift_labels(labels.view(), -100);

            for i in 0..rows {
                for j in 0..cols - 1 {
                    prop_assert_eq!(shifted[[i, j]], labels[[i, j + 1]]);
                }
                prop_assert_eq!(shifted[[i, cols - 1]], -100);
            }
        }
    }
}
