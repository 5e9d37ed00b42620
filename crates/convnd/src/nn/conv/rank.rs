use crate::backend::{Backend, FloatTensor};
use crate::{ConvError, ShapeError};

/// Axis appended to one dimensional inputs and weights so that they can run through the two
/// dimensional kernels.
pub const WIDENED_AXIS: usize = 3;

/// Inserts an axis of size one at `axis`.
///
/// This is a compatibility shim for one dimensional convolutions: backends only provide two and
/// three dimensional kernels, so `[batch, channels, length]` inputs are executed as
/// `[batch, channels, length, 1]`.
pub fn widen_rank<B: Backend>(tensor: FloatTensor<B>, axis: usize) -> FloatTensor<B> {
    B::float_unsqueeze_dim(tensor, axis)
}

/// Removes the axis of size one at `axis`, undoing [widen_rank].
pub fn narrow_rank<B: Backend>(
    tensor: FloatTensor<B>,
    axis: usize,
) -> Result<FloatTensor<B>, ConvError> {
    let shape = B::float_shape(&tensor);

    match shape.dims.get(axis) {
        Some(1) => Ok(B::float_squeeze_dim(tensor, axis)),
        _ => Err(ShapeError::NarrowAxis {
            axis,
            dims: shape.dims,
        }
        .into()),
    }
}

/// Copies `values` into a fixed size array, filling the trailing dimensions with `neutral`.
pub(crate) fn extend_tuple<const N: usize>(values: &[usize], neutral: usize) -> [usize; N] {
    let mut output = [neutral; N];

    for (out, value) in output.iter_mut().zip(values) {
        *out = *value;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::FloatTensorOps;
    use crate::test_backend::tensor;
    use crate::TestBackend;

    #[test]
    fn widen_appends_trailing_axis() {
        let widened = widen_rank::<TestBackend>(tensor(&[4, 3, 100]), WIDENED_AXIS);

        assert_eq!(TestBackend::float_shape(&widened).dims, [4, 3, 100, 1]);
    }

    #[test]
    fn narrow_undoes_widen() {
        let widened = widen_rank::<TestBackend>(tensor(&[4, 3, 100]), WIDENED_AXIS);
        let narrowed = narrow_rank::<TestBackend>(widened, WIDENED_AXIS).unwrap();

        assert_eq!(TestBackend::float_shape(&narrowed).dims, [4, 3, 100]);
    }

    #[test]
    fn narrow_rejects_axis_larger_than_one() {
        let result = narrow_rank::<TestBackend>(tensor(&[4, 3, 100, 2]), WIDENED_AXIS);

        assert_eq!(
            result.unwrap_err(),
            ConvError::Shape(ShapeError::NarrowAxis {
                axis: 3,
                dims: [4, 3, 100, 2].into(),
            })
        );
    }

    #[test]
    fn narrow_rejects_missing_axis() {
        let result = narrow_rank::<TestBackend>(tensor(&[4, 3, 100]), WIDENED_AXIS);

        assert!(matches!(
            result,
            Err(ConvError::Shape(ShapeError::NarrowAxis { axis: 3, .. }))
        ));
    }

    #[test]
    fn extend_tuple_fills_neutral_values() {
        assert_eq!(extend_tuple::<2>(&[5], 1), [5, 1]);
        assert_eq!(extend_tuple::<3>(&[1, 2, 3], 0), [1, 2, 3]);
    }
}
