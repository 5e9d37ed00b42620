use alloc::{format, vec, vec::Vec};

use crate::ConvError;

pub(crate) fn unsupported_rank(spatial_rank: usize) -> ConvError {
    ConvError::Configuration(format!(
        "unsupported rank {spatial_rank}, only 1, 2 and 3 spatial dimensions are supported"
    ))
}

pub(crate) fn checks_spatial_rank(spatial_rank: usize) -> Result<(), ConvError> {
    match spatial_rank {
        1..=3 => Ok(()),
        _ => Err(unsupported_rank(spatial_rank)),
    }
}

/// Broadcasts a single value to every spatial dimension; any other length must match the rank.
pub(crate) fn expand_tuple(
    name: &str,
    values: &[usize],
    spatial_rank: usize,
) -> Result<Vec<usize>, ConvError> {
    match values {
        [value] => Ok(vec![*value; spatial_rank]),
        values if values.len() == spatial_rank => Ok(values.to_vec()),
        values => Err(ConvError::Configuration(format!(
            "`{name}` has {} values, expected 1 or {spatial_rank}",
            values.len()
        ))),
    }
}

pub(crate) fn checks_nonzero(name: &str, values: &[usize]) -> Result<(), ConvError> {
    if values.contains(&0) {
        return Err(ConvError::Configuration(format!(
            "`{name}` must be non-zero, got {values:?}"
        )));
    }

    Ok(())
}

pub(crate) fn checks_channels_div_groups(
    channels_in: usize,
    channels_out: usize,
    groups: usize,
) -> Result<(), ConvError> {
    if channels_in % groups != 0 || channels_out % groups != 0 {
        return Err(ConvError::Configuration(format!(
            "Both channels must be divisible by the number of groups. Got \
             channels_in={channels_in}, channels_out={channels_out}, groups={groups}"
        )));
    }

    Ok(())
}

/// Number of elements spanned by `dims`, rejecting sizes that don't fit in a `usize`.
pub(crate) fn checks_size(name: &str, dims: &[usize]) -> Result<usize, ConvError> {
    dims.iter()
        .try_fold(1usize, |size, dim| size.checked_mul(*dim))
        .ok_or_else(|| {
            ConvError::Configuration(format!("`{name}` of dimensions {dims:?} overflows usize"))
        })
}

pub(crate) fn checks_output_padding(
    transposed: bool,
    output_padding: &[usize],
) -> Result<(), ConvError> {
    if !transposed && output_padding.iter().any(|pad| *pad != 0) {
        return Err(ConvError::Configuration(format!(
            "non-transposed layer cannot have output padding, got {output_padding:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tuple_broadcasts_single_value() {
        assert_eq!(expand_tuple("stride", &[2], 3).unwrap(), [2, 2, 2]);
        assert_eq!(expand_tuple("stride", &[2, 1], 2).unwrap(), [2, 1]);
    }

    #[test]
    fn expand_tuple_rejects_length_mismatch() {
        let result = expand_tuple("padding", &[1, 1], 3);

        assert!(matches!(result, Err(ConvError::Configuration(_))));
    }

    #[test]
    fn output_padding_requires_transposed() {
        assert!(checks_output_padding(false, &[0, 0]).is_ok());
        assert!(checks_output_padding(true, &[0, 1]).is_ok());
        assert!(matches!(
            checks_output_padding(false, &[0, 1]),
            Err(ConvError::Configuration(_))
        ));
    }

    #[test]
    fn groups_must_divide_both_channels() {
        assert!(checks_channels_div_groups(4, 8, 2).is_ok());
        assert!(checks_channels_div_groups(3, 8, 2).is_err());
        assert!(checks_channels_div_groups(4, 6, 4).is_err());
    }

    #[test]
    fn size_overflow_is_rejected() {
        assert_eq!(checks_size("weight", &[16, 3, 3, 3]).unwrap(), 432);
        assert!(matches!(
            checks_size("weight", &[usize::MAX / 2, 3]),
            Err(ConvError::Configuration(_))
        ));
    }

    #[test]
    fn spatial_rank_is_one_to_three() {
        assert!(checks_spatial_rank(0).is_err());
        assert!(checks_spatial_rank(1).is_ok());
        assert!(checks_spatial_rank(3).is_ok());
        assert!(checks_spatial_rank(4).is_err());
    }
}
