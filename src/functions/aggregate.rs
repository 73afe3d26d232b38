//! Variadic kernels. None of them enforce an operand count: `min3` and
//! `max5` accept any number of operands, including none.

use polexpr_macros::operation;

/// Smallest operand, `+inf` when there are none. Any NaN operand wins.
#[operation]
pub fn min3(items: &[f64]) -> f64 {
    items.iter().fold(f64::INFINITY, |acc, &value| {
        if acc.is_nan() || value.is_nan() {
            f64::NAN
        } else {
            acc.min(value)
        }
    })
}

/// Largest operand, `-inf` when there are none. Any NaN operand wins.
#[operation]
pub fn max5(items: &[f64]) -> f64 {
    items.iter().fold(f64::NEG_INFINITY, |acc, &value| {
        if acc.is_nan() || value.is_nan() {
            f64::NAN
        } else {
            acc.max(value)
        }
    })
}

#[operation]
pub fn sum(items: &[f64]) -> f64 {
    items.iter().sum()
}

/// `sum / count`; zero operands give `0 / 0`, i.e. NaN.
#[operation]
pub fn avg(items: &[f64]) -> f64 {
    sum(items) / items.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_and_max_ignore_their_names() {
        assert_eq!(min3(&[4.0, -1.0]), -1.0);
        assert_eq!(min3(&[9.0, 3.0, 7.0, 1.0, 8.0]), 1.0);
        assert_eq!(max5(&[2.0]), 2.0);
        assert_eq!(max5(&[1.0, 5.0, 3.0]), 5.0);
    }

    #[test]
    fn test_empty_min_and_max() {
        assert_eq!(min3(&[]), f64::INFINITY);
        assert_eq!(max5(&[]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_nan_propagates_through_min_and_max() {
        assert!(min3(&[1.0, f64::NAN, 0.0]).is_nan());
        assert!(max5(&[f64::NAN, 2.0]).is_nan());
    }

    #[test]
    fn test_sum_and_avg() {
        assert_eq!(sum(&[]), 0.0);
        assert_eq!(sum(&[1.0, 2.0, 3.5]), 6.5);
        assert_eq!(avg(&[1.0, 2.0, 6.0]), 3.0);
        assert!(avg(&[]).is_nan());
    }
}
