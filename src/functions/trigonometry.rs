use polexpr_macros::operation;

#[operation]
pub fn atan(a: f64) -> f64 {
    a.atan()
}

/// Angle of the point `(x, y)`; note the operand order is `y` first.
#[operation]
pub fn atan2(y: f64, x: f64) -> f64 {
    y.atan2(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn test_atan() {
        assert_eq!(atan(&[0.0]), 0.0);
        assert!((atan(&[1.0]) - FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_atan2_takes_y_before_x() {
        assert!((atan2(&[1.0, 0.0]) - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(atan2(&[0.0, 1.0]), 0.0);
    }
}
