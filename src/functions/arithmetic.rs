use polexpr_macros::operation;

#[operation]
pub fn add(a: f64, b: f64) -> f64 {
    a + b
}

#[operation]
pub fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

#[operation]
pub fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// IEEE division: a zero divisor yields an infinity or NaN, never an error.
#[operation]
pub fn divide(a: f64, b: f64) -> f64 {
    a / b
}

#[operation]
pub fn negate(a: f64) -> f64 {
    -a
}
