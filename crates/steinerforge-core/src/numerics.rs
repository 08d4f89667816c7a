//! Tolerant comparisons for edge costs and prizes.

/// Absolute tolerance below which two objective values are considered equal.
pub const EPSILON: f64 = 1e-9;

/// Returns `true` if `a` is smaller than `b` by more than [`EPSILON`].
///
/// ```
/// use steinerforge_core::numerics::is_less;
///
/// assert!(is_less(1.0, 2.0));
/// assert!(!is_less(1.0, 1.0 + 1e-12));
/// ```
#[inline]
pub fn is_less(a: f64, b: f64) -> bool {
    a - b < -EPSILON
}

/// Returns `true` if `a` is negative beyond [`EPSILON`].
#[inline]
pub fn is_negative(a: f64) -> bool {
    a < -EPSILON
}
