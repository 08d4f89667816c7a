//! Fallible allocation of per-run scratch space.

use std::collections::TryReserveError;

/// Allocates a vector of `len` copies of `value`, reporting allocation failure.
pub(crate) fn try_filled<T: Clone>(value: T, len: usize) -> Result<Vec<T>, TryReserveError> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(len)?;
    vec.resize(len, value);
    Ok(vec)
}

/// Allocates an empty vector able to hold `capacity` elements without growing.
pub(crate) fn try_with_capacity<T>(capacity: usize) -> Result<Vec<T>, TryReserveError> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(capacity)?;
    Ok(vec)
}
