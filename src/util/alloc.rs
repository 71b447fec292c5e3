use crate::error::RuntimeError;

/// Creates an empty vector able to hold `capacity` elements.
///
/// ## Errors
/// Returns `RuntimeError::AllocationFailed` if the memory cannot be reserved.
///
/// ## Example
/// ```
/// use grol::util::alloc::vec_with_capacity;
///
/// let v: Vec<i64> = vec_with_capacity(16).unwrap();
/// assert!(v.capacity() >= 16);
///
/// assert!(vec_with_capacity::<i64>(usize::MAX).is_err());
/// ```
pub fn vec_with_capacity<T>(capacity: usize) -> Result<Vec<T>, RuntimeError> {
    let mut v = Vec::new();
    v.try_reserve_exact(capacity)
     .map_err(|_| RuntimeError::AllocationFailed { requested: capacity })?;
    Ok(v)
}

/// Concatenates two slices into a new vector.
///
/// ## Errors
/// Returns `RuntimeError::AllocationFailed` if the combined length cannot be
/// allocated.
pub fn concat<T: Clone>(left: &[T], right: &[T]) -> Result<Vec<T>, RuntimeError> {
    let requested = left.len()
                        .checked_add(right.len())
                        .ok_or(RuntimeError::AllocationFailed { requested: usize::MAX })?;
    let mut v = vec_with_capacity(requested)?;
    v.extend_from_slice(left);
    v.extend_from_slice(right);
    Ok(v)
}
