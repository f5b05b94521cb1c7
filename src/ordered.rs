//! Binary-search insertion into an already sorted `Vec`.
//!
//! The solver keeps a priority-ordered frontier sorted incrementally with these
//! functions instead of re-sorting it after every expansion. The search narrows a
//! half-open window `[lower, upper)` by comparing against its midpoint until one
//! boundary is left, then inserts before or after that element.
//!
//! A value equal to the compared element is inserted before it, so a new
//! duplicate lands directly in front of the existing run of equal values and the
//! relative order of that run is untouched.
use thiserror::Error;

/// Errors returned by the insertion functions.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// The target sequence is empty, so there is no element to compare against.
    /// Callers push the first element themselves.
    #[error("cannot binary-insert into an empty container")]
    EmptyContainer,
    /// The requested window is not `lower <= upper <= len` with `lower < len`.
    #[error("search window [{lower}, {upper}) is out of bounds for length {len}")]
    WindowOutOfBounds {
        lower: usize,
        upper: usize,
        len: usize,
    },
}

/// Inserts `value` into the ascending `items`, keeping it sorted.
///
/// # Returns
/// The index `value` was inserted at, or `InsertError::EmptyContainer` if `items` is empty.
///
/// # Examples
/// ```
/// use slide_solver::ordered::binary_insert;
/// let mut items = vec![12, 24, 48];
/// assert_eq!(binary_insert(16, &mut items), Ok(1));
/// assert_eq!(items, vec![12, 16, 24, 48]);
/// ```
pub fn binary_insert<T: PartialOrd>(value: T, items: &mut Vec<T>) -> Result<usize, InsertError> {
    binary_insert_in(value, items, None, None)
}

/// Inserts `value` into `items`, searching only the window `[lower, upper)`.
///
/// `lower` defaults to `0` and `upper` to `items.len()`. Narrowing the window is
/// only meaningful when the caller already knows `value` belongs inside it.
///
/// # Examples
/// ```
/// use slide_solver::ordered::binary_insert_in;
/// let mut items = vec![12, 16, 24, 48];
/// binary_insert_in(30, &mut items, Some(1), None).unwrap();
/// assert_eq!(items, vec![12, 16, 24, 30, 48]);
/// ```
pub fn binary_insert_in<T: PartialOrd>(
    value: T,
    items: &mut Vec<T>,
    lower: Option<usize>,
    upper: Option<usize>,
) -> Result<usize, InsertError> {
    let (lower, upper) = window(items.len(), lower, upper)?;
    let loc = insertion_point(items, lower, upper, |elem| value <= *elem);
    items.insert(loc, value);
    Ok(loc)
}

/// Inserts `value` into `items`, which must be sorted ascending by `key`.
///
/// The key of `value` is computed once; the key of each compared element is
/// computed on demand.
pub fn binary_insert_by_key<T, K, F>(value: T, items: &mut Vec<T>, key: F) -> Result<usize, InsertError>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    let (lower, upper) = window(items.len(), None, None)?;
    let value_key = key(&value);
    let loc = insertion_point(items, lower, upper, |elem| value_key <= key(elem));
    items.insert(loc, value);
    Ok(loc)
}

fn window(len: usize, lower: Option<usize>, upper: Option<usize>) -> Result<(usize, usize), InsertError> {
    if len == 0 {
        return Err(InsertError::EmptyContainer);
    }
    let lower = lower.unwrap_or(0);
    let upper = upper.unwrap_or(len);
    if lower > upper || upper > len || lower >= len {
        return Err(InsertError::WindowOutOfBounds { lower, upper, len });
    }
    Ok((lower, upper))
}

/// Halves `[lower, upper)` until a single boundary is left. `goes_before(elem)`
/// is true when the new value belongs in front of `elem`.
fn insertion_point<T, P>(items: &[T], mut lower: usize, mut upper: usize, goes_before: P) -> usize
where
    P: Fn(&T) -> bool,
{
    while upper - lower > 1 {
        let mid = lower + (upper - lower) / 2;
        if goes_before(&items[mid]) {
            upper = mid;
        } else {
            lower = mid;
        }
    }
    if goes_before(&items[lower]) {
        lower
    } else {
        upper
    }
}
