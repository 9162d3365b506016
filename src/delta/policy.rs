use crate::reading::{Delta, Reading, Value};

use super::ArithmeticError;

/// How a decrease of a counter between two readings is interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeltaPolicy {
    /// No correction; a decrease yields a negative delta.
    Plain,
    /// A decrease means the counter overflowed `wrap_at` once and restarted at zero.
    Forward { wrap_at: Value },
    /// A decrease means the counter was reset; the current value is the progress since then.
    ForwardUnknownWrap,
}

impl DeltaPolicy {
    /// Computes the delta of `current` against `previous` under this policy.
    pub fn difference(
        self,
        previous: &Reading,
        current: &Reading,
    ) -> Result<Delta, ArithmeticError> {
        match self {
            DeltaPolicy::Plain => plain_difference(previous, current),
            DeltaPolicy::Forward { wrap_at } => forward_difference(previous, current, wrap_at),
            DeltaPolicy::ForwardUnknownWrap => forward_difference_unknown_wrap(previous, current),
        }
    }
}

/// Applies `diff` to every metric of `previous`.
///
/// `previous` drives the iteration: metrics only present in `current` are
/// ignored, metrics missing from `current` are an error.
fn per_key<F>(previous: &Reading, current: &Reading, mut diff: F) -> Result<Delta, ArithmeticError>
where
    F: FnMut(&str, Value, Value) -> Option<Value>,
{
    previous
        .values()
        .iter()
        .map(|(key, &prev)| -> Result<(String, Value), ArithmeticError> {
            let cur = current
                .get(key)
                .ok_or_else(|| ArithmeticError::MissingKey { key: key.clone() })?;
            let value =
                diff(key, prev, cur).ok_or_else(|| ArithmeticError::Overflow { key: key.clone() })?;
            Ok((key.clone(), value))
        })
        .collect()
}

/// `current - previous` for every metric, without any wrap or reset correction.
///
/// # Errors
///
/// - [`ArithmeticError::MissingKey`] if a metric of `previous` is absent from `current`.
/// - [`ArithmeticError::Overflow`] if integer subtraction overflows.
pub fn plain_difference(previous: &Reading, current: &Reading) -> Result<Delta, ArithmeticError> {
    per_key(previous, current, |_, prev, cur| cur.checked_sub(prev))
}

/// Forward progress of counters that wrap at `wrap_at`.
///
/// A decrease is taken as exactly one wrap: `(wrap_at - previous) + current`.
/// More than one wrap between two readings cannot be detected.
///
/// # Errors
///
/// Same as [`plain_difference`].
pub fn forward_difference(
    previous: &Reading,
    current: &Reading,
    wrap_at: Value,
) -> Result<Delta, ArithmeticError> {
    per_key(previous, current, |key, prev, cur| {
        if cur >= prev {
            return cur.checked_sub(prev);
        }
        log::debug!("Counter '{key}' wrapped at {wrap_at}: previous={prev}, current={cur}");
        wrap_at.checked_sub(prev)?.checked_add(cur)
    })
}

/// Forward progress of counters that may be reset.
///
/// A decrease is taken as a reset, and the current value is the whole
/// progress since that reset.
///
/// # Errors
///
/// Same as [`plain_difference`].
pub fn forward_difference_unknown_wrap(
    previous: &Reading,
    current: &Reading,
) -> Result<Delta, ArithmeticError> {
    per_key(previous, current, |key, prev, cur| {
        if cur >= prev {
            return cur.checked_sub(prev);
        }
        log::debug!("Counter '{key}' was reset: previous={prev}, current={cur}");
        Some(cur)
    })
}
