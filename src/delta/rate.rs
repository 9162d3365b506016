use std::collections::BTreeMap;

use crate::reading::{Proportion, Rate, Reading, Value};

use super::{ArithmeticError, DeltaPolicy};

/// Delta under `policy`, divided by the seconds elapsed between the readings.
///
/// # Errors
///
/// - Any error of the underlying difference, unchanged.
/// - [`ArithmeticError::NonPositiveElapsed`] if `current` is not strictly
///   newer than `previous`.
pub fn rate(
    policy: DeltaPolicy,
    previous: &Reading,
    current: &Reading,
) -> Result<Rate, ArithmeticError> {
    let delta = policy.difference(previous, current)?;

    let elapsed = current.timestamp().saturating_sub(previous.timestamp());
    if elapsed <= 0 {
        return Err(ArithmeticError::NonPositiveElapsed { elapsed });
    }
    let elapsed = elapsed as f64;

    Ok(delta
        .into_iter()
        .map(|(key, value)| (key, value.as_f64() / elapsed))
        .collect())
}

/// Share of each value in the sum of all values.
///
/// An empty input yields an empty result.
///
/// # Errors
///
/// Returns [`ArithmeticError::ZeroTotal`] if the values sum to zero.
///
/// # Examples
///
/// ```
/// # use std::collections::BTreeMap;
/// # use counter_rate::delta::proportion;
/// let values = BTreeMap::from([("a".to_string(), 5.0), ("b".to_string(), 15.0)]);
/// let shares = proportion(&values).unwrap();
/// assert_eq!(shares["a"], 0.25);
/// assert_eq!(shares["b"], 0.75);
/// ```
pub fn proportion<V>(values: &BTreeMap<String, V>) -> Result<Proportion, ArithmeticError>
where
    V: Copy + Into<Value>,
{
    if values.is_empty() {
        return Ok(Proportion::new());
    }

    let total: f64 = values.values().map(|&v| Into::<Value>::into(v).as_f64()).sum();
    if total == 0.0 {
        return Err(ArithmeticError::ZeroTotal);
    }

    Ok(values
        .iter()
        .map(|(key, &v)| (key.clone(), Into::<Value>::into(v).as_f64() / total))
        .collect())
}
