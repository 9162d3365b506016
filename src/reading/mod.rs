//! Timestamped counter snapshots and the identity of the slot they are stored in.
//!
//! A [`Reading`] never changes after construction; the session replaces its
//! readings rather than mutating them.

use std::collections::BTreeMap;

mod error;
mod identity;
mod value;

pub use error::{Error, Result};
pub use identity::Identity;
pub use value::Value;

/// Metric name to value, as sampled.
pub type Values = BTreeMap<String, Value>;
/// Metric name to difference between two readings.
pub type Delta = BTreeMap<String, Value>;
/// Metric name to difference per second.
pub type Rate = BTreeMap<String, f64>;
/// Label to fraction of the total.
pub type Proportion = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Reading {
    /// Timestamp (in UNIX epoch seconds)
    timestamp: i64,
    values: Values,
}

impl Reading {
    pub fn new(timestamp: i64, values: Values) -> Self {
        Self { timestamp, values }
    }

    /// Creates a reading stamped with the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Clock`] if the system clock is set before the UNIX epoch.
    pub fn now(values: Values) -> Result<Self> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)?
            .as_secs();
        Ok(Self::new(
            i64::try_from(timestamp).unwrap_or(i64::MAX),
            values,
        ))
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_has_recent_timestamp() {
        let reading = Reading::now(Values::new()).unwrap();
        // 2020-01-01T00:00:00Z
        assert!(reading.timestamp() > 1_577_836_800);
        assert!(reading.values().is_empty());
    }

    #[test]
    fn test_accessors() {
        let mut values = Values::new();
        values.insert("bytes".into(), Value::from(200u64));
        let reading = Reading::new(1000, values);

        assert_eq!(reading.timestamp(), 1000);
        assert_eq!(reading.get("bytes"), Some(Value::from(200u64)));
        assert_eq!(reading.get("packets"), None);
    }
}
