//! Counter sources that turn `/proc`-style text files into [`Values`].
//!
//! - [`net_dev`] parses `/proc/net/dev`, one set of counters per interface.
//! - [`key_value`] parses `<key> <value>` files such as `/proc/vmstat` or a
//!   cgroup's `cpu.stat`.
//!
//! [`Values`]: crate::reading::Values

mod error;
pub mod key_value;
pub mod net_dev;

pub use error::{ParseError, Result};

use crate::reading::Value;

/// Parses a counter as an integer, falling back to a float.
pub(crate) fn parse_value(raw: &str) -> Option<Value> {
    if let Ok(u) = raw.parse::<u64>() {
        return Some(Value::from(u));
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Value::from(i));
    }
    raw.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert!(matches!(
            parse_value("18446744073709551615"),
            Some(Value::Integer(i)) if i == i128::from(u64::MAX)
        ));
        assert!(matches!(parse_value("-3"), Some(Value::Integer(-3))));
        assert!(matches!(parse_value("0.5"), Some(Value::Float(f)) if f == 0.5));
        assert!(parse_value("abc").is_none());
        assert!(parse_value("NaN").is_none());
        assert!(parse_value("inf").is_none());
    }
}
