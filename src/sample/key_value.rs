//! Parser for flat key-value counter files.
//!
//! Each line holds a key and a value separated by whitespace, as in
//! `/proc/vmstat`, `/proc/<pid>/io` (with its trailing colon) or a cgroup's
//! `cpu.stat`. Tokens after the value are ignored, and so are blank and
//! single-token lines.
//!
//! # Example
//!
//! ```rust
//! use counter_rate::sample::key_value;
//!
//! let data = "\
//! usage_usec 1000000
//! user_usec 600000
//! system_usec 400000
//! ";
//! let values = key_value::parse(&mut data.as_bytes()).unwrap();
//! assert_eq!(values.len(), 3);
//! ```

use std::io::BufRead;

use crate::reading::Values;

use super::{ParseError, Result, parse_value};

/// Parses every `<key> <value>` line of `buf`.
///
/// A trailing `:` on the key is dropped, so `rchar: 42` yields `rchar`.
///
/// # Errors
///
/// - [`ParseError::InvalidValue`] if a value is not a finite number.
/// - [`ParseError::DuplicateKey`] if a key repeats.
/// - [`ParseError::Io`] if reading fails.
pub fn parse<R: BufRead>(buf: &mut R) -> Result<Values> {
    let mut values = Values::new();
    let mut line = String::new();
    let mut lineno = 0;

    while buf.read_line(&mut line)? != 0 {
        lineno += 1;
        let mut parts = line.split_whitespace();
        if let (Some(key), Some(raw)) = (parts.next(), parts.next()) {
            let key = key.strip_suffix(':').unwrap_or(key);
            let value = parse_value(raw).ok_or_else(|| ParseError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
                line: lineno,
            })?;
            if values.insert(key.to_string(), value).is_some() {
                return Err(ParseError::DuplicateKey {
                    key: key.to_string(),
                    line: lineno,
                });
            }
        }
        line.clear();
    }

    Ok(values)
}
