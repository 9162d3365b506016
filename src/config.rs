//! Configuration of the `counter-rate` check, read from environment variables.
//!
//! | variable                   | default                 |
//! |----------------------------|-------------------------|
//! | `COUNTER_RATE_STATE_DIR`   | `std::env::temp_dir()`  |
//! | `COUNTER_RATE_STATE_FILE`  | derived from identity   |
//! | `COUNTER_RATE_SOURCE`      | `net_dev`               |
//! | `COUNTER_RATE_SOURCE_PATH` | `/proc/net/dev`         |
//! | `COUNTER_RATE_WRAP_AT`     | unset: counters reset   |
//! | `COUNTER_RATE_IDENTITY`    | hash of the arguments   |

use std::path::PathBuf;
use std::str::FromStr;

use crate::delta::DeltaPolicy;
use crate::reading::{self, Identity, Value};

const STATE_DIR: &str = "COUNTER_RATE_STATE_DIR";
const STATE_FILE: &str = "COUNTER_RATE_STATE_FILE";
const SOURCE: &str = "COUNTER_RATE_SOURCE";
const SOURCE_PATH: &str = "COUNTER_RATE_SOURCE_PATH";
const WRAP_AT: &str = "COUNTER_RATE_WRAP_AT";
const IDENTITY: &str = "COUNTER_RATE_IDENTITY";

const DEFAULT_SOURCE_PATH: &str = "/proc/net/dev";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown counter source `{0}`, expected `net_dev` or `key_value`")]
    UnknownSource(String),
    #[error("invalid wrap modulus `{0}`, expected a positive integer")]
    InvalidWrapAt(String),
    #[error(transparent)]
    Identity(#[from] reading::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Format of the sampled counter file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    NetDev,
    KeyValue,
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "net_dev" => Ok(Source::NetDev),
            "key_value" => Ok(Source::KeyValue),
            other => Err(Error::UnknownSource(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub state_dir: PathBuf,
    pub state_file: Option<PathBuf>,
    pub source: Source,
    pub source_path: PathBuf,
    pub policy: DeltaPolicy,
    pub identity: Option<Identity>,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var_os(key).map(|v| v.to_string_lossy().into_owned()))
    }

    /// Reads the configuration through `lookup`, which returns the value of a
    /// variable or `None` if it is unset.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownSource`] for an unsupported `COUNTER_RATE_SOURCE`.
    /// - [`Error::InvalidWrapAt`] if `COUNTER_RATE_WRAP_AT` is not a positive integer.
    /// - [`Error::Identity`] if `COUNTER_RATE_IDENTITY` is not a valid identity.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let state_dir = var(STATE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);
        let state_file = var(STATE_FILE).map(PathBuf::from);
        let source = var(SOURCE)
            .map(|s| s.parse::<Source>())
            .transpose()?
            .unwrap_or(Source::NetDev);
        let source_path = var(SOURCE_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_PATH));
        let policy = match var(WRAP_AT) {
            Some(raw) => DeltaPolicy::Forward {
                wrap_at: parse_wrap_at(&raw)?,
            },
            None => DeltaPolicy::ForwardUnknownWrap,
        };
        let identity = var(IDENTITY).map(Identity::new).transpose()?;

        Ok(Self {
            state_dir,
            state_file,
            source,
            source_path,
            policy,
            identity,
        })
    }
}

/// Accepts a decimal integer, or `2^N` for the usual counter widths.
fn parse_wrap_at(raw: &str) -> Result<Value> {
    let invalid = || Error::InvalidWrapAt(raw.to_owned());
    let modulus = match raw.trim().strip_prefix("2^") {
        Some(exp) => {
            let exp: u32 = exp.parse().map_err(|_| invalid())?;
            1i128.checked_shl(exp).filter(|_| exp <= 64).ok_or_else(invalid)?
        }
        None => raw.trim().parse::<i128>().map_err(|_| invalid())?,
    };
    if modulus <= 0 {
        return Err(invalid());
    }
    Ok(Value::Integer(modulus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.state_dir, std::env::temp_dir());
        assert_eq!(config.state_file, None);
        assert_eq!(config.source, Source::NetDev);
        assert_eq!(config.source_path, PathBuf::from("/proc/net/dev"));
        assert_eq!(config.policy, DeltaPolicy::ForwardUnknownWrap);
        assert_eq!(config.identity, None);
    }

    #[test]
    fn test_all_set() {
        let config = config(&[
            (STATE_DIR, "/var/lib/checks"),
            (STATE_FILE, "/var/lib/checks/eth0.json"),
            (SOURCE, "key_value"),
            (SOURCE_PATH, "/proc/vmstat"),
            (WRAP_AT, "4294967296"),
            (IDENTITY, "vmstat"),
        ])
        .unwrap();
        assert_eq!(config.state_dir, PathBuf::from("/var/lib/checks"));
        assert_eq!(
            config.state_file,
            Some(PathBuf::from("/var/lib/checks/eth0.json"))
        );
        assert_eq!(config.source, Source::KeyValue);
        assert_eq!(config.source_path, PathBuf::from("/proc/vmstat"));
        assert_eq!(
            config.policy,
            DeltaPolicy::Forward {
                wrap_at: Value::WRAP_32
            }
        );
        assert_eq!(config.identity, Some(Identity::new("vmstat").unwrap()));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = config(&[(STATE_DIR, ""), (WRAP_AT, ""), (IDENTITY, "")]).unwrap();
        assert_eq!(config.state_dir, std::env::temp_dir());
        assert_eq!(config.policy, DeltaPolicy::ForwardUnknownWrap);
        assert_eq!(config.identity, None);
    }

    #[test]
    fn test_wrap_at_powers_of_two() {
        assert!(matches!(parse_wrap_at("2^32"), Ok(v) if v == Value::WRAP_32));
        assert!(matches!(parse_wrap_at("2^64"), Ok(v) if v == Value::WRAP_64));
        assert!(matches!(parse_wrap_at(" 1000 "), Ok(Value::Integer(1000))));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config(&[(SOURCE, "snmp")]),
            Err(Error::UnknownSource(s)) if s == "snmp"
        ));
        for bad in ["0", "-5", "2^65", "2^x", "lots", "1.5"] {
            assert!(
                matches!(config(&[(WRAP_AT, bad)]), Err(Error::InvalidWrapAt(_))),
                "`{bad}` should be rejected"
            );
        }
        assert!(matches!(
            config(&[(IDENTITY, "a/b")]),
            Err(Error::Identity(reading::Error::InvalidIdentity(_)))
        ));
    }
}
