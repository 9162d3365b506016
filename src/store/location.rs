use std::path::{Path, PathBuf};

use crate::reading::Identity;

/// Basename used when the program path has none (e.g. empty or `/`).
const FALLBACK_PROGRAM: &str = "check";

/// Resolves the default slot for a check: `<base_dir>/_<program>_<identity>.tmp`,
/// where `program` is reduced to its basename.
///
/// # Examples
///
/// ```
/// # use counter_rate::reading::Identity;
/// # use counter_rate::store;
/// let id = Identity::new("eth0").unwrap();
/// let path = store::location("/tmp", "/usr/lib/nagios/check_traffic", &id);
/// assert_eq!(path, std::path::PathBuf::from("/tmp/_check_traffic_eth0.tmp"));
/// ```
pub fn location(base_dir: impl AsRef<Path>, program: impl AsRef<Path>, identity: &Identity) -> PathBuf {
    let program = program
        .as_ref()
        .file_name()
        .map(|name| name.to_string_lossy())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_PROGRAM.into());

    base_dir
        .as_ref()
        .join(format!("_{program}_{identity}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_uses_basename() {
        let id = Identity::new("abc").unwrap();
        assert_eq!(
            location("/var/tmp", "./plugins/check_net", &id),
            PathBuf::from("/var/tmp/_check_net_abc.tmp")
        );
        assert_eq!(
            location("/var/tmp", "check_net", &id),
            PathBuf::from("/var/tmp/_check_net_abc.tmp")
        );
    }

    #[test]
    fn test_location_falls_back_without_basename() {
        let id = Identity::new("abc").unwrap();
        assert_eq!(location("/tmp", "", &id), PathBuf::from("/tmp/_check_abc.tmp"));
        assert_eq!(location("/tmp", "/", &id), PathBuf::from("/tmp/_check_abc.tmp"));
    }

    #[test]
    fn test_distinct_identities_do_not_collide() {
        let a = Identity::from_args(["eth0"]);
        let b = Identity::from_args(["eth1"]);
        assert_ne!(location("/tmp", "check", &a), location("/tmp", "check", &b));
    }
}
