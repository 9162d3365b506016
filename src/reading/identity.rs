use std::ffi::OsStr;
use std::fmt;

use sha2::{Digest, Sha256};

use super::{Error, Result};

/// Key of the stored-reading slot a check invocation loads from and saves to.
///
/// Two invocations with the same arguments share an identity; invocations with
/// different arguments (e.g. different interfaces) get different slots.
///
/// # Examples
///
/// ```
/// # use counter_rate::reading::Identity;
/// let a = Identity::from_args(["--iface", "eth0"]);
/// let b = Identity::from_args(["--iface", "eth1"]);
/// assert_ne!(a, b);
/// assert_eq!(a.as_ref().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    /// Creates an identity from an explicit, caller-supplied string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] if the input is empty or contains a
    /// path separator or NUL byte, since the identity becomes part of a file name.
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if src.is_empty() || src.contains(['/', '\\', '\0']) {
            return Err(Error::InvalidIdentity(src.to_owned()));
        }

        Ok(Self(src.to_owned()))
    }

    /// Derives an identity from an invocation's argument list.
    ///
    /// Arguments are hashed as raw bytes, so they need not be valid UTF-8.
    /// Every argument is terminated by a NUL byte before hashing, so `["a b"]`
    /// and `["a", "b"]` do not collide.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut hasher = Sha256::new();
        for arg in args {
            hasher.update(arg.as_ref().as_encoded_bytes());
            hasher.update([0u8]);
        }
        let digest = hasher.finalize();

        let s = digest.iter().map(|byte| format!("{byte:02x}")).collect();
        Self(s)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args_is_stable() {
        let a = Identity::from_args(["-w", "10", "-c", "20", "eth0"]);
        let args: Vec<String> = ["-w", "10", "-c", "20", "eth0"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let b = Identity::from_args(&args);
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_args_separates_arguments() {
        let joined = Identity::from_args(["a b"]);
        let split = Identity::from_args(["a", "b"]);
        assert_ne!(joined, split);

        let shifted = Identity::from_args(["ab", ""]);
        assert_ne!(Identity::from_args(["a", "b"]), shifted);
    }

    #[test]
    fn test_from_args_is_fixed_width_hex() {
        let empty: [&str; 0] = [];
        for id in [Identity::from_args(empty), Identity::from_args(["x"])] {
            assert_eq!(id.as_ref().len(), 64);
            assert!(
                id.as_ref()
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
            );
        }
    }

    #[test]
    #[cfg(target_family = "unix")]
    fn test_from_args_accepts_non_utf8() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"eth\xff");
        let id = Identity::from_args([raw]);
        assert_eq!(id, Identity::from_args([raw.to_os_string()]));
        assert_eq!(id.as_ref().len(), 64);
        assert_ne!(id, Identity::from_args([raw.to_string_lossy().into_owned()]));
    }

    #[test]
    fn test_new_rejects_unsafe_names() {
        assert!(Identity::new("eth0").is_ok());
        for bad in ["", "../etc", "a/b", "a\\b", "nul\0"] {
            assert!(
                matches!(Identity::new(bad), Err(Error::InvalidIdentity(ref s)) if s == bad),
                "expected `{bad:?}` to be rejected"
            );
        }
    }
}
