use std::path::Path;

use crate::reading::Reading;

use super::Result;

/// Single-slot storage for the last reading of a check.
///
/// `location` overrides the slot the store was created for.
pub trait ReadingStore {
    fn save(&self, reading: &Reading, location: Option<&Path>) -> Result<()>;

    fn load(&self, location: Option<&Path>) -> Result<Reading>;
}
