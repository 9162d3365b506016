//! One check invocation's view of its counters.
//!
//! A [`Session`] holds at most two readings. Recording a reading rolls the
//! current one into the previous slot; loading replaces the previous slot with
//! the persisted reading. Differences and rates are computed from the two
//! slots and fail with [`delta::Error::MissingReading`] while either is empty.
//!
//! ```no_run
//! # use counter_rate::delta::DeltaPolicy;
//! # use counter_rate::reading::{Identity, Reading, Values};
//! # use counter_rate::session::Session;
//! # use counter_rate::store::FileStore;
//! # fn sample() -> Values { Values::new() }
//! let identity = Identity::from_args(std::env::args_os().skip(1));
//! let mut session = Session::new(FileStore::new(std::env::temp_dir(), "check_traffic", &identity));
//!
//! session.record(Reading::now(sample())?);
//! match session.load_previous() {
//!     Ok(()) => println!("{:?}", session.rate(DeltaPolicy::ForwardUnknownWrap)?),
//!     Err(err) if err.is_missing_baseline() => println!("insufficient data"),
//!     Err(err) => return Err(err.into()),
//! }
//! session.save_current()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::{Path, PathBuf};

use crate::delta::{self, DeltaPolicy};
use crate::reading::{Delta, Rate, Reading};
use crate::store::{self, ReadingStore};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] store::Error),
    #[error(transparent)]
    Delta(#[from] delta::Error),
}

impl Error {
    /// Returns `true` if no reading was ever persisted for this check, i.e. the
    /// check has no baseline yet and should report insufficient data.
    pub fn is_missing_baseline(&self) -> bool {
        matches!(self, Error::Store(err) if err.is_not_found())
    }
}

impl From<delta::ArithmeticError> for Error {
    fn from(err: delta::ArithmeticError) -> Self {
        Error::Delta(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub struct Session<S> {
    store: S,
    location: Option<PathBuf>,
    previous: Option<Reading>,
    current: Option<Reading>,
}

impl<S: ReadingStore> Session<S> {
    /// Creates an empty session persisting to the store's own slot.
    pub fn new(store: S) -> Self {
        Self {
            store,
            location: None,
            previous: None,
            current: None,
        }
    }

    /// Overrides the slot used for loading and saving.
    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn previous(&self) -> Option<&Reading> {
        self.previous.as_ref()
    }

    pub fn current(&self) -> Option<&Reading> {
        self.current.as_ref()
    }

    /// Installs a new current reading; the old current reading, if any,
    /// becomes the previous one.
    pub fn record(&mut self, reading: Reading) {
        if let Some(current) = self.current.take() {
            self.previous = Some(current);
        }
        self.current = Some(reading);
    }

    /// Replaces the previous reading with the persisted one.
    ///
    /// # Errors
    ///
    /// Store errors are returned unchanged; see [`Error::is_missing_baseline`]
    /// for the first-run case. The previous slot is untouched on error.
    pub fn load_previous(&mut self) -> Result<()> {
        let reading = self.store.load(self.location())?;
        self.previous = Some(reading);
        Ok(())
    }

    /// Persists the current reading for the next invocation.
    ///
    /// # Errors
    ///
    /// - [`delta::Error::MissingReading`] if no reading was recorded.
    /// - Store errors, unchanged.
    pub fn save_current(&self) -> Result<()> {
        let current = self
            .current
            .as_ref()
            .ok_or(delta::Error::MissingReading(delta::Slot::Current))?;
        self.store.save(current, self.location())?;
        Ok(())
    }

    /// Delta between the previous and current readings under `policy`.
    pub fn difference(&self, policy: DeltaPolicy) -> Result<Delta> {
        let (previous, current) = delta::require(self.previous(), self.current())?;
        Ok(policy.difference(previous, current)?)
    }

    /// Rate between the previous and current readings under `policy`.
    pub fn rate(&self, policy: DeltaPolicy) -> Result<Rate> {
        let (previous, current) = delta::require(self.previous(), self.current())?;
        Ok(delta::rate(policy, previous, current)?)
    }
}
