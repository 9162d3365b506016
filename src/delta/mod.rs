//! Counter differences between two readings, and the rates and shares derived
//! from them.
//!
//! All functions here are pure: they take two immutable [`Reading`]s and
//! return a new mapping. [`require`] turns the optional readings a session
//! holds into the pair these functions need.
//!
//! # Policies
//!
//! | policy                              | `current < previous` means |
//! |-------------------------------------|----------------------------|
//! | [`DeltaPolicy::Plain`]              | nothing, delta is negative |
//! | [`DeltaPolicy::Forward`]            | one wrap at `wrap_at`      |
//! | [`DeltaPolicy::ForwardUnknownWrap`] | a reset to zero            |

mod error;
mod policy;
mod rate;

pub use error::{ArithmeticError, Error, Result, Slot};
pub use policy::{
    DeltaPolicy, forward_difference, forward_difference_unknown_wrap, plain_difference,
};
pub use rate::{proportion, rate};

use crate::reading::Reading;

/// Ensures both readings are present.
///
/// # Errors
///
/// Returns [`Error::MissingReading`] naming the absent slot; `current` is
/// checked first.
pub fn require<'a>(
    previous: Option<&'a Reading>,
    current: Option<&'a Reading>,
) -> Result<(&'a Reading, &'a Reading)> {
    let current = current.ok_or(Error::MissingReading(Slot::Current))?;
    let previous = previous.ok_or(Error::MissingReading(Slot::Previous))?;
    Ok((previous, current))
}
