//! Error types of the delta engine.
//!
//! [`Error::MissingReading`] is a precondition failure raised before any
//! arithmetic is attempted. [`ArithmeticError`] covers inputs for which no
//! meaningful result exists:
//!
//! - [`ArithmeticError::MissingKey`]: a metric of the previous reading is absent from the current one.
//! - [`ArithmeticError::NonPositiveElapsed`]: a rate was requested over zero or negative time.
//! - [`ArithmeticError::ZeroTotal`]: proportions of values summing to zero.
//! - [`ArithmeticError::Overflow`]: integer arithmetic left the representable range.

use std::fmt;

/// Which of the two session readings is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Previous,
    Current,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Previous => f.write_str("previous"),
            Slot::Current => f.write_str("current"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("metric '{key}' is missing from the current reading")]
    MissingKey { key: String },

    #[error("elapsed time between readings must be positive, got {elapsed}s")]
    NonPositiveElapsed { elapsed: i64 },

    #[error("cannot compute proportions of values summing to zero")]
    ZeroTotal,

    #[error("integer overflow computing '{key}'")]
    Overflow { key: String },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("missing {0} reading")]
    MissingReading(Slot),

    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

pub type Result<T> = std::result::Result<T, Error>;
