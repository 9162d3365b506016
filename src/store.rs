mod error;
mod file;
mod location;
mod persister;

pub use error::{Error, Result};
pub use file::FileStore;
pub use location::location;
pub use persister::ReadingStore;
