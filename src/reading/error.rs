#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid identity: `{0}`")]
    InvalidIdentity(String),
    #[error("failed to read system clock: {0}")]
    Clock(#[from] std::time::SystemTimeError),
}

pub type Result<T> = std::result::Result<T, Error>;
