use thiserror::Error;

/// Errors produced anywhere in the analysis pipeline
///
/// Every error is fatal to a run: there is no partial result mode, the caller either gets a full
/// simulation or one of these
#[derive(Debug, Error)]
pub enum Error {
    /// An address record had the wrong width or contained something other than `0`/`1`
    #[error("malformed address {address:?}: {reason}")]
    MalformedAddress { address: String, reason: String },

    /// The cache geometry can't be realised for the configured address width
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The configuration text couldn't be parsed
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
