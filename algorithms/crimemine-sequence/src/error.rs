use thiserror::Error;

use crate::prefixspan::PrefixSpanParamsError;

pub type Result<T> = std::result::Result<T, SequenceError>;

/// Failure of a sequence mining analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequenceError {
    /// The table could not be turned into sequences
    #[error(transparent)]
    Input(#[from] crimemine::Error),
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] PrefixSpanParamsError),
    #[error("invalid parameter {0}")]
    Parameters(String),
}

impl SequenceError {
    /// Whether the caller can fix the failure. Only internal failures of the sequence builder
    /// are not.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            SequenceError::Input(err) => err.is_invalid_input(),
            SequenceError::InvalidParams(_) | SequenceError::Parameters(_) => true,
        }
    }
}
