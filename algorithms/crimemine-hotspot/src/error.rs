use thiserror::Error;

use crate::k_means::{KMeansError, KMeansParamsError};

pub type Result<T> = std::result::Result<T, HotspotError>;

/// Failure of a hotspot analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HotspotError {
    /// The table could not be turned into features
    #[error(transparent)]
    Input(#[from] crimemine::Error),
    #[error(transparent)]
    KMeans(#[from] KMeansError),
}

impl From<KMeansParamsError> for HotspotError {
    fn from(err: KMeansParamsError) -> Self {
        HotspotError::KMeans(err.into())
    }
}

impl HotspotError {
    /// Whether the caller can fix the failure by changing the table, the column mapping or the
    /// parameters. Only internal failures of the feature builder are not.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            HotspotError::Input(err) => err.is_invalid_input(),
            HotspotError::KMeans(_) => true,
        }
    }
}
