use thiserror::Error;

/// An error when fitting with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error("tolerance must be a finite non-negative number")]
    Tolerance,
    #[error("max_n_iterations cannot be 0")]
    MaxIterations,
}

/// An error when modeling a KMeans algorithm
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KMeansError {
    /// When any of the hyperparameters are set the wrong value
    #[error("Invalid hyperparameter: {0}")]
    InvalidParams(#[from] KMeansParamsError),
    /// When there are fewer observations than requested clusters
    #[error("n_clusters ({n_clusters}) exceeds the number of samples ({n_samples})")]
    InvalidK { n_clusters: usize, n_samples: usize },
}

impl KMeansError {
    /// Whether the requested cluster count itself is unusable, either zero or larger than the
    /// number of observations.
    pub fn is_invalid_k(&self) -> bool {
        matches!(
            self,
            KMeansError::InvalidParams(KMeansParamsError::NClusters) | KMeansError::InvalidK { .. }
        )
    }
}
