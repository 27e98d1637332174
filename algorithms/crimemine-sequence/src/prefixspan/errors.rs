use thiserror::Error;

/// An error when mining with an invalid hyperparameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrefixSpanParamsError {
    #[error("min_support must be a fraction in [0, 1], got {0}")]
    MinSupport(f64),
}
