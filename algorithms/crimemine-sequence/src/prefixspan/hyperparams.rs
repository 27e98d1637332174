use crate::prefixspan::PrefixSpanParamsError;

use crimemine::ParamGuard;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [PrefixSpan algorithm](crate::PrefixSpan).
pub struct PrefixSpanValidParams {
    /// Fraction of the sequences a pattern must be contained in
    min_support: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](PrefixSpanValidParams)
/// for the [PrefixSpan algorithm](crate::PrefixSpan) (using the builder pattern).
pub struct PrefixSpanParams(PrefixSpanValidParams);

impl PrefixSpanParams {
    /// A pattern is frequent when it is contained in at least `min_support` of the sequences,
    /// and never in fewer than one.
    pub fn new(min_support: f64) -> Self {
        Self(PrefixSpanValidParams { min_support })
    }

    /// Change the value of `min_support`
    pub fn min_support(mut self, min_support: f64) -> Self {
        self.0.min_support = min_support;
        self
    }
}

impl Default for PrefixSpanParams {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl ParamGuard for PrefixSpanParams {
    type Checked = PrefixSpanValidParams;
    type Error = PrefixSpanParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        let min_support = self.0.min_support;
        if !min_support.is_finite() || !(0.0..=1.0).contains(&min_support) {
            Err(PrefixSpanParamsError::MinSupport(min_support))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl PrefixSpanValidParams {
    pub fn min_support(&self) -> f64 {
        self.min_support
    }

    /// Smallest support count of a frequent pattern among `n_sequences` sequences
    ///
    /// `max(1, floor(min_support * n_sequences))`
    pub fn min_count(&self, n_sequences: usize) -> usize {
        ((self.min_support * n_sequences as f64).floor() as usize).max(1)
    }
}
