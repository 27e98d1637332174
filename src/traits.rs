//! Provide traits for the engines
//!
//! An engine is configured through a set of hyperparameters. Checked hyperparameters implement
//! [`Fit`], which consumes a borrowed set of records and produces a fitted object (a clustering
//! model, a list of frequent patterns). Unchecked hyperparameters get the same trait through
//! [`ParamGuard`](crate::ParamGuard).

use std::error::Error;

/// Fittable algorithm
///
/// A fittable algorithm takes records and creates an object, for example a K-Means model holding
/// centroids and memberships. `R` may be unsized so that slices of sequences can be fitted
/// directly.
pub trait Fit<R: ?Sized, E: Error> {
    type Object;

    fn fit(&self, records: &R) -> Result<Self::Object, E>;
}
