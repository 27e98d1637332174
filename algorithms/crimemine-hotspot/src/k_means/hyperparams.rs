use crate::KMeansParamsError;

use crimemine::{Float, ParamGuard};
use ndarray_rand::rand::Rng;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// Checked hyperparameters of [K-Means](crate::KMeans)
pub struct KMeansValidParams<F: Float, R: Rng> {
    /// Largest euclidean centroid shift still counted as converged
    tolerance: F,
    /// Hard cap on Lloyd iterations
    max_n_iterations: u64,
    n_clusters: usize,
    /// Drives K-Means++ seeding
    rng: R,
}

#[derive(Clone, Debug, PartialEq)]
/// Builder of [`KMeansValidParams`], checked through [`ParamGuard`]
pub struct KMeansParams<F: Float, R: Rng>(KMeansValidParams<F, R>);

impl<F: Float, R: Rng> KMeansParams<F, R> {
    /// Search `n_clusters` centroids, seeding with `rng`
    ///
    /// Iteration stops once no centroid moves farther than `tolerance` (default `1e-4`) or after
    /// `max_n_iterations` (default 100) updates, whichever comes first.
    pub fn new(n_clusters: usize, rng: R) -> Self {
        Self(KMeansValidParams {
            tolerance: F::cast(1e-4),
            max_n_iterations: 100,
            n_clusters,
            rng,
        })
    }

    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    pub fn max_n_iterations(mut self, max_n_iterations: u64) -> Self {
        self.0.max_n_iterations = max_n_iterations;
        self
    }
}

impl<F: Float, R: Rng> ParamGuard for KMeansParams<F, R> {
    type Checked = KMeansValidParams<F, R>;
    type Error = KMeansParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        let params = &self.0;
        // zero tolerance is allowed, it only converges on a fixed point
        if params.n_clusters == 0 {
            return Err(KMeansParamsError::NClusters);
        }
        if !params.tolerance.is_finite() || params.tolerance < F::zero() {
            return Err(KMeansParamsError::Tolerance);
        }
        if params.max_n_iterations == 0 {
            return Err(KMeansParamsError::MaxIterations);
        }
        Ok(params)
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float, R: Rng> KMeansValidParams<F, R> {
    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    pub fn max_n_iterations(&self) -> u64 {
        self.max_n_iterations
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }
}

#[cfg(test)]
mod tests {
    use crate::{KMeans, KMeansParams, KMeansParamsError, KMeansValidParams};
    use crimemine::ParamGuard;
    use rand_isaac::Isaac64Rng;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<KMeansParams<f64, Isaac64Rng>>();
        has_autotraits::<KMeansValidParams<f64, Isaac64Rng>>();
    }

    #[test]
    fn n_clusters_cannot_be_zero() {
        let res = KMeans::<f32>::params(0).check();
        assert!(matches!(res, Err(KMeansParamsError::NClusters)))
    }

    #[test]
    fn tolerance_cannot_be_negative() {
        let res = KMeans::params(1).tolerance(-1.).check();
        assert!(matches!(res, Err(KMeansParamsError::Tolerance)))
    }

    #[test]
    fn tolerance_cannot_be_nan() {
        let res = KMeans::params(1).tolerance(f64::NAN).check();
        assert!(matches!(res, Err(KMeansParamsError::Tolerance)))
    }

    #[test]
    fn tolerance_cannot_be_infinite() {
        let res = KMeans::params(1).tolerance(f64::INFINITY).check();
        assert!(matches!(res, Err(KMeansParamsError::Tolerance)))
    }

    #[test]
    fn tolerance_can_be_zero() {
        let params = KMeans::params(1).tolerance(0.).check().unwrap();
        assert_eq!(params.tolerance(), 0.);
    }

    #[test]
    fn max_n_iterations_cannot_be_zero() {
        let res = KMeans::params(1).tolerance(1.).max_n_iterations(0).check();
        assert!(matches!(res, Err(KMeansParamsError::MaxIterations)))
    }

    #[test]
    fn defaults() {
        let params = KMeans::<f64>::params(3).check().unwrap();
        assert_eq!(params.n_clusters(), 3);
        assert_eq!(params.max_n_iterations(), 100);
        assert_eq!(params.tolerance(), 1e-4);
    }
}
