use crate::k_means::errors::KMeansError;
use crate::k_means::init::k_means_plus_plus;
use crate::k_means::{KMeansParams, KMeansValidParams};
use crimemine::{Fit, Float};
use log::debug;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, DataMut, Ix1, Ix2, Zip};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand::SeedableRng;
use rand_isaac::Isaac64Rng;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// K-means clustering aims to partition a set of unlabeled observations into clusters,
/// where each observation belongs to the cluster with the nearest mean.
///
/// The mean of the points within a cluster is called *centroid*.
///
/// Given the set of centroids, you can assign an observation to a cluster
/// choosing the nearest centroid.
///
/// ## Algorithm
///
/// This is the _standard algorithm_ (also known as Lloyd's Algorithm) seeded with K-means++.
///
/// There are three steps:
/// - initialisation step: the first centroid is an observation picked uniformly at random, every
///   further one is drawn with probability proportional to its squared distance from the
///   closest centroid chosen so far;
/// - assignment step: assign each observation to the nearest cluster
///                    (minimum euclidean distance, ties go to the lowest cluster index);
/// - update step: recompute the centroid of each cluster as the mean of its observations. A
///                cluster left without observations keeps its previous centroid.
///
/// The initialisation step is a one-off, done at the very beginning.
/// Assignment and update are repeated in a loop until either no centroid moved farther than
/// `tolerance` or `max_n_iterations` iterations have run. Hitting the iteration cap is not an
/// error, the last state is returned and [`KMeans::converged`] reports it.
///
/// The seeded random generator stored in the hyperparameters is cloned for every fit, so
/// identical observations and seed always yield identical centroids and memberships.
///
/// ## Tutorial
///
/// ```
/// use crimemine::Fit;
/// use crimemine_hotspot::KMeans;
/// use ndarray::array;
/// use ndarray_rand::rand::SeedableRng;
/// use rand_isaac::Isaac64Rng;
///
/// let observations = array![[0., 0.], [0., 1.], [1., 0.], [20., 20.], [21., 20.], [20., 21.]];
/// let model = KMeans::params_with_rng(2, Isaac64Rng::seed_from_u64(42))
///     .tolerance(1e-6)
///     .fit(&observations)
///     .expect("KMeans fitted");
///
/// let memberships = model.memberships();
/// assert_eq!(memberships[0], memberships[1]);
/// assert_ne!(memberships[0], memberships[3]);
/// assert_eq!(model.predict(&array![19., 19.]), memberships[3]);
/// ```
pub struct KMeans<F: Float> {
    centroids: Array2<F>,
    memberships: Array1<usize>,
    inertia: F,
    n_iterations: u64,
    converged: bool,
}

impl<F: Float> KMeans<F> {
    pub fn params(n_clusters: usize) -> KMeansParams<F, Isaac64Rng> {
        KMeansParams::new(n_clusters, Isaac64Rng::seed_from_u64(42))
    }

    pub fn params_with_rng<R: Rng>(n_clusters: usize, rng: R) -> KMeansParams<F, R> {
        KMeansParams::new(n_clusters, rng)
    }

    /// Return the set of centroids as a 2-dimensional matrix with shape
    /// `(n_centroids, n_features)`.
    pub fn centroids(&self) -> &Array2<F> {
        &self.centroids
    }

    /// Cluster index of every training observation, as computed by the last assignment step
    pub fn memberships(&self) -> &Array1<usize> {
        &self.memberships
    }

    /// Sum of squared distances between each training observation and the centroid it was
    /// assigned to in the last assignment step
    pub fn inertia(&self) -> F {
        self.inertia
    }

    /// Number of assignment/update rounds that ran
    pub fn n_iterations(&self) -> u64 {
        self.n_iterations
    }

    /// `false` when training stopped at `max_n_iterations` rather than on `tolerance`
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Number of training observations per cluster, empty clusters included
    pub fn cluster_count(&self) -> Array1<usize> {
        let mut counts = Array1::zeros(self.centroids.nrows());
        self.memberships.iter().for_each(|&c| counts[c] += 1);
        counts
    }

    /// Given one observation, return the index of its closest centroid
    pub fn predict(&self, observation: &ArrayBase<impl Data<Elem = F>, Ix1>) -> usize {
        closest_centroid(&self.centroids, observation).0
    }
}

impl<F: Float, R: Rng + Clone, DA: Data<Elem = F>> Fit<ArrayBase<DA, Ix2>, KMeansError>
    for KMeansValidParams<F, R>
{
    type Object = KMeans<F>;

    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `fit` identifies `n_clusters` centroids based on the training data distribution.
    ///
    /// Fails with [`KMeansError::InvalidK`] when there are fewer observations than clusters.
    fn fit(&self, observations: &ArrayBase<DA, Ix2>) -> Result<Self::Object, KMeansError> {
        let n_samples = observations.nrows();
        if self.n_clusters() > n_samples {
            return Err(KMeansError::InvalidK {
                n_clusters: self.n_clusters(),
                n_samples,
            });
        }

        let mut rng = self.rng().clone();
        let observations = observations.view();
        let mut centroids = k_means_plus_plus(self.n_clusters(), &observations, &mut rng);
        let mut memberships = Array1::zeros(n_samples);
        let mut dists = Array1::zeros(n_samples);

        let mut n_iterations = 0;
        let mut converged = false;
        for n_iter in 0..self.max_n_iterations() {
            update_memberships_and_dists(&centroids, &observations, &mut memberships, &mut dists);
            let new_centroids = compute_centroids(&centroids, &observations, &memberships);
            let shift = max_centroid_shift(&centroids, &new_centroids);
            centroids = new_centroids;
            n_iterations = n_iter + 1;
            debug!("k-means iteration {}: max centroid shift {}", n_iterations, shift);
            if shift <= self.tolerance() {
                converged = true;
                break;
            }
        }

        if !converged {
            debug!(
                "k-means stopped at the iteration cap ({}) before reaching tolerance {}",
                n_iterations,
                self.tolerance()
            );
        }

        Ok(KMeans {
            centroids,
            memberships,
            inertia: dists.sum(),
            n_iterations,
            converged,
        })
    }
}

/// K-means is an iterative algorithm.
/// We will perform the assignment and update steps until we are satisfied
/// (according to our convergence criteria).
///
/// `compute_centroids` returns a 2-dimensional array,
/// where the i-th row corresponds to the i-th cluster. A cluster without
/// members keeps its row from `old_centroids`.
pub(crate) fn compute_centroids<F: Float>(
    old_centroids: &Array2<F>,
    // (n_observations, n_features)
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_observations,)
    cluster_memberships: &ArrayBase<impl Data<Elem = usize>, Ix1>,
) -> Array2<F> {
    let n_clusters = old_centroids.nrows();
    let mut counts: Array1<usize> = Array1::zeros(n_clusters);
    let mut centroids = Array2::zeros((n_clusters, observations.ncols()));

    Zip::from(observations.rows())
        .and(cluster_memberships)
        .for_each(|observation, &cluster_membership| {
            let mut centroid = centroids.row_mut(cluster_membership);
            centroid += &observation;
            counts[cluster_membership] += 1;
        });

    Zip::from(centroids.rows_mut())
        .and(old_centroids.rows())
        .and(&counts)
        .for_each(|mut centroid, old_centroid, &cnt| {
            if cnt == 0 {
                centroid.assign(&old_centroid);
            } else {
                centroid /= F::cast(cnt);
            }
        });
    centroids
}

/// Largest euclidean displacement between matching rows of two centroid matrices
pub(crate) fn max_centroid_shift<F: Float>(old: &Array2<F>, new: &Array2<F>) -> F {
    old.axis_iter(Axis(0))
        .zip(new.axis_iter(Axis(0)))
        .map(|(a, b)| squared_distance(&a, &b).sqrt())
        .fold(F::zero(), F::max)
}

// Updates `dists` with the squared distance of each observation from its closest centroid.
pub(crate) fn update_min_dists<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(dists)
        .for_each(|observation, dist| *dist = closest_centroid(centroids, &observation).1);
}

// Updates `cluster_memberships` with the closest centroid of each observation and `dists` with
// the squared distance to it.
pub(crate) fn update_memberships_and_dists<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    cluster_memberships: &mut ArrayBase<impl DataMut<Elem = usize>, Ix1>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(cluster_memberships)
        .and(dists)
        .for_each(|observation, cluster_membership, dist| {
            let (m, d) = closest_centroid(centroids, &observation);
            *cluster_membership = m;
            *dist = d;
        });
}

/// Given a matrix of centroids with shape (n_centroids, n_features) and an observation,
/// return the index of the closest centroid (the index of the corresponding row in `centroids`)
/// together with the squared distance to it. Ties go to the lowest index.
pub(crate) fn closest_centroid<F: Float>(
    // (n_centroids, n_features)
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_features)
    observation: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> (usize, F) {
    let first_centroid = centroids.row(0);
    let (mut closest_index, mut minimum_distance) =
        (0, squared_distance(&first_centroid, observation));

    for (centroid_index, centroid) in centroids.rows().into_iter().enumerate().skip(1) {
        let distance = squared_distance(&centroid, observation);
        if distance < minimum_distance {
            closest_index = centroid_index;
            minimum_distance = distance;
        }
    }
    (closest_index, minimum_distance)
}

fn squared_distance<F: Float>(
    a: &ArrayBase<impl Data<Elem = F>, Ix1>,
    b: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> F {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum()
}
