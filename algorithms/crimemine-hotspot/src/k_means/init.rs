use super::algorithm::update_min_dists;
use crimemine::Float;
use log::warn;
use ndarray::{s, Array1, Array2, ArrayBase, ArrayView2, Data, Ix1};
use ndarray_rand::rand::Rng;

/// K-means++ seeding
///
/// The first centroid is an observation chosen uniformly at random. Every following centroid is
/// drawn with probability proportional to the squared distance of each observation from its
/// closest already chosen centroid, which favours points far away from the current seeds.
pub(crate) fn k_means_plus_plus<F: Float>(
    n_clusters: usize,
    observations: &ArrayView2<F>,
    rng: &mut impl Rng,
) -> Array2<F> {
    let (n_samples, n_features) = observations.dim();
    let mut centroids = Array2::zeros((n_clusters, n_features));
    let n = rng.gen_range(0..n_samples);
    centroids.row_mut(0).assign(&observations.row(n));

    let mut dists = Array1::zeros(n_samples);
    for c_cnt in 1..n_clusters {
        update_min_dists(&centroids.slice(s![0..c_cnt, ..]), observations, &mut dists);
        let centroid_idx = weighted_index(&dists, rng);
        centroids
            .row_mut(c_cnt)
            .assign(&observations.row(centroid_idx));
    }
    centroids
}

/// Inverse-CDF draw: the first index whose cumulative probability reaches a uniform draw.
///
/// When every weight is zero (all observations coincide with chosen centroids) the draw falls
/// back to a uniform choice.
fn weighted_index<F: Float>(
    weights: &ArrayBase<impl Data<Elem = F>, Ix1>,
    rng: &mut impl Rng,
) -> usize {
    let total = weights.sum();
    if total <= F::zero() || !total.is_finite() {
        warn!("k-means++ distance mass is {}, seeding uniformly", total);
        return rng.gen_range(0..weights.len());
    }

    let draw = F::cast(rng.gen::<f64>());
    let mut cumulative = F::zero();
    let mut last_positive = 0;
    for (idx, &w) in weights.iter().enumerate() {
        cumulative += w / total;
        if w > F::zero() {
            last_positive = idx;
        }
        if cumulative >= draw {
            return idx;
        }
    }
    // cumulative sum fell short of the draw through rounding
    last_positive
}
