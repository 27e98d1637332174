//! Hotspot pipeline: features, clustering and result assembly
use std::collections::BTreeMap;

use crimemine::{ColumnConfig, Fit, ParamGuard, Table};
use log::{debug, info};
use ndarray::ArrayView1;
use ndarray_rand::rand::{thread_rng, Rng, SeedableRng};
use rand_isaac::Isaac64Rng;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::cyclical::{decode_cyclical, DAYS_PER_WEEK, HOURS_PER_DAY};
use crate::error::Result;
use crate::features::build_time_location_features;
use crate::k_means::{KMeansParams, KMeansParamsError, KMeansValidParams};

/// Parameters of a hotspot analysis
///
/// ```
/// use crimemine_hotspot::HotspotParams;
///
/// let params = HotspotParams::new(3).seed(Some(7)).max_n_iterations(300);
/// assert_eq!(params.n_clusters(), 3);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct HotspotParams {
    n_clusters: usize,
    max_n_iterations: u64,
    tolerance: f64,
    seed: Option<u64>,
    columns: ColumnConfig,
}

impl Default for HotspotParams {
    fn default() -> Self {
        Self::new(5)
    }
}

impl HotspotParams {
    /// `n_clusters` hotspots, at most 100 iterations, tolerance `1e-4`, unseeded
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            max_n_iterations: 100,
            tolerance: 1e-4,
            seed: None,
            columns: ColumnConfig::default(),
        }
    }

    pub fn max_n_iterations(mut self, max_n_iterations: u64) -> Self {
        self.max_n_iterations = max_n_iterations;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Seed of the K-Means++ generator. Without one every call draws a fresh seed.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn columns(mut self, columns: ColumnConfig) -> Self {
        self.columns = columns;
        self
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn column_config(&self) -> &ColumnConfig {
        &self.columns
    }

    /// Checked K-Means hyperparameters with a generator dedicated to one call
    fn k_means(
        &self,
    ) -> std::result::Result<KMeansValidParams<f64, Isaac64Rng>, KMeansParamsError> {
        let seed = match self.seed {
            Some(seed) => seed,
            None => {
                let seed = thread_rng().gen::<u64>();
                debug!("no seed given, drew {}", seed);
                seed
            }
        };
        KMeansParams::new(self.n_clusters, Isaac64Rng::seed_from_u64(seed))
            .max_n_iterations(self.max_n_iterations)
            .tolerance(self.tolerance)
            .check()
    }
}

/// A hotspot centre in feature space
///
/// The cyclical components are the mean of encoded points, so they are kept as is. Use
/// [`Centroid::decoded_hour`] and [`Centroid::decoded_weekday`] to read them back.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct Centroid {
    pub cluster: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub hour_sin: f64,
    pub hour_cos: f64,
    pub dow_sin: f64,
    pub dow_cos: f64,
}

impl Centroid {
    fn from_row(cluster: usize, row: ArrayView1<f64>) -> Self {
        Centroid {
            cluster,
            latitude: row[0],
            longitude: row[1],
            hour_sin: row[2],
            hour_cos: row[3],
            dow_sin: row[4],
            dow_cos: row[5],
        }
    }

    /// Hour of day in `[0, 24)`
    pub fn decoded_hour(&self) -> f64 {
        decode_cyclical(self.hour_sin, self.hour_cos, HOURS_PER_DAY)
    }

    /// Day of week in `[0, 7)`, Monday is 0
    pub fn decoded_weekday(&self) -> f64 {
        decode_cyclical(self.dow_sin, self.dow_cos, DAYS_PER_WEEK)
    }
}

/// Cluster of one source row
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// Row index in the source table
    pub index: usize,
    pub cluster: usize,
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct HotspotResult {
    pub centroids: Vec<Centroid>,
    pub assignments: Vec<Assignment>,
    /// Rows per cluster, every cluster id in `0..k` is present
    pub counts: BTreeMap<usize, usize>,
    pub n_rows_used: usize,
}

/// Cluster the incidents of `table` into `params.n_clusters()` spatiotemporal hotspots
///
/// Each usable row is encoded as `[lat, lon, sin_hour, cos_hour, sin_dow, cos_dow]` and the
/// matrix is partitioned with K-Means. `table` itself is left untouched.
///
/// Fails with [`HotspotError::Input`](crate::HotspotError::Input) when a column is missing or no
/// row is usable, and with [`HotspotError::KMeans`](crate::HotspotError::KMeans) when the cluster
/// count or the other hyperparameters are invalid.
pub fn run_hotspot_clustering(table: &Table, params: &HotspotParams) -> Result<HotspotResult> {
    let k_means = params.k_means()?;
    let features = build_time_location_features(table, &params.columns)?;
    let model = k_means.fit(features.records())?;

    let centroids = model
        .centroids()
        .rows()
        .into_iter()
        .enumerate()
        .map(|(cluster, row)| Centroid::from_row(cluster, row))
        .collect();

    let assignments = features
        .rows()
        .iter()
        .zip(model.memberships())
        .map(|(row, &cluster)| Assignment {
            index: row.index,
            cluster,
        })
        .collect::<Vec<_>>();

    let counts = model
        .cluster_count()
        .iter()
        .copied()
        .enumerate()
        .collect::<BTreeMap<_, _>>();

    info!(
        "clustered {} rows into {} hotspots in {} iterations (inertia {:.4})",
        features.nrows(),
        params.n_clusters,
        model.n_iterations(),
        model.inertia()
    );

    Ok(HotspotResult {
        centroids,
        assignments,
        counts,
        n_rows_used: features.nrows(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HotspotError;
    use approx::assert_abs_diff_eq;
    use crimemine::{Error, Value};

    fn incidents() -> Table {
        let mut rows = Vec::new();
        for i in 0..6 {
            rows.push(vec![
                Value::from("2021-03-01"),
                Value::Int(2200 + i),
                Value::Float(34.0 + i as f64 * 0.001),
                Value::Float(-118.0),
            ]);
            rows.push(vec![
                Value::from("2021-03-04"),
                Value::Int(900 + i),
                Value::Float(40.0),
                Value::Float(-74.0 + i as f64 * 0.001),
            ]);
        }
        rows.push(vec![
            Value::from("garbage"),
            Value::Int(900),
            Value::Float(0.0),
            Value::Float(0.0),
        ]);
        Table::from_rows(vec!["date", "time", "latitude", "longitude"], rows).unwrap()
    }

    #[test]
    fn result_shape() {
        let result = run_hotspot_clustering(&incidents(), &HotspotParams::new(2).seed(Some(1)))
            .unwrap();
        assert_eq!(result.n_rows_used, 12);
        assert_eq!(result.centroids.len(), 2);
        assert_eq!(result.assignments.len(), 12);
        assert_eq!(result.counts.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(result.counts.values().sum::<usize>(), 12);
        // the unparsable date is the last row
        assert!(result.assignments.iter().all(|a| a.index < 12));
    }

    #[test]
    fn groups_are_separated_and_decoded() {
        let result = run_hotspot_clustering(&incidents(), &HotspotParams::new(2).seed(Some(1)))
            .unwrap();
        // even rows are the evening group in Los Angeles
        let evening = result.assignments[0].cluster;
        for a in &result.assignments {
            assert_eq!(a.cluster == evening, a.index % 2 == 0);
        }
        let centroid = &result.centroids[evening];
        assert_abs_diff_eq!(centroid.latitude, 34.0025, epsilon = 1e-9);
        assert_abs_diff_eq!(centroid.decoded_hour(), 22., epsilon = 1e-9);
        // 2021-03-01 is a Monday
        assert_abs_diff_eq!(centroid.decoded_weekday(), 0., epsilon = 1e-9);
        assert_abs_diff_eq!(
            result.centroids[1 - evening].decoded_weekday(),
            3.,
            epsilon = 1e-9
        );
    }

    #[test]
    fn empty_clusters_are_counted() {
        // every row at the same point makes all but one cluster empty
        let rows = (0..4)
            .map(|_| vec!["2021-03-01".into(), Value::Int(1200), 1.0.into(), 1.0.into()])
            .collect();
        let table =
            Table::from_rows(vec!["date", "time", "latitude", "longitude"], rows).unwrap();
        let result = run_hotspot_clustering(&table, &HotspotParams::new(3).seed(Some(3))).unwrap();
        assert_eq!(result.counts.len(), 3);
        assert_eq!(result.counts.values().sum::<usize>(), 4);
        assert_eq!(result.counts.values().filter(|&&c| c == 0).count(), 2);
    }

    #[test]
    fn too_many_clusters_is_invalid_input() {
        let err = run_hotspot_clustering(&incidents(), &HotspotParams::new(13)).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(matches!(err, HotspotError::KMeans(ref e) if e.is_invalid_k()));
    }

    #[test]
    fn zero_clusters_is_rejected_before_features() {
        // the table lacks every column, the cluster count is checked first
        let err = run_hotspot_clustering(&Table::default(), &HotspotParams::new(0)).unwrap_err();
        assert!(matches!(err, HotspotError::KMeans(ref e) if e.is_invalid_k()));
    }

    #[test]
    fn feature_errors_propagate() {
        let params = HotspotParams::new(2).columns(ColumnConfig::default().lon_column("lng"));
        let err = run_hotspot_clustering(&incidents(), &params).unwrap_err();
        assert_eq!(
            err,
            HotspotError::Input(Error::MissingColumns(vec!["lng".to_string()]))
        );
    }

    #[test]
    fn unseeded_runs_still_cluster() {
        let result = run_hotspot_clustering(&incidents(), &HotspotParams::new(2)).unwrap();
        assert_eq!(result.counts.values().sum::<usize>(), 12);
    }
}
