//! Utility functions for randomly generating incident tables

use chrono::{Duration, NaiveDate};
use crimemine::{Table, Value};
use ndarray::{s, Array, Array2, ArrayBase, Data, Ix1, Ix2};
use ndarray_rand::{
    rand::{seq::SliceRandom, Rng},
    rand_distr::{Distribution, StandardNormal, Uniform},
    RandomExt,
};

/// A place and a moment of the week where incidents concentrate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hotspot {
    pub latitude: f64,
    pub longitude: f64,
    /// Hour of day in `0..24`
    pub hour: u32,
    /// Day of week, Monday is 0
    pub weekday: u32,
}

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` data points (a "blob") around each of the blob centroids.
///
/// Each blob is formed by `blob_size` points sampled from a standard normal distribution
/// centered in the blob centroid.
pub fn blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let (n_centroids, n_features) = blob_centroids.dim();
    let mut blobs: Array2<f64> = Array2::zeros((n_centroids * blob_size, n_features));

    for (blob_index, blob_centroid) in blob_centroids.rows().into_iter().enumerate() {
        let blob = make_blob(blob_size, &blob_centroid, StandardNormal, rng);

        let indexes = s![blob_index * blob_size..(blob_index + 1) * blob_size, ..];
        blobs.slice_mut(indexes).assign(&blob);
    }
    blobs
}

fn make_blob(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    distribution: impl Distribution<f64>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, blob_centroid.len());
    let origin_blob: Array2<f64> = Array::random_using(shape, distribution, rng);
    origin_blob + blob_centroid
}

/// Incidents scattered around `hotspots`
///
/// Every hotspot contributes `per_hotspot` rows. Coordinates are drawn uniformly within
/// `spread` degrees of the hotspot, clock times within 30 minutes of its hour and dates fall on
/// its weekday in one of four consecutive weeks starting Monday 2023-01-02. Rows are laid out
/// hotspot after hotspot with the columns `date` (text), `time` (`HHMM` integer), `latitude`,
/// `longitude` and `crime_type`.
pub fn hotspot_incidents(
    hotspots: &[Hotspot],
    per_hotspot: usize,
    spread: f64,
    crime_types: &[&str],
    rng: &mut impl Rng,
) -> Table {
    let first_monday = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let jitter = Uniform::new_inclusive(-spread, spread);
    let minutes = Uniform::new_inclusive(-30i64, 30);

    let mut rows = Vec::with_capacity(hotspots.len() * per_hotspot);
    for hotspot in hotspots {
        for _ in 0..per_hotspot {
            let week = rng.gen_range(0..4i64);
            let date = first_monday + Duration::days(7 * week + hotspot.weekday as i64);
            let minute_of_day =
                (hotspot.hour as i64 * 60 + minutes.sample(rng)).rem_euclid(24 * 60);
            let crime_type = crime_types
                .choose(rng)
                .map_or(Value::Missing, |t| Value::from(*t));
            rows.push(vec![
                Value::from(date.format("%Y-%m-%d").to_string()),
                Value::Int(minute_of_day / 60 * 100 + minute_of_day % 60),
                Value::Float(hotspot.latitude + jitter.sample(rng)),
                Value::Float(hotspot.longitude + jitter.sample(rng)),
                crime_type,
            ]);
        }
    }

    // every row has the same five cells
    Table::from_rows(
        vec!["date", "time", "latitude", "longitude", "crime_type"],
        rows,
    )
    .unwrap()
}

/// `n_sequences` random event sequences with lengths in `min_len..=max_len` over `alphabet`
pub fn event_sequences(
    n_sequences: usize,
    min_len: usize,
    max_len: usize,
    alphabet: &[&str],
    rng: &mut impl Rng,
) -> Vec<Vec<String>> {
    (0..n_sequences)
        .map(|_| {
            let len = rng.gen_range(min_len..=max_len);
            (0..len)
                .filter_map(|_| alphabet.choose(rng).map(|s| s.to_string()))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use ndarray_rand::rand::SeedableRng;
    use rand_isaac::Isaac64Rng;

    #[test]
    fn blobs_have_expected_shape() {
        let mut rng = Isaac64Rng::seed_from_u64(42);
        let centroids = array![[0., 0.], [10., 10.], [-5., 3.]];
        assert_eq!(blobs(7, &centroids, &mut rng).dim(), (21, 2));
    }

    #[test]
    fn incidents_stay_near_their_hotspot() {
        let mut rng = Isaac64Rng::seed_from_u64(42);
        let hotspots = [
            Hotspot {
                latitude: 34.05,
                longitude: -118.25,
                hour: 23,
                weekday: 4,
            },
            Hotspot {
                latitude: 40.71,
                longitude: -74.0,
                hour: 8,
                weekday: 0,
            },
        ];
        let table = hotspot_incidents(&hotspots, 10, 0.01, &["THEFT"], &mut rng);
        assert_eq!(table.nrows(), 20);

        let lats = table.column("latitude").unwrap();
        let times = table.column("time").unwrap();
        for (i, (lat, time)) in lats.iter().zip(times).enumerate() {
            let expected = hotspots[i / 10].latitude;
            let lat = lat.number().unwrap().unwrap();
            assert!((lat - expected).abs() <= 0.01 + 1e-12);
            match time {
                Value::Int(hhmm) => assert!(*hhmm >= 0 && *hhmm < 2400 && hhmm % 100 < 60),
                other => panic!("unexpected time {:?}", other),
            }
        }
    }

    #[test]
    fn sequences_respect_bounds() {
        let mut rng = Isaac64Rng::seed_from_u64(42);
        let sequences = event_sequences(50, 2, 5, &["A", "B", "C"], &mut rng);
        assert_eq!(sequences.len(), 50);
        assert!(sequences.iter().all(|s| s.len() >= 2 && s.len() <= 5));
    }
}
