//! Equal-width binning of coordinates

/// Number of bins per coordinate of the spatial grid
pub const N_SPATIAL_BINS: usize = 10;

/// Assign every value to one of `n_bins` equal-width intervals spanning the data
///
/// The range `[min, max]` is cut into `n_bins` right-closed intervals. The lowest edge is moved
/// down by 0.1% of the range so that `min` falls in bin 0. When all values are equal the range
/// is widened by 0.1% of the value on both sides (by 0.001 for zero) and every value lands in
/// the middle bin.
///
/// Values must be finite. Returns an empty vector for empty input or `n_bins == 0`.
pub fn equal_width_bins(values: &[f64], n_bins: usize) -> Vec<usize> {
    if values.is_empty() || n_bins == 0 {
        return Vec::new();
    }
    let edges = bin_edges(values, n_bins);
    values
        .iter()
        .map(|&x| {
            edges[1..]
                .iter()
                .position(|&edge| x <= edge)
                .unwrap_or(n_bins - 1)
        })
        .collect()
}

fn bin_edges(values: &[f64], n_bins: usize) -> Vec<f64> {
    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });

    let (lo, hi) = if min == max {
        let adjust = if min == 0.0 { 0.001 } else { min.abs() * 0.001 };
        (min - adjust, max + adjust)
    } else {
        (min, max)
    };

    let step = (hi - lo) / n_bins as f64;
    let mut edges = (0..=n_bins)
        .map(|i| lo + step * i as f64)
        .collect::<Vec<_>>();
    edges[n_bins] = hi;
    if min != max {
        edges[0] -= (hi - lo) * 0.001;
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_fall_in_outer_bins() {
        let bins = equal_width_bins(&[0.0, 10.0, 5.0, 0.99, 1.0, 1.01], 10);
        assert_eq!(bins, vec![0, 9, 4, 0, 0, 1]);
    }

    #[test]
    fn intervals_are_right_closed() {
        // edges at 0, 2.5, 5, 7.5, 10
        let bins = equal_width_bins(&[0.0, 2.5, 2.6, 7.5, 10.0], 4);
        assert_eq!(bins, vec![0, 0, 1, 2, 3]);
    }

    #[test]
    fn constant_values_share_the_middle_bin() {
        assert_eq!(equal_width_bins(&[34.05; 4], 10), vec![4; 4]);
        assert_eq!(equal_width_bins(&[0.0; 3], 10), vec![4; 3]);
    }

    #[test]
    fn negative_coordinates() {
        let bins = equal_width_bins(&[-118.5, -118.0, -118.25], 10);
        assert_eq!(bins, vec![0, 9, 4]);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(equal_width_bins(&[], 10).is_empty());
        assert!(equal_width_bins(&[1.0], 0).is_empty());
    }
}
