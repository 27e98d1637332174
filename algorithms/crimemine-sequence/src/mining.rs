//! Sequence mining pipeline: sequences, PrefixSpan and result assembly
use crimemine::{ColumnConfig, Fit, ParamGuard, Table};
use log::info;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Result, SequenceError};
use crate::prefixspan::{FrequentPatterns, PrefixSpan};
use crate::sequences::{build_sequences, GroupingMethod, SequenceMetadata};

/// Message of a run in which no sequence could be built
pub const NO_SEQUENCES_MESSAGE: &str = "No sequences found with current parameters";

/// Parameters of a sequence mining analysis
///
/// ```
/// use crimemine_sequence::{GroupingMethod, SequenceMiningParams};
///
/// let params = SequenceMiningParams::new()
///     .min_support(0.005)
///     .time_window_hours(48.)
///     .grouping(GroupingMethod::AreaBased)
///     .area_column(Some("area".to_string()))
///     .max_patterns(20);
/// assert_eq!(params.column_config().area_column.as_deref(), Some("area"));
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", default)
)]
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceMiningParams {
    min_support: f64,
    time_window_hours: f64,
    grouping: GroupingMethod,
    max_patterns: usize,
    columns: ColumnConfig,
}

impl Default for SequenceMiningParams {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceMiningParams {
    /// Defaults: `min_support = 0.01`, `time_window_hours = 24`, spatial-temporal grouping, at
    /// most 50 reported patterns
    pub fn new() -> Self {
        Self {
            min_support: 0.01,
            time_window_hours: 24.,
            grouping: GroupingMethod::default(),
            max_patterns: 50,
            columns: ColumnConfig::default(),
        }
    }

    pub fn min_support(mut self, min_support: f64) -> Self {
        self.min_support = min_support;
        self
    }

    pub fn time_window_hours(mut self, time_window_hours: f64) -> Self {
        self.time_window_hours = time_window_hours;
        self
    }

    pub fn grouping(mut self, grouping: GroupingMethod) -> Self {
        self.grouping = grouping;
        self
    }

    /// Area column used by [`GroupingMethod::AreaBased`]
    pub fn area_column(mut self, area_column: Option<String>) -> Self {
        self.columns.area_column = area_column;
        self
    }

    /// Number of best ranked patterns to report, the search itself is not bounded
    pub fn max_patterns(mut self, max_patterns: usize) -> Self {
        self.max_patterns = max_patterns;
        self
    }

    /// Replace the column mapping, including its area column
    pub fn columns(mut self, columns: ColumnConfig) -> Self {
        self.columns = columns;
        self
    }

    pub fn column_config(&self) -> &ColumnConfig {
        &self.columns
    }

    fn check_window(&self) -> Result<()> {
        if self.time_window_hours.is_finite() && self.time_window_hours >= 0. {
            Ok(())
        } else {
            Err(SequenceError::Parameters(format!(
                "time_window_hours must be finite and non-negative, got {}",
                self.time_window_hours
            )))
        }
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceStatistics {
    pub n_sequences: usize,
    /// Number of frequent patterns before truncation to `max_patterns`
    pub n_patterns_found: usize,
    /// Rounded to two decimals
    pub avg_sequence_length: f64,
    pub max_sequence_length: usize,
    pub min_support_threshold: f64,
    pub time_window_hours: f64,
    pub grouping_method: GroupingMethod,
}

/// A reported pattern
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct MinedPattern {
    pub pattern: Vec<String>,
    pub support_count: usize,
    /// Percentage of sequences containing the pattern, rounded to two decimals
    pub support_pct: f64,
    pub length: usize,
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceMiningResult {
    pub statistics: SequenceStatistics,
    pub patterns: Vec<MinedPattern>,
    pub sequence_metadata: Vec<SequenceMetadata>,
    /// Set when no sequence could be built
    pub message: Option<String>,
}

/// Mine frequent event-type patterns of `table`
///
/// Sequences are built with [`build_sequences`] and mined with [`PrefixSpan`]. A table that
/// yields no sequence gives an empty result carrying [`NO_SEQUENCES_MESSAGE`], not an error.
///
/// Fails with [`SequenceError::InvalidParams`] or [`SequenceError::Parameters`] for an
/// out-of-range `min_support` or time window, and with [`SequenceError::Input`] when a required
/// column is missing.
pub fn run_sequence_mining(
    table: &Table,
    params: &SequenceMiningParams,
) -> Result<SequenceMiningResult> {
    let prefixspan = PrefixSpan::params(params.min_support).check()?;
    params.check_window()?;

    let built = build_sequences(
        table,
        params.time_window_hours,
        params.grouping,
        &params.columns,
    )?;

    if built.is_empty() {
        info!("{}", NO_SEQUENCES_MESSAGE);
        return Ok(SequenceMiningResult {
            statistics: statistics(params, &built.sequences, 0),
            patterns: Vec::new(),
            sequence_metadata: Vec::new(),
            message: Some(NO_SEQUENCES_MESSAGE.to_string()),
        });
    }

    let mined: FrequentPatterns<String> = prefixspan.fit(built.sequences.as_slice())?;
    info!(
        "{} frequent patterns in {} sequences, reporting at most {}",
        mined.len(),
        built.len(),
        params.max_patterns
    );

    let n_sequences = built.len() as f64;
    let patterns = mined
        .top(params.max_patterns)
        .iter()
        .map(|pattern| MinedPattern {
            pattern: pattern.items().to_vec(),
            support_count: pattern.support(),
            support_pct: round2(pattern.support() as f64 / n_sequences * 100.),
            length: pattern.len(),
        })
        .collect();

    Ok(SequenceMiningResult {
        statistics: statistics(params, &built.sequences, mined.len()),
        patterns,
        sequence_metadata: built.metadata,
        message: None,
    })
}

fn statistics(
    params: &SequenceMiningParams,
    sequences: &[Vec<String>],
    n_patterns_found: usize,
) -> SequenceStatistics {
    let total: usize = sequences.iter().map(Vec::len).sum();
    let avg_sequence_length = if sequences.is_empty() {
        0.
    } else {
        round2(total as f64 / sequences.len() as f64)
    };
    SequenceStatistics {
        n_sequences: sequences.len(),
        n_patterns_found,
        avg_sequence_length,
        max_sequence_length: sequences.iter().map(Vec::len).max().unwrap_or(0),
        min_support_threshold: params.min_support,
        time_window_hours: params.time_window_hours,
        grouping_method: params.grouping,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.).round() / 100.
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use crimemine::{Error, Value};

    fn incidents() -> Table {
        let rows = vec![
            ("2023-02-01", 1., "THEFT"),
            ("2023-02-01", 2., "ASSAULT"),
            ("2023-02-01", 3., "THEFT"),
            ("2023-02-03", 1., "THEFT"),
            ("2023-02-03", 5., "ASSAULT"),
            ("2023-02-06", 1., "BURGLARY"),
            ("2023-02-06", 2., "THEFT"),
        ]
        .into_iter()
        .map(|(date, hour, crime)| vec![Value::from(date), Value::Float(hour), Value::from(crime)])
        .collect();
        Table::from_rows(vec!["date", "hour", "crime_type"], rows).unwrap()
    }

    fn temporal() -> SequenceMiningParams {
        SequenceMiningParams::new()
            .grouping(GroupingMethod::TemporalOnly)
            .min_support(0.6)
    }

    #[test]
    fn statistics_and_patterns() {
        let result = run_sequence_mining(&incidents(), &temporal()).unwrap();
        let stats = &result.statistics;
        assert_eq!(stats.n_sequences, 3);
        assert_abs_diff_eq!(stats.avg_sequence_length, 2.33);
        assert_eq!(stats.max_sequence_length, 3);
        assert_eq!(stats.grouping_method, GroupingMethod::TemporalOnly);
        assert!(result.message.is_none());

        // min count floor(0.6 * 3) = 1
        let best = &result.patterns[0];
        assert_eq!(best.pattern, vec!["THEFT"]);
        assert_eq!(best.support_count, 3);
        assert_abs_diff_eq!(best.support_pct, 100.);
        let theft_assault = result
            .patterns
            .iter()
            .find(|p| p.pattern == ["THEFT", "ASSAULT"])
            .unwrap();
        assert_eq!(theft_assault.support_count, 2);
        assert_abs_diff_eq!(theft_assault.support_pct, 66.67);
        assert_eq!(theft_assault.length, 2);
    }

    #[test]
    fn truncation_happens_after_ranking() {
        let all = run_sequence_mining(&incidents(), &temporal()).unwrap();
        let top = run_sequence_mining(&incidents(), &temporal().max_patterns(2)).unwrap();
        assert_eq!(top.patterns.len(), 2);
        assert_eq!(top.patterns[..], all.patterns[..2]);
        assert_eq!(top.statistics.n_patterns_found, all.statistics.n_patterns_found);
    }

    #[test]
    fn metadata_is_reported() {
        let result = run_sequence_mining(&incidents(), &temporal()).unwrap();
        let ids = result
            .sequence_metadata
            .iter()
            .map(|m| m.seq_id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(result.sequence_metadata[2].row_indices, vec![5, 6]);
    }

    #[test]
    fn nothing_to_mine_is_not_an_error() {
        let params = temporal().time_window_hours(0.);
        let result = run_sequence_mining(&incidents(), &params).unwrap();
        assert_eq!(result.statistics.n_sequences, 0);
        assert!(result.patterns.is_empty());
        assert_eq!(result.message.as_deref(), Some(NO_SEQUENCES_MESSAGE));
    }

    #[test]
    fn parameters_are_checked_first() {
        let err = run_sequence_mining(&Table::default(), &temporal().min_support(1.5)).unwrap_err();
        assert!(matches!(err, SequenceError::InvalidParams(_)));

        let err = run_sequence_mining(&incidents(), &temporal().time_window_hours(-1.))
            .unwrap_err();
        assert!(matches!(err, SequenceError::Parameters(_)));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn area_grouping_without_area_column() {
        let params = SequenceMiningParams::new().grouping(GroupingMethod::AreaBased);
        let err = run_sequence_mining(&incidents(), &params).unwrap_err();
        assert_eq!(err, SequenceError::Input(Error::MissingAreaColumn(None)));
        assert!(err.is_invalid_input());
    }
}
