//! Event sequence construction
//!
//! Incidents are ordered by time, partitioned by a [`GroupingMethod`] and cut into runs by an
//! anchored window: a run extends while an incident happens within `time_window_hours` of the
//! *first* incident of the run. Runs of fewer than two incidents are discarded.
mod binning;
mod grouping;

pub use binning::{equal_width_bins, N_SPATIAL_BINS};
pub use grouping::{AreaKey, GroupKey, GroupingMethod, SpatialCell};

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use crimemine::time::{combine, parse_date, parse_hour_offset, parse_time_of_day};
use crimemine::{ColumnConfig, Error, Result, Table, Value};
use log::info;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

const STAGE: &str = "sequence_builder";

/// Symbol of incidents without an event type
pub const UNKNOWN_EVENT: &str = "UNKNOWN";

/// Where a sequence came from
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceMetadata {
    /// 1-based position of the sequence in the output
    pub seq_id: usize,
    pub group: GroupKey,
    pub length: usize,
    pub start_time: NaiveDateTime,
    /// Rows of the source table, in sequence order
    pub row_indices: Vec<usize>,
}

/// Sequences of event types and their metadata, `metadata[i]` describes `sequences[i]`
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventSequences {
    pub sequences: Vec<Vec<String>>,
    pub metadata: Vec<SequenceMetadata>,
}

impl EventSequences {
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

struct Event {
    index: usize,
    timestamp: NaiveDateTime,
    symbol: String,
}

/// Build event-type sequences from `table`
///
/// The timestamp of a row is its date plus the fractional `hour_column` when that column exists,
/// otherwise plus the clock time of `time_column` when that exists, otherwise the date alone.
/// Rows whose date does not parse are skipped. Rows are ordered by timestamp, ties keep table
/// order.
///
/// * [`GroupingMethod::TemporalOnly`] needs the date column only.
/// * [`GroupingMethod::AreaBased`] needs `columns.area_column` and fails with
///   [`Error::MissingAreaColumn`] when it is unset or absent. Rows without an area are skipped.
/// * [`GroupingMethod::SpatialTemporal`] needs both coordinate columns. Rows without both
///   coordinates are skipped and the others are binned on a
///   [`N_SPATIAL_BINS`]` x `[`N_SPATIAL_BINS`] grid spanning their coordinates. A row with a
///   single missing coordinate is not put in a cell of its own (such as `nan_3`), it is dropped.
///
/// A missing event type column or cell yields the [`UNKNOWN_EVENT`] symbol. Groups are processed
/// in key order so the output is deterministic.
pub fn build_sequences(
    table: &Table,
    time_window_hours: f64,
    grouping: GroupingMethod,
    columns: &ColumnConfig,
) -> Result<EventSequences> {
    let mut required = vec![columns.date_column.as_str()];
    match grouping {
        GroupingMethod::TemporalOnly => {}
        GroupingMethod::AreaBased => match &columns.area_column {
            Some(area) if table.has_column(area) => required.push(area.as_str()),
            other => return Err(Error::MissingAreaColumn(other.clone())),
        },
        GroupingMethod::SpatialTemporal => {
            required.push(columns.lat_column.as_str());
            required.push(columns.lon_column.as_str());
        }
    }
    table.require(&required)?;

    let mut names = required.clone();
    for optional in &[
        columns.hour_column.as_str(),
        columns.time_column.as_str(),
        columns.event_type_column.as_str(),
    ] {
        if table.has_column(optional) && !names.contains(optional) {
            names.push(*optional);
        }
    }
    let working = table.select(&names)?;

    let mut keyed = keyed_events(&working, grouping, columns)?;
    // stable, equal timestamps keep table order
    keyed.sort_by_key(|(_, event)| event.timestamp);

    let mut groups: BTreeMap<GroupKey, Vec<Event>> = BTreeMap::new();
    for (key, event) in keyed {
        groups.entry(key).or_insert_with(Vec::new).push(event);
    }

    let mut out = EventSequences::default();
    for (key, events) in &groups {
        window_runs(key, events, time_window_hours, &mut out);
    }

    info!(
        "built {} {} sequences from {} groups of {} rows",
        out.len(),
        grouping,
        groups.len(),
        table.nrows()
    );
    Ok(out)
}

/// Timestamped events of the working table, each with its group key
fn keyed_events(
    working: &Table,
    grouping: GroupingMethod,
    columns: &ColumnConfig,
) -> Result<Vec<(GroupKey, Event)>> {
    let dates = column(working, &columns.date_column)?;
    let hours = working.column(&columns.hour_column);
    let times = working.column(&columns.time_column);
    let types = working.column(&columns.event_type_column);

    let mut events = Vec::with_capacity(working.nrows());
    for (index, date) in dates.iter().enumerate() {
        let date = match parse_date(date) {
            Some(date) => date,
            None => continue,
        };
        let offset = if let Some(hours) = hours {
            parse_hour_offset(&hours[index])
        } else if let Some(times) = times {
            parse_time_of_day(&times[index])
        } else {
            None
        };
        let timestamp = match combine(date, offset) {
            Some(timestamp) => timestamp,
            None => continue,
        };
        let symbol = types
            .map(|types| &types[index])
            .filter(|value| !value.is_missing())
            .map_or_else(|| UNKNOWN_EVENT.to_string(), Value::to_string);

        events.push(Event {
            index,
            timestamp,
            symbol,
        });
    }

    match grouping {
        GroupingMethod::TemporalOnly => Ok(events
            .into_iter()
            .map(|event| (GroupKey::All, event))
            .collect()),
        GroupingMethod::AreaBased => {
            let areas = columns
                .area_column
                .as_deref()
                .and_then(|area| working.column(area))
                .unwrap_or(&[]);
            Ok(events
                .into_iter()
                .filter_map(|event| {
                    let area = AreaKey::from_value(areas.get(event.index)?)?;
                    Some((GroupKey::Area(area), event))
                })
                .collect())
        }
        GroupingMethod::SpatialTemporal => spatial_keys(working, events, columns),
    }
}

fn spatial_keys(
    working: &Table,
    events: Vec<Event>,
    columns: &ColumnConfig,
) -> Result<Vec<(GroupKey, Event)>> {
    let lats = column(working, &columns.lat_column)?;
    let lons = column(working, &columns.lon_column)?;

    let mut located = Vec::with_capacity(events.len());
    let (mut lat_values, mut lon_values) = (Vec::new(), Vec::new());
    for event in events {
        let lat = coordinate(&lats[event.index], &columns.lat_column, event.index)?;
        let lon = coordinate(&lons[event.index], &columns.lon_column, event.index)?;
        if let (Some(lat), Some(lon)) = (lat, lon) {
            lat_values.push(lat);
            lon_values.push(lon);
            located.push(event);
        }
    }

    let lat_bins = equal_width_bins(&lat_values, N_SPATIAL_BINS);
    let lon_bins = equal_width_bins(&lon_values, N_SPATIAL_BINS);
    Ok(located
        .into_iter()
        .zip(lat_bins.into_iter().zip(lon_bins))
        .map(|(event, (lat_bin, lon_bin))| {
            (GroupKey::SpatialCell(SpatialCell { lat_bin, lon_bin }), event)
        })
        .collect())
}

fn column<'a>(working: &'a Table, name: &str) -> Result<&'a [Value]> {
    working
        .column(name)
        .ok_or_else(|| Error::MissingColumns(vec![name.to_string()]))
}

fn coordinate(value: &Value, name: &str, index: usize) -> Result<Option<f64>> {
    let number = value.number().map_err(|err| {
        Error::internal(
            STAGE,
            format!("row {}: `{}` value `{}` is not numeric ({})", index, name, value, err),
        )
    })?;
    match number {
        Some(x) if !x.is_finite() => Err(Error::internal(
            STAGE,
            format!("row {}: `{}` value `{}` is not finite", index, name, value),
        )),
        other => Ok(other),
    }
}

/// Cut the chronologically ordered `events` of one group into anchored windows
fn window_runs(
    key: &GroupKey,
    events: &[Event],
    time_window_hours: f64,
    out: &mut EventSequences,
) {
    let mut start = 0;
    for i in 1..=events.len() {
        let closes = i == events.len() || {
            let elapsed = events[i].timestamp - events[start].timestamp;
            elapsed.num_milliseconds() as f64 / 3_600_000.0 > time_window_hours
        };
        if closes {
            push_run(key, &events[start..i], out);
            start = i;
        }
    }
}

fn push_run(key: &GroupKey, run: &[Event], out: &mut EventSequences) {
    if run.len() < 2 {
        return;
    }
    out.sequences
        .push(run.iter().map(|event| event.symbol.clone()).collect());
    out.metadata.push(SequenceMetadata {
        seq_id: out.sequences.len(),
        group: key.clone(),
        length: run.len(),
        start_time: run[0].timestamp,
        row_indices: run.iter().map(|event| event.index).collect(),
    });
}
