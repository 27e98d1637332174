//! Hotspot feature construction
//!
//! Each usable incident becomes the row
//! `[latitude, longitude, sin_hour, cos_hour, sin_dow, cos_dow]`.
use chrono::{Datelike, NaiveDateTime, Timelike};
use crimemine::time::{combine, parse_date, parse_time_of_day};
use crimemine::{ColumnConfig, Error, Result, Table, Value};
use log::{info, warn};
use ndarray::Array2;

use crate::cyclical::{encode_cyclical, DAYS_PER_WEEK, HOURS_PER_DAY};

const STAGE: &str = "feature_builder";

/// Column names of the feature matrix, in order
pub const FEATURE_NAMES: [&str; 6] = [
    "latitude",
    "longitude",
    "hour_sin",
    "hour_cos",
    "dow_sin",
    "dow_cos",
];

/// An input row that survived validity filtering
#[derive(Clone, Debug, PartialEq)]
pub struct CleanRow {
    /// Position of the row in the source table
    pub index: usize,
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
}

/// Feature matrix together with the rows it was built from
///
/// Row `i` of `records` was computed from `rows[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct HotspotFeatures {
    records: Array2<f64>,
    rows: Vec<CleanRow>,
}

impl HotspotFeatures {
    /// `(n_rows, 6)` matrix, see [`FEATURE_NAMES`]
    pub fn records(&self) -> &Array2<f64> {
        &self.records
    }

    pub fn rows(&self) -> &[CleanRow] {
        &self.rows
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }
}

/// Build cyclical time/location features from `table`
///
/// The date, time, latitude and longitude columns named by `columns` must all exist, otherwise
/// [`Error::MissingColumns`] lists the absent ones. A row is kept when its date parses and both
/// coordinates are present. A clock time that cannot be parsed counts as midnight rather than
/// dropping the row. Coordinates holding non-numeric text or a non-finite number are an
/// [`Error::Internal`].
///
/// Fails with [`Error::EmptyResult`] if no row survives.
pub fn build_time_location_features(
    table: &Table,
    columns: &ColumnConfig,
) -> Result<HotspotFeatures> {
    let working = table.select(&columns.feature_columns())?;
    let column = |name: &str| {
        working
            .column(name)
            .ok_or_else(|| Error::MissingColumns(vec![name.to_string()]))
    };
    let dates = column(columns.date_column.as_str())?;
    let times = column(columns.time_column.as_str())?;
    let lats = column(columns.lat_column.as_str())?;
    let lons = column(columns.lon_column.as_str())?;

    let mut rows = Vec::with_capacity(working.nrows());
    let mut unparsed_times = 0;
    for (index, (((date, time), lat), lon)) in dates
        .iter()
        .zip(times)
        .zip(lats)
        .zip(lons)
        .enumerate()
    {
        let date = match parse_date(date) {
            Some(date) => date,
            None => continue,
        };
        let offset = parse_time_of_day(time);
        if offset.is_none() && !time.is_missing() {
            unparsed_times += 1;
        }
        let timestamp = match combine(date, offset) {
            Some(timestamp) => timestamp,
            None => continue,
        };
        let latitude = coordinate(lat, &columns.lat_column, index)?;
        let longitude = coordinate(lon, &columns.lon_column, index)?;
        if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
            rows.push(CleanRow {
                index,
                timestamp,
                latitude,
                longitude,
            });
        }
    }

    if unparsed_times > 0 {
        warn!(
            "{} clock times in `{}` could not be parsed and were read as midnight",
            unparsed_times, columns.time_column
        );
    }
    if rows.is_empty() {
        return Err(Error::EmptyResult);
    }
    info!(
        "built features for {} of {} rows",
        rows.len(),
        working.nrows()
    );

    let mut records = Array2::zeros((rows.len(), FEATURE_NAMES.len()));
    for (mut record, row) in records.rows_mut().into_iter().zip(&rows) {
        let hour = row.timestamp.hour() as f64;
        let dow = row.timestamp.weekday().num_days_from_monday() as f64;
        let (hour_sin, hour_cos) = encode_cyclical(hour, HOURS_PER_DAY);
        let (dow_sin, dow_cos) = encode_cyclical(dow, DAYS_PER_WEEK);
        record.assign(&ndarray::arr1(&[
            row.latitude,
            row.longitude,
            hour_sin,
            hour_cos,
            dow_sin,
            dow_cos,
        ]));
    }

    Ok(HotspotFeatures { records, rows })
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
