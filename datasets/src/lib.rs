//! `crimemine-datasets` provides incident tables ready to be used in tests and examples.
//!
//! ## The Big Picture
//!
//! `crimemine-datasets` is a crate in the `crimemine` workspace. Analyses read a
//! [`crimemine::Table`], this crate produces them.
//!
//! ## Current State
//!
//! * [`incidents`]: a small bundled export of 53 incidents over eight days in three areas, with
//!   the cleaned column names `date`, `time`, `latitude`, `longitude`, `crime_type`, `area` and
//!   `premises`. A few rows carry a missing coordinate, an unreadable date or an empty crime
//!   type.
//! * [`read_table`]: load any CSV with headers, inferring integer, float and text cells.
//! * `generate` (feature `generate`): synthetic incidents gathered around chosen hotspots, and
//!   random event sequences.
//!
//! ```
//! let table = crimemine_datasets::incidents();
//! assert_eq!(table.nrows(), 53);
//! assert!(table.has_column("crime_type"));
//! ```

#[cfg(feature = "generate")]
pub mod generate;

use std::io::Read;

use crimemine::{Table, Value};
use csv::ReaderBuilder;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Table(#[from] crimemine::Error),
}

/// One line of the bundled export
#[derive(Debug, Deserialize)]
struct IncidentRecord {
    date: String,
    time: Option<i64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    crime_type: Option<String>,
    area: Option<i64>,
    premises: Option<String>,
}

impl IncidentRecord {
    fn into_row(self) -> Vec<Value> {
        vec![
            self.date.into(),
            self.time.into(),
            self.latitude.into(),
            self.longitude.into(),
            self.crime_type.into(),
            self.area.into(),
            self.premises.into(),
        ]
    }
}

const INCIDENT_COLUMNS: [&str; 7] = [
    "date",
    "time",
    "latitude",
    "longitude",
    "crime_type",
    "area",
    "premises",
];

/// Read in the bundled incident export
pub fn incidents() -> Table {
    let data = include_str!("../data/incidents.csv");
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());

    let rows = reader
        .deserialize::<IncidentRecord>()
        .map(|record| record.unwrap().into_row())
        .collect();

    Table::from_rows(INCIDENT_COLUMNS.to_vec(), rows).unwrap()
}

/// Load a CSV with a header line into a [`Table`]
///
/// Empty cells are missing, cells that parse as `i64` become integers, then `f64` floats, and
/// everything else is kept as text.
pub fn read_table<R: Read>(reader: R) -> Result<Table, DatasetError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let names = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(infer_value).collect());
    }
    Ok(Table::from_rows(names, rows)?)
}

fn infer_value(cell: &str) -> Value {
    let cell = cell.trim();
    if cell.is_empty() {
        Value::Missing
    } else if let Ok(int) = cell.parse::<i64>() {
        Value::Int(int)
    } else if let Ok(float) = cell.parse::<f64>() {
        Value::Float(float)
    } else {
        Value::Text(cell.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incidents() {
        let table = incidents();
        assert_eq!(table.nrows(), 53);
        assert_eq!(table.column_names(), &INCIDENT_COLUMNS[..]);

        let lats = table.column("latitude").unwrap();
        assert_eq!(lats.iter().filter(|v| v.is_missing()).count(), 1);
        let types = table.column("crime_type").unwrap();
        assert_eq!(types.iter().filter(|v| v.is_missing()).count(), 1);
        let times = table.column("time").unwrap();
        assert!(times.iter().all(|v| v.is_missing() || matches!(v, Value::Int(_))));
    }

    #[test]
    fn bundled_and_generic_loaders_agree_on_shape() {
        let generic = read_table(include_str!("../data/incidents.csv").as_bytes()).unwrap();
        let typed = incidents();
        assert_eq!(generic.nrows(), typed.nrows());
        assert_eq!(generic.column_names(), typed.column_names());
        assert_eq!(generic.column("area"), typed.column("area"));
    }

    #[test]
    fn infers_cell_types() {
        let table = read_table("a,b,c,d\n1,2.5,x,\n".as_bytes()).unwrap();
        assert_eq!(table.column("a").unwrap(), &[Value::Int(1)]);
        assert_eq!(table.column("b").unwrap(), &[Value::Float(2.5)]);
        assert_eq!(table.column("c").unwrap(), &[Value::Text("x".into())]);
        assert_eq!(table.column("d").unwrap(), &[Value::Missing]);
    }

    #[test]
    fn ragged_csv_is_an_error() {
        assert!(read_table("a,b\n1\n".as_bytes()).is_err());
    }
}
