//! Event tables
//!
//! A [`Table`] is the columnar, in-memory form of a loaded incident dataset. Engines only ever
//! receive `&Table`: whatever they derive (timestamps, bins, features) lives in their own working
//! copies, so a single table can back any number of concurrent analyses.
use std::collections::HashMap;

use crate::error::{Error, Result};

mod value;

pub use value::Value;

/// Named columns of equal length
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Vec<Value>>,
    lookup: HashMap<String, usize>,
    n_rows: usize,
}

impl Table {
    /// Create an empty table without columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a header and row-major cells
    ///
    /// Every row must have exactly one cell per header name.
    pub fn from_rows<S: Into<String>>(names: Vec<S>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut columns = vec![Vec::with_capacity(rows.len()); names.len()];
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != names.len() {
                return Err(Error::Parameters(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    names.len()
                )));
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.push(cell);
            }
        }

        let mut table = Table::new();
        for (name, column) in names.into_iter().zip(columns) {
            table = table.with_column(name, column)?;
        }
        Ok(table)
    }

    /// Append (or replace) a column
    ///
    /// The first column fixes the number of rows, later columns must match it.
    pub fn with_column<V: Into<Value>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        let name = name.into();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();

        if !self.names.is_empty() && values.len() != self.n_rows {
            return Err(Error::Parameters(format!(
                "column `{}` has {} rows, expected {}",
                name,
                values.len(),
                self.n_rows
            )));
        }
        self.n_rows = values.len();

        match self.lookup.get(&name) {
            Some(&idx) => self.columns[idx] = values,
            None => {
                self.lookup.insert(name.clone(), self.names.len());
                self.names.push(name);
                self.columns.push(values);
            }
        }
        Ok(self)
    }

    pub fn nrows(&self) -> usize {
        self.n_rows
    }

    pub fn ncols(&self) -> usize {
        self.names.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.lookup.get(name).map(|&idx| self.columns[idx].as_slice())
    }

    /// Fails with [`Error::MissingColumns`] naming every absent column, in the order requested.
    pub fn require(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.has_column(name))
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingColumns(missing))
        }
    }

    /// Copy the named columns into a new table
    ///
    /// This is the private working copy an engine derives columns on, the source stays untouched.
    pub fn select(&self, names: &[&str]) -> Result<Table> {
        self.require(names)?;
        let mut out = Table::new();
        for name in names {
            // `require` guarantees presence
            if let Some(column) = self.column(name) {
                out = out.with_column(*name, column.iter().cloned())?;
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incidents() -> Table {
        Table::from_rows(
            vec!["date", "crime_type", "latitude"],
            vec![
                vec!["2020-01-01".into(), "BURGLARY".into(), 34.05.into()],
                vec!["2020-01-02".into(), Value::Missing, 34.10.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn from_rows_is_columnar() {
        let table = incidents();
        assert_eq!(table.nrows(), 2);
        assert_eq!(table.ncols(), 3);
        assert_eq!(
            table.column("crime_type").unwrap(),
            &[Value::from("BURGLARY"), Value::Missing]
        );
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let res = Table::from_rows(vec!["a", "b"], vec![vec![Value::Int(1)]]);
        assert!(matches!(res, Err(Error::Parameters(_))));
    }

    #[test]
    fn column_length_must_match() {
        let res = incidents().with_column("area", vec![1, 2, 3]);
        assert!(matches!(res, Err(Error::Parameters(_))));
    }

    #[test]
    fn require_reports_all_absent_names() {
        let res = incidents().require(&["LAT", "date", "LON"]);
        assert_eq!(
            res,
            Err(Error::MissingColumns(vec!["LAT".into(), "LON".into()]))
        );
    }

    #[test]
    fn select_copies_without_touching_source() {
        let table = incidents();
        let copy = table
            .select(&["latitude"])
            .unwrap()
            .with_column("latitude", vec![0.0, 0.0])
            .unwrap();
        assert_eq!(
            copy.column("latitude").unwrap(),
            &[Value::Float(0.0), Value::Float(0.0)]
        );
        assert_eq!(
            table.column("latitude").unwrap(),
            &[Value::Float(34.05), Value::Float(34.10)]
        );
        assert_eq!(copy.column_names(), &["latitude".to_string()]);
    }
}
