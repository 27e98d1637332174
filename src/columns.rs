//! Column mapping
//!
//! Engines never look columns up by ad-hoc strings: every name they read is enumerated here and
//! validated once, at the boundary of the engine that needs it.

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Names of the columns an analysis reads
///
/// Defaults match the cleaned incident export (`date`, `time`, `hour`, `latitude`, `longitude`,
/// `crime_type`). There is no default area column.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", default)
)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnConfig {
    pub date_column: String,
    pub time_column: String,
    /// Optional fractional hour-of-day, preferred over `time_column` when building sequences
    pub hour_column: String,
    pub lat_column: String,
    pub lon_column: String,
    pub event_type_column: String,
    pub area_column: Option<String>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            time_column: "time".to_string(),
            hour_column: "hour".to_string(),
            lat_column: "latitude".to_string(),
            lon_column: "longitude".to_string(),
            event_type_column: "crime_type".to_string(),
            area_column: None,
        }
    }
}

impl ColumnConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = name.into();
        self
    }

    pub fn time_column(mut self, name: impl Into<String>) -> Self {
        self.time_column = name.into();
        self
    }

    pub fn hour_column(mut self, name: impl Into<String>) -> Self {
        self.hour_column = name.into();
        self
    }

    pub fn lat_column(mut self, name: impl Into<String>) -> Self {
        self.lat_column = name.into();
        self
    }

    pub fn lon_column(mut self, name: impl Into<String>) -> Self {
        self.lon_column = name.into();
        self
    }

    pub fn event_type_column(mut self, name: impl Into<String>) -> Self {
        self.event_type_column = name.into();
        self
    }

    pub fn area_column(mut self, name: Option<String>) -> Self {
        self.area_column = name;
        self
    }

    /// The four columns hotspot features are built from, in feature order.
    pub fn feature_columns(&self) -> [&str; 4] {
        [
            &self.date_column,
            &self.time_column,
            &self.lat_column,
            &self.lon_column,
        ]
    }
}
