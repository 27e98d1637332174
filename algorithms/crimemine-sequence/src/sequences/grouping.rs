use std::fmt;
use std::str::FromStr;

use crimemine::{Error, Value};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// How incidents are partitioned before windowing
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "snake_case")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupingMethod {
    /// One running sequence over all incidents
    TemporalOnly,
    /// One running sequence per value of the area column
    AreaBased,
    /// One running sequence per cell of a 10 x 10 latitude/longitude grid
    SpatialTemporal,
}

impl Default for GroupingMethod {
    fn default() -> Self {
        GroupingMethod::SpatialTemporal
    }
}

impl GroupingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingMethod::TemporalOnly => "temporal_only",
            GroupingMethod::AreaBased => "area_based",
            GroupingMethod::SpatialTemporal => "spatial_temporal",
        }
    }
}

impl fmt::Display for GroupingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupingMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "temporal_only" => Ok(GroupingMethod::TemporalOnly),
            "area_based" => Ok(GroupingMethod::AreaBased),
            "spatial_temporal" => Ok(GroupingMethod::SpatialTemporal),
            other => Err(Error::Parameters(format!(
                "grouping_method `{}`, expected temporal_only, area_based or spatial_temporal",
                other
            ))),
        }
    }
}

/// Value of the area column, integral numbers compare as integers
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", untagged)
)]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AreaKey {
    Int(i64),
    Text(String),
}

impl AreaKey {
    /// `None` for missing cells
    pub fn from_value(value: &Value) -> Option<Self> {
        if value.is_missing() {
            return None;
        }
        Some(match value {
            Value::Int(x) => AreaKey::Int(*x),
            Value::Float(x) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => {
                AreaKey::Int(*x as i64)
            }
            Value::Text(s) => AreaKey::Text(s.trim().to_string()),
            other => AreaKey::Text(other.to_string()),
        })
    }
}

impl fmt::Display for AreaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AreaKey::Int(x) => write!(f, "{}", x),
            AreaKey::Text(s) => f.write_str(s),
        }
    }
}

/// Cell of the equal-width latitude/longitude grid
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpatialCell {
    pub lat_bin: usize,
    pub lon_bin: usize,
}

impl fmt::Display for SpatialCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.lat_bin, self.lon_bin)
    }
}

/// The group a sequence was built in
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", rename_all = "snake_case")
)]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    All,
    Area(AreaKey),
    SpatialCell(SpatialCell),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::All => f.write_str("all"),
            GroupKey::Area(area) => write!(f, "{}", area),
            GroupKey::SpatialCell(cell) => write!(f, "{}", cell),
        }
    }
}
