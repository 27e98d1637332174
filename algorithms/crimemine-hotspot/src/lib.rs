//! `crimemine-hotspot` finds spatiotemporal crime hotspots.
//!
//! ## The big picture
//!
//! `crimemine-hotspot` is a crate in the `crimemine` workspace. It turns an incident [`Table`]
//! into points of a six dimensional feature space and partitions them with K-Means.
//!
//! ## Current state
//!
//! * [Cyclical feature builder](build_time_location_features): latitude, longitude and the
//!   `(sin, cos)` encoding of hour of day and day of week
//! * [K-Means](KMeans) with K-Means++ seeding
//! * [Hotspot pipeline](run_hotspot_clustering): features, clustering, decoded centroids and
//!   per-cluster counts
//!
//! ```
//! use crimemine::{Table, Value};
//! use crimemine_hotspot::{run_hotspot_clustering, HotspotParams};
//!
//! let rows = (0..10)
//!     .map(|i| {
//!         vec![
//!             Value::from("2021-06-01"),
//!             Value::Int(100 * (i % 2) + 800),
//!             Value::Float(34.0 + (i % 2) as f64),
//!             Value::Float(-118.0),
//!         ]
//!     })
//!     .collect();
//! let table = Table::from_rows(vec!["date", "time", "latitude", "longitude"], rows).unwrap();
//!
//! let result = run_hotspot_clustering(&table, &HotspotParams::new(2).seed(Some(42))).unwrap();
//! assert_eq!(result.n_rows_used, 10);
//! assert_eq!(result.counts.values().sum::<usize>(), 10);
//! ```
//!
//! [`Table`]: crimemine::Table
pub mod cyclical;
mod error;
mod features;
mod hotspot;
#[allow(clippy::new_ret_no_self)]
mod k_means;

pub use cyclical::{decode_cyclical, encode_cyclical};
pub use error::{HotspotError, Result};
pub use features::*;
pub use hotspot::*;
pub use k_means::*;
