//! `crimemine` is the shared core of a small toolkit for spatiotemporal pattern mining over
//! geolocated event records, such as police incident reports.
//!
//! ## The big picture
//!
//! The workspace is split the same way for every engine:
//! * this crate holds the event [`Table`], the [`ColumnConfig`] that names the columns an
//!   analysis reads, timestamp parsing, the error taxonomy and the [`Fit`]/[`ParamGuard`]
//!   traits every engine is built on;
//! * `crimemine-hotspot` discovers spatial/temporal hotspots with K-Means over cyclically
//!   encoded time features;
//! * `crimemine-sequence` groups incidents into event-type sequences and mines frequent
//!   sequential patterns with PrefixSpan;
//! * `crimemine-datasets` bundles a small sample of incidents and synthetic generators for tests
//!   and benchmarks.
//!
//! Every analysis is a pure function of a borrowed table and explicit parameters. Engines never
//! mutate the table they are given, so a single loaded dataset can serve concurrent requests.

pub mod columns;
pub mod error;
mod float;
mod param_guard;
pub mod prelude;
pub mod table;
pub mod time;
pub mod traits;

pub use columns::ColumnConfig;
pub use error::{Error, Result};
pub use float::Float;
pub use param_guard::ParamGuard;
pub use table::{Table, Value};
pub use traits::Fit;
