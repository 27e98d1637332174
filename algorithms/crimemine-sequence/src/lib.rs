//! `crimemine-sequence` mines recurring sequences of incident types.
//!
//! ## The big picture
//!
//! `crimemine-sequence` is a crate in the `crimemine` workspace. Incidents of a [`Table`] are cut
//! into time-bounded sequences of event types, then frequent sequential patterns are searched
//! with PrefixSpan.
//!
//! ## Current state
//!
//! * [Sequence builder](build_sequences) with three [grouping policies](GroupingMethod):
//!   temporal only, per area and per cell of a latitude/longitude grid
//! * [PrefixSpan](PrefixSpan) over sequences of any hashable symbol
//! * [Mining pipeline](run_sequence_mining): statistics, ranked patterns and sequence metadata
//!
//! ```
//! use crimemine::{Table, Value};
//! use crimemine_sequence::{run_sequence_mining, GroupingMethod, SequenceMiningParams};
//!
//! let rows = vec![
//!     vec![Value::from("2023-02-01"), Value::Int(100), Value::from("THEFT")],
//!     vec![Value::from("2023-02-01"), Value::Int(900), Value::from("ASSAULT")],
//!     vec![Value::from("2023-02-04"), Value::Int(100), Value::from("THEFT")],
//!     vec![Value::from("2023-02-04"), Value::Int(300), Value::from("ASSAULT")],
//! ];
//! let table = Table::from_rows(vec!["date", "time", "crime_type"], rows).unwrap();
//!
//! let params = SequenceMiningParams::new()
//!     .grouping(GroupingMethod::TemporalOnly)
//!     .min_support(0.5);
//! let result = run_sequence_mining(&table, &params).unwrap();
//! assert_eq!(result.statistics.n_sequences, 2);
//! assert_eq!(result.patterns[0].support_count, 2);
//! ```
//!
//! [`Table`]: crimemine::Table
mod error;
mod mining;
mod prefixspan;
pub mod sequences;

pub use error::{Result, SequenceError};
pub use mining::*;
pub use prefixspan::*;
pub use sequences::{build_sequences, EventSequences, GroupKey, GroupingMethod, SequenceMetadata};
