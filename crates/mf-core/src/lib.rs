//! mf-core: shared vocabulary for metforce.
//!
//! Contains:
//! - variables (the fixed standard name <-> archive short name map)
//! - time (calendar timestamps + "hours since" time axis)
//! - window (half-open archive row window arithmetic)
//! - error (shared error types)

pub mod error;
pub mod time;
pub mod variables;
pub mod window;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use time::{SECONDS_PER_HOUR, TimeAxis, floor_hours_between, parse_timestamp};
pub use variables::{ForcingVariable, VARIABLE_COUNT};
pub use window::RowWindow;
