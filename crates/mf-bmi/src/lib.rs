//! Standardized model-coupling interface over hourly forcing data.
//!
//! Provides:
//! - the [`Bmi`] lifecycle/introspection contract
//! - [`ForcingComponent`], which serves archive forcing rows one time step at a time
//!
//! A driver calls `initialize`, then `update`/`update_until` to advance the
//! time-step cursor, reads or writes the current row through the value
//! accessors, and finally calls `finalize`.

pub mod bmi;
pub mod component;
pub mod error;

pub use bmi::{Bmi, GridId};
pub use component::{
    COMPONENT_NAME, ForcingComponent, GRID_TYPE, TIME_STEP_SECONDS, TIME_UNITS, VAR_LOCATION,
    VAR_TYPE,
};
pub use error::{BmiError, BmiResult};
