//! NetCDF archive backend.
//!
//! Expects a `Time` coordinate variable whose `units` attribute declares the
//! hourly axis, and one 1-D variable per forcing short name indexed by `Time`.

use std::ops::Range;
use std::path::Path;

use mf_core::ForcingVariable;

use crate::archive::{ForcingArchive, VariableAttributes};
use crate::{ArchiveError, ArchiveResult, check_rows};

const TIME_VARIABLE: &str = "Time";

pub struct NetcdfArchive {
    file: netcdf::File,
    time_units: String,
    rows: usize,
}

impl NetcdfArchive {
    pub fn open(path: &Path) -> ArchiveResult<Self> {
        let file = netcdf::open(path)?;

        let time = file
            .variable(TIME_VARIABLE)
            .ok_or_else(|| ArchiveError::MissingVariable(TIME_VARIABLE.to_string()))?;
        let time_units = string_attribute(&time, TIME_VARIABLE, "units")?;
        let rows = time.dimensions().first().map(|d| d.len()).unwrap_or(0);
        drop(time);

        Ok(Self {
            file,
            time_units,
            rows,
        })
    }

    fn variable(&self, var: ForcingVariable) -> ArchiveResult<netcdf::Variable<'_>> {
        self.file
            .variable(var.short_name())
            .ok_or_else(|| ArchiveError::MissingVariable(var.short_name().to_string()))
    }
}

fn string_attribute(var: &netcdf::Variable, variable: &str, name: &str) -> ArchiveResult<String> {
    let missing = || ArchiveError::MissingAttribute {
        variable: variable.to_string(),
        attribute: name.to_string(),
    };
    match var.attribute_value(name) {
        Some(value) => match value? {
            netcdf::AttributeValue::Str(s) => Ok(s),
            _ => Err(missing()),
        },
        None => Err(missing()),
    }
}

impl ForcingArchive for NetcdfArchive {
    fn time_units(&self) -> &str {
        &self.time_units
    }

    fn row_count(&self) -> usize {
        self.rows
    }

    fn attributes(&self, var: ForcingVariable) -> ArchiveResult<VariableAttributes> {
        let nc_var = self.variable(var)?;
        Ok(VariableAttributes {
            long_name: string_attribute(&nc_var, var.short_name(), "long_name")?,
            units: string_attribute(&nc_var, var.short_name(), "units")?,
        })
    }

    fn read_rows(&self, var: ForcingVariable, rows: Range<usize>) -> ArchiveResult<Vec<f64>> {
        let nc_var = self.variable(var)?;
        check_rows(rows.start, rows.end, self.rows)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        Ok(nc_var.get_values::<f64, _>(rows)?)
    }
}
