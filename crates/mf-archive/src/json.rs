//! JSON archive file format.
//!
//! Mirrors the NetCDF layout the forcing data normally ships in:
//!
//! ```json
//! {
//!   "time": { "units": "hours since 2007-01-01 00:00:00", "length": 240 },
//!   "variables": {
//!     "T2D": { "long_name": "2-m Air Temperature", "units": "K", "values": [...] },
//!     ...
//!   }
//! }
//! ```
//!
//! Variables other than the eight forcing variables are allowed and ignored.

use std::collections::BTreeMap;
use std::fs;
use std::ops::Range;
use std::path::Path;

use mf_core::ForcingVariable;
use serde::{Deserialize, Serialize};

use crate::archive::{ForcingArchive, VariableAttributes};
use crate::{ArchiveError, ArchiveResult, check_rows};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonTimeAxis {
    pub units: String,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonVariable {
    pub long_name: String,
    pub units: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonArchive {
    pub time: JsonTimeAxis,
    pub variables: BTreeMap<String, JsonVariable>,
}

impl JsonArchive {
    pub fn load(path: &Path) -> ArchiveResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> ArchiveResult<Self> {
        let archive: JsonArchive = serde_json::from_str(content)?;
        archive.validate()?;
        Ok(archive)
    }

    pub fn save(&self, path: &Path) -> ArchiveResult<()> {
        self.validate()?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Snapshot every forcing variable of another archive.
    pub fn from_archive(source: &dyn ForcingArchive) -> ArchiveResult<Self> {
        let length = source.row_count();
        let mut variables = BTreeMap::new();
        for var in ForcingVariable::ALL {
            let attributes = source.attributes(var)?;
            variables.insert(
                var.short_name().to_string(),
                JsonVariable {
                    long_name: attributes.long_name,
                    units: attributes.units,
                    values: source.read_rows(var, 0..length)?,
                },
            );
        }
        Ok(Self {
            time: JsonTimeAxis {
                units: source.time_units().to_string(),
                length,
            },
            variables,
        })
    }

    fn validate(&self) -> ArchiveResult<()> {
        for var in ForcingVariable::ALL {
            let column = self.variable(var)?;
            if column.values.len() != self.time.length {
                return Err(ArchiveError::LengthMismatch {
                    variable: var.short_name().to_string(),
                    len: column.values.len(),
                    expected: self.time.length,
                });
            }
        }
        Ok(())
    }

    fn variable(&self, var: ForcingVariable) -> ArchiveResult<&JsonVariable> {
        self.variables
            .get(var.short_name())
            .ok_or_else(|| ArchiveError::MissingVariable(var.short_name().to_string()))
    }
}

impl ForcingArchive for JsonArchive {
    fn time_units(&self) -> &str {
        &self.time.units
    }

    fn row_count(&self) -> usize {
        self.time.length
    }

    fn attributes(&self, var: ForcingVariable) -> ArchiveResult<VariableAttributes> {
        let column = self.variable(var)?;
        Ok(VariableAttributes {
            long_name: column.long_name.clone(),
            units: column.units.clone(),
        })
    }

    fn read_rows(&self, var: ForcingVariable, rows: Range<usize>) -> ArchiveResult<Vec<f64>> {
        let column = self.variable(var)?;
        check_rows(rows.start, rows.end, self.time.length)?;
        Ok(column.values[rows].to_vec())
    }
}
