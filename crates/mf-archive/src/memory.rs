//! In-memory archive backend.

use std::collections::HashMap;
use std::ops::Range;

use mf_core::ForcingVariable;

use crate::archive::{ForcingArchive, VariableAttributes};
use crate::{ArchiveError, ArchiveResult, check_rows};

#[derive(Debug, Clone)]
struct Column {
    attributes: VariableAttributes,
    values: Vec<f64>,
}

/// Archive held entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryArchive {
    time_units: String,
    rows: usize,
    columns: HashMap<ForcingVariable, Column>,
}

impl MemoryArchive {
    /// Empty archive with a time axis of `rows` hourly rows.
    pub fn new(time_units: impl Into<String>, rows: usize) -> Self {
        Self {
            time_units: time_units.into(),
            rows,
            columns: HashMap::new(),
        }
    }

    /// Add (or replace) a variable column. `values` must have one entry per row.
    pub fn with_variable(
        mut self,
        var: ForcingVariable,
        long_name: impl Into<String>,
        units: impl Into<String>,
        values: Vec<f64>,
    ) -> ArchiveResult<Self> {
        if values.len() != self.rows {
            return Err(ArchiveError::LengthMismatch {
                variable: var.short_name().to_string(),
                len: values.len(),
                expected: self.rows,
            });
        }
        self.columns.insert(
            var,
            Column {
                attributes: VariableAttributes {
                    long_name: long_name.into(),
                    units: units.into(),
                },
                values,
            },
        );
        Ok(self)
    }

    /// Archive with every variable populated from `value(var, row)`.
    ///
    /// Long names default to the short name; units come from the variable map.
    pub fn from_fn(
        time_units: impl Into<String>,
        rows: usize,
        value: impl Fn(ForcingVariable, usize) -> f64,
    ) -> Self {
        let mut archive = Self::new(time_units, rows);
        for var in ForcingVariable::ALL {
            archive.columns.insert(
                var,
                Column {
                    attributes: VariableAttributes {
                        long_name: var.short_name().to_string(),
                        units: var.units().to_string(),
                    },
                    values: (0..rows).map(|row| value(var, row)).collect(),
                },
            );
        }
        archive
    }

    fn column(&self, var: ForcingVariable) -> ArchiveResult<&Column> {
        self.columns
            .get(&var)
            .ok_or_else(|| ArchiveError::MissingVariable(var.short_name().to_string()))
    }
}

impl ForcingArchive for MemoryArchive {
    fn time_units(&self) -> &str {
        &self.time_units
    }

    fn row_count(&self) -> usize {
        self.rows
    }

    fn attributes(&self, var: ForcingVariable) -> ArchiveResult<VariableAttributes> {
        Ok(self.column(var)?.attributes.clone())
    }

    fn read_rows(&self, var: ForcingVariable, rows: Range<usize>) -> ArchiveResult<Vec<f64>> {
        let column = self.column(var)?;
        check_rows(rows.start, rows.end, self.rows)?;
        Ok(column.values[rows].to_vec())
    }
}
