//! Column-major table of extracted hourly rows.

use mf_core::{ForcingVariable, VARIABLE_COUNT};

use crate::{StoreError, StoreResult};

/// Hourly forcing rows, one `f64` column per [`ForcingVariable`].
///
/// Row `i` of the table is row `window.start + i` of the archive it was
/// extracted from. All columns always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForcingTable {
    columns: [Vec<f64>; VARIABLE_COUNT],
}

impl ForcingTable {
    /// Build a table from columns indexed by [`ForcingVariable::index`].
    pub fn from_columns(columns: [Vec<f64>; VARIABLE_COUNT]) -> StoreResult<Self> {
        let rows = columns[0].len();
        if let Some(var) = ForcingVariable::ALL
            .into_iter()
            .find(|v| columns[v.index()].len() != rows)
        {
            return Err(StoreError::Invariant {
                what: format!(
                    "column {var} has {} rows, expected {rows}",
                    columns[var.index()].len()
                ),
            });
        }
        Ok(Self { columns })
    }

    pub fn row_count(&self) -> usize {
        self.columns[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn column(&self, var: ForcingVariable) -> &[f64] {
        &self.columns[var.index()]
    }

    pub fn value(&self, row: usize, var: ForcingVariable) -> Option<f64> {
        self.columns[var.index()].get(row).copied()
    }

    pub fn value_mut(&mut self, row: usize, var: ForcingVariable) -> Option<&mut f64> {
        self.columns[var.index()].get_mut(row)
    }

    /// All eight values of a row, ordered like [`ForcingVariable::ALL`].
    pub fn row(&self, row: usize) -> Option<[f64; VARIABLE_COUNT]> {
        if row >= self.row_count() {
            return None;
        }
        Some(ForcingVariable::ALL.map(|v| self.columns[v.index()][row]))
    }
}
