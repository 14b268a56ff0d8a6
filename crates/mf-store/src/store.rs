//! Forcing store: configuration plus the extracted table.

use std::path::Path;

use mf_archive::{ForcingArchive, VariableAttributes, open_archive};
use mf_core::{ForcingVariable, RowWindow, TimeAxis, VARIABLE_COUNT};

use crate::config::ForcingConfig;
use crate::table::ForcingTable;
use crate::{StoreError, StoreResult};

#[derive(Debug, Clone)]
pub struct ForcingStore {
    config: ForcingConfig,
    table: ForcingTable,
    window: Option<RowWindow>,
    attributes: Vec<(ForcingVariable, VariableAttributes)>,
}

impl ForcingStore {
    /// Create a store with an empty table. Nothing is read until
    /// [`read_forcing`](Self::read_forcing).
    pub fn from_config(config: ForcingConfig) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            table: ForcingTable::default(),
            window: None,
            attributes: Vec::new(),
        })
    }

    pub fn from_yaml_str(content: &str) -> StoreResult<Self> {
        Self::from_config(ForcingConfig::from_yaml_str(content)?)
    }

    pub fn from_yaml_file(path: &Path) -> StoreResult<Self> {
        Self::from_config(ForcingConfig::from_yaml_file(path)?)
    }

    pub fn config(&self) -> &ForcingConfig {
        &self.config
    }

    pub fn debug(&self) -> bool {
        self.config.debug
    }

    pub fn table(&self) -> &ForcingTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ForcingTable {
        &mut self.table
    }

    /// Archive rows backing the table, once read.
    pub fn window(&self) -> Option<RowWindow> {
        self.window
    }

    pub fn is_loaded(&self) -> bool {
        self.window.is_some()
    }

    /// `long_name`/`units` captured from the archive, in extraction order.
    pub fn variable_attributes(&self) -> &[(ForcingVariable, VariableAttributes)] {
        &self.attributes
    }

    /// Open the configured archive file and extract the configured window.
    pub fn read_forcing(&mut self) -> StoreResult<()> {
        let path = self
            .config
            .archive_file
            .clone()
            .ok_or_else(|| StoreError::config("archiveFile is required to read forcing"))?;
        let archive = open_archive(&path)?;
        self.read_forcing_from(archive.as_ref())
    }

    /// Extract the configured window from an already-open archive.
    ///
    /// Rows `[start, end)` are computed from the archive's `"hours since"`
    /// origin; the window must lie entirely inside the archive.
    pub fn read_forcing_from(&mut self, archive: &dyn ForcingArchive) -> StoreResult<()> {
        if self.is_loaded() {
            return Err(StoreError::AlreadyLoaded);
        }

        let axis = TimeAxis::parse(archive.time_units())?;
        let window = RowWindow::for_dates(&axis, self.config.start_time, self.config.end_time_opt())?;
        let archive_rows = archive.row_count();
        if !window.fits(archive_rows) {
            return Err(StoreError::OutOfRange {
                what: format!(
                    "rows {}..{} requested from archive of {archive_rows} rows",
                    window.start, window.end
                ),
            });
        }
        tracing::debug!(
            start_row = window.start,
            end_row = window.end,
            archive_rows,
            "extracting forcing window"
        );

        let mut columns: [Vec<f64>; VARIABLE_COUNT] = Default::default();
        let mut attributes = Vec::with_capacity(VARIABLE_COUNT);
        for var in ForcingVariable::ALL {
            columns[var.index()] = archive.read_rows(var, window.range())?;
            attributes.push((var, archive.attributes(var)?));
        }

        self.table = ForcingTable::from_columns(columns)?;
        self.window = Some(window);
        self.attributes = attributes;

        if self.config.debug {
            self.log_summary();
        }
        Ok(())
    }

    fn log_summary(&self) {
        tracing::info!(start = %self.config.start_time, "forcing start time");
        match self.config.end_time_opt() {
            Some(end) => tracing::info!(end = %end, "forcing end time"),
            None => tracing::info!("forcing end time: single instant"),
        }
        for (var, attrs) in &self.attributes {
            tracing::info!(
                variable = %var,
                long_name = %attrs.long_name,
                units = %attrs.units,
                "archive variable"
            );
        }
        tracing::info!(rows = self.table.row_count(), "forcing table loaded");
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::config::EndDate;
    use chrono::Duration;
    use mf_archive::MemoryArchive;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn table_rows_match_window(start_h in 0_i64..100, span_h in 0_i64..100, extra in 0_usize..10) {
            let archive_rows = (start_h + span_h) as usize + extra;
            let archive = MemoryArchive::from_fn(
                "hours since 2007-01-01 00:00:00",
                archive_rows,
                |_, row| row as f64,
            );
            let origin = TimeAxis::parse(archive.time_units()).unwrap().origin();
            let start = origin + Duration::hours(start_h);
            let config = ForcingConfig {
                start_time: start,
                end_time: EndDate::At(start + Duration::hours(span_h)),
                debug: false,
                ..ForcingConfig::default()
            };

            let mut store = ForcingStore::from_config(config).unwrap();
            store.read_forcing_from(&archive).unwrap();

            let window = store.window().unwrap();
            prop_assert_eq!(window.end - window.start, store.table().row_count());
            prop_assert_eq!(store.table().row_count() as i64, span_h);
            if span_h > 0 {
                prop_assert_eq!(store.table().value(0, ForcingVariable::RainRate), Some(start_h as f64));
            }
        }
    }
}
