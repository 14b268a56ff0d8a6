//! Forcing data served through the coupling contract.
//!
//! Every forcing variable is a single `f64` per time step on one scalar grid.
//! The component's cursor counts time steps from its own start, so the
//! cursor is also the row index into the extracted [`ForcingTable`]
//! (not the archive row).
//!
//! Advancing past the last extracted row is allowed; reading or writing a
//! value there fails with [`BmiError::OutOfRange`].
//!
//! [`ForcingTable`]: mf_store::ForcingTable

use std::path::Path;

use mf_archive::ForcingArchive;
use mf_core::ForcingVariable;
use mf_store::{ForcingConfig, ForcingStore};

use crate::bmi::{Bmi, GridId};
use crate::error::{BmiError, BmiResult};

pub const COMPONENT_NAME: &str = "Forcing BMI";
pub const TIME_STEP_SECONDS: f64 = 3600.0;
pub const TIME_UNITS: &str = "s";
pub const VAR_TYPE: &str = "float";
pub const VAR_LOCATION: &str = "node";
pub const GRID_TYPE: &str = "scalar";

const SCALAR_GRID: GridId = 0;
/// Items per variable per time step.
const ITEM_COUNT: usize = 1;
const ITEM_SIZE: usize = std::mem::size_of::<f64>();

struct Session {
    store: ForcingStore,
    cursor: usize,
    /// Hours between configured start and end.
    end_time: f64,
}

impl Session {
    /// Move the cursor forward; the cursor is left untouched if it would overflow.
    fn advance(&mut self, steps: usize) -> BmiResult<()> {
        let cursor = self.cursor;
        self.cursor = cursor.checked_add(steps).ok_or_else(|| BmiError::OutOfRange {
            what: format!("cannot advance {steps} time steps past step {cursor}"),
        })?;
        Ok(())
    }

    fn cursor_oob(&self) -> BmiError {
        BmiError::index_oob(
            "time step past end of forcing table",
            self.cursor,
            self.store.table().row_count(),
        )
    }

    fn value(&self, var: ForcingVariable) -> BmiResult<f64> {
        self.store
            .table()
            .value(self.cursor, var)
            .ok_or_else(|| self.cursor_oob())
    }

    fn value_mut(&mut self, var: ForcingVariable) -> BmiResult<&mut f64> {
        let cursor = self.cursor;
        let rows = self.store.table().row_count();
        self.store
            .table_mut()
            .value_mut(cursor, var)
            .ok_or_else(|| BmiError::index_oob("time step past end of forcing table", cursor, rows))
    }
}

enum Phase {
    Uninitialized,
    Running(Session),
    Finalized,
}

/// Component serving hourly forcing rows one time step at a time.
pub struct ForcingComponent {
    phase: Phase,
    archive: Option<Box<dyn ForcingArchive>>,
}

impl Default for ForcingComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl ForcingComponent {
    /// Component that reads the archive named by the configuration.
    pub fn new() -> Self {
        Self {
            phase: Phase::Uninitialized,
            archive: None,
        }
    }

    /// Component that extracts from `archive`, ignoring the configured archive file.
    pub fn with_archive(archive: Box<dyn ForcingArchive>) -> Self {
        Self {
            phase: Phase::Uninitialized,
            archive: Some(archive),
        }
    }

    /// Initialize from an already-built configuration.
    pub fn initialize_with_config(&mut self, config: ForcingConfig) -> BmiResult<()> {
        self.ensure_uninitialized()?;

        let end_time = config.duration_hours() as f64;
        let mut store = ForcingStore::from_config(config)?;
        match &self.archive {
            Some(archive) => store.read_forcing_from(archive.as_ref())?,
            None => store.read_forcing()?,
        }

        tracing::debug!(
            rows = store.table().row_count(),
            end_time,
            "forcing component initialized"
        );
        self.phase = Phase::Running(Session {
            store,
            cursor: 0,
            end_time,
        });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    /// The backing store (configuration, row window, archive attributes).
    pub fn store(&self) -> BmiResult<&ForcingStore> {
        Ok(&self.session()?.store)
    }

    fn ensure_uninitialized(&self) -> BmiResult<()> {
        match self.phase {
            Phase::Uninitialized => Ok(()),
            Phase::Running(_) | Phase::Finalized => Err(BmiError::AlreadyInitialized),
        }
    }

    fn session(&self) -> BmiResult<&Session> {
        match &self.phase {
            Phase::Running(session) => Ok(session),
            _ => Err(BmiError::NotInitialized),
        }
    }

    fn session_mut(&mut self) -> BmiResult<&mut Session> {
        match &mut self.phase {
            Phase::Running(session) => Ok(session),
            _ => Err(BmiError::NotInitialized),
        }
    }

    fn output_var(&self, name: &str) -> BmiResult<ForcingVariable> {
        self.session()?;
        lookup(name)
    }

    fn check_grid(&self, grid: GridId) -> BmiResult<()> {
        self.session()?;
        if grid != SCALAR_GRID {
            return Err(BmiError::index_oob("grid id", grid as usize, 1));
        }
        Ok(())
    }
}

fn lookup(name: &str) -> BmiResult<ForcingVariable> {
    ForcingVariable::from_standard_name(name).ok_or_else(|| BmiError::UnknownVariable {
        name: name.to_string(),
    })
}

fn unsupported<T>(what: &'static str) -> BmiResult<T> {
    Err(BmiError::UnsupportedOperation { what })
}

fn check_item_index(index: usize) -> BmiResult<()> {
    if index >= ITEM_COUNT {
        return Err(BmiError::index_oob("item index", index, ITEM_COUNT));
    }
    Ok(())
}

impl Bmi for ForcingComponent {
    fn initialize(&mut self, config_file: Option<&Path>) -> BmiResult<()> {
        self.ensure_uninitialized()?;
        let config = match config_file {
            Some(path) => ForcingConfig::from_yaml_file(path)?,
            None => ForcingConfig::default(),
        };
        self.initialize_with_config(config)
    }

    fn update(&mut self) -> BmiResult<()> {
        let session = self.session_mut()?;
        session.advance(1)?;
        tracing::trace!(cursor = session.cursor, "forcing update");
        Ok(())
    }

    fn update_until(&mut self, time: f64) -> BmiResult<()> {
        let session = self.session_mut()?;
        let steps = ((time - session.cursor as f64) / TIME_STEP_SECONDS).floor();
        if steps.is_nan() || steps <= 0.0 {
            return Ok(());
        }
        if steps >= usize::MAX as f64 {
            return Err(BmiError::OutOfRange {
                what: format!("update_until({time}) is beyond the representable time steps"),
            });
        }
        session.advance(steps as usize)?;
        tracing::trace!(cursor = session.cursor, "forcing update_until");
        Ok(())
    }

    fn finalize(&mut self) -> BmiResult<()> {
        self.session()?;
        self.phase = Phase::Finalized;
        tracing::debug!("forcing component finalized");
        Ok(())
    }

    fn get_component_name(&self) -> BmiResult<&str> {
        self.session()?;
        Ok(COMPONENT_NAME)
    }

    fn get_input_item_count(&self) -> BmiResult<usize> {
        self.session()?;
        Ok(0)
    }

    fn get_output_item_count(&self) -> BmiResult<usize> {
        self.session()?;
        Ok(ForcingVariable::ALL.len())
    }

    fn get_input_var_names(&self) -> BmiResult<Vec<&str>> {
        self.session()?;
        Ok(Vec::new())
    }

    fn get_output_var_names(&self) -> BmiResult<Vec<&str>> {
        self.session()?;
        Ok(ForcingVariable::standard_names().to_vec())
    }

    fn get_var_grid(&self, name: &str) -> BmiResult<GridId> {
        self.output_var(name)?;
        Ok(SCALAR_GRID)
    }

    fn get_var_type(&self, name: &str) -> BmiResult<&str> {
        self.output_var(name)?;
        Ok(VAR_TYPE)
    }

    fn get_var_units(&self, name: &str) -> BmiResult<&str> {
        Ok(self.output_var(name)?.units())
    }

    fn get_var_itemsize(&self, name: &str) -> BmiResult<usize> {
        self.output_var(name)?;
        Ok(ITEM_SIZE)
    }

    fn get_var_nbytes(&self, name: &str) -> BmiResult<usize> {
        self.output_var(name)?;
        Ok(ITEM_SIZE * ITEM_COUNT)
    }

    fn get_var_location(&self, name: &str) -> BmiResult<&str> {
        self.output_var(name)?;
        Ok(VAR_LOCATION)
    }

    fn get_start_time(&self) -> BmiResult<f64> {
        self.session()?;
        Ok(0.0)
    }

    fn get_end_time(&self) -> BmiResult<f64> {
        Ok(self.session()?.end_time)
    }

    fn get_current_time(&self) -> BmiResult<f64> {
        Ok(self.session()?.cursor as f64)
    }

    fn get_time_step(&self) -> BmiResult<f64> {
        self.session()?;
        Ok(TIME_STEP_SECONDS)
    }

    fn get_time_units(&self) -> BmiResult<&str> {
        self.session()?;
        Ok(TIME_UNITS)
    }

    fn get_value(&self, name: &str) -> BmiResult<f64> {
        let var = self.output_var(name)?;
        self.session()?.value(var)
    }

    fn get_value_ptr(&mut self, name: &str) -> BmiResult<&mut f64> {
        let var = self.output_var(name)?;
        self.session_mut()?.value_mut(var)
    }

    fn get_value_at_indices(&self, name: &str, indices: &[usize]) -> BmiResult<Vec<f64>> {
        let value = self.get_value(name)?;
        indices
            .iter()
            .map(|&i| check_item_index(i).map(|()| value))
            .collect()
    }

    fn set_value(&mut self, name: &str, value: f64) -> BmiResult<()> {
        *self.get_value_ptr(name)? = value;
        Ok(())
    }

    fn set_value_at_indices(
        &mut self,
        name: &str,
        indices: &[usize],
        values: &[f64],
    ) -> BmiResult<()> {
        if indices.len() != values.len() {
            return Err(BmiError::InvalidArg {
                what: "indices and values must have the same length",
            });
        }
        for &i in indices {
            check_item_index(i)?;
        }
        let slot = self.get_value_ptr(name)?;
        if let Some(&last) = values.last() {
            *slot = last;
        }
        Ok(())
    }

    fn get_grid_rank(&self, grid: GridId) -> BmiResult<usize> {
        self.check_grid(grid)?;
        Ok(1)
    }

    fn get_grid_size(&self, grid: GridId) -> BmiResult<usize> {
        self.check_grid(grid)?;
        Ok(1)
    }

    fn get_grid_type(&self, grid: GridId) -> BmiResult<&str> {
        self.check_grid(grid)?;
        Ok(GRID_TYPE)
    }

    // A scalar grid has no shape, coordinates or topology.

    fn get_grid_shape(&self, _grid: GridId, _shape: &mut [usize]) -> BmiResult<()> {
        self.session()?;
        unsupported("get_grid_shape")
    }

    fn get_grid_spacing(&self, _grid: GridId, _spacing: &mut [f64]) -> BmiResult<()> {
        self.session()?;
        unsupported("get_grid_spacing")
    }

    fn get_grid_origin(&self, _grid: GridId, _origin: &mut [f64]) -> BmiResult<()> {
        self.session()?;
        unsupported("get_grid_origin")
    }

    fn get_grid_x(&self, _grid: GridId, _x: &mut [f64]) -> BmiResult<()> {
        self.session()?;
        unsupported("get_grid_x")
    }

    fn get_grid_y(&self, _grid: GridId, _y: &mut [f64]) -> BmiResult<()> {
        self.session()?;
        unsupported("get_grid_y")
    }

    fn get_grid_z(&self, _grid: GridId, _z: &mut [f64]) -> BmiResult<()> {
        self.session()?;
        unsupported("get_grid_z")
    }

    fn get_grid_node_count(&self, _grid: GridId) -> BmiResult<usize> {
        self.session()?;
        unsupported("get_grid_node_count")
    }

    fn get_grid_edge_count(&self, _grid: GridId) -> BmiResult<usize> {
        self.session()?;
        unsupported("get_grid_edge_count")
    }

    fn get_grid_face_count(&self, _grid: GridId) -> BmiResult<usize> {
        self.session()?;
        unsupported("get_grid_face_count")
    }

    fn get_grid_edge_nodes(&self, _grid: GridId, _edge_nodes: &mut [usize]) -> BmiResult<()> {
        self.session()?;
        unsupported("get_grid_edge_nodes")
    }

    fn get_grid_face_edges(&self, _grid: GridId, _face_edges: &mut [usize]) -> BmiResult<()> {
        self.session()?;
        unsupported("get_grid_face_edges")
    }

    fn get_grid_face_nodes(&self, _grid: GridId, _face_nodes: &mut [usize]) -> BmiResult<()> {
        self.session()?;
        unsupported("get_grid_face_nodes")
    }

    fn get_grid_nodes_per_face(
        &self,
        _grid: GridId,
        _nodes_per_face: &mut [usize],
    ) -> BmiResult<()> {
        self.session()?;
        unsupported("get_grid_nodes_per_face")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_archive::MemoryArchive;
    use mf_core::parse_timestamp;
    use mf_store::EndDate;

    const T2D: &str = "land_surface_air__temperature";

    fn component(rows: usize, start: &str, end: &str) -> ForcingComponent {
        let archive = MemoryArchive::from_fn("hours since 2007-01-01T00:00:00", rows, |var, row| {
            var.index() as f64 * 1000.0 + row as f64
        });
        let mut c = ForcingComponent::with_archive(Box::new(archive));
        c.initialize_with_config(ForcingConfig {
            start_time: parse_timestamp(start).unwrap(),
            end_time: EndDate::At(parse_timestamp(end).unwrap()),
            debug: false,
            ..ForcingConfig::default()
        })
        .unwrap();
        c
    }

    fn t2d(row: usize) -> f64 {
        ForcingVariable::AirTemperature.index() as f64 * 1000.0 + row as f64
    }

    #[test]
    fn uninitialized_calls_fail() {
        let mut c = ForcingComponent::new();
        assert_eq!(c.update(), Err(BmiError::NotInitialized));
        assert_eq!(c.get_value(T2D), Err(BmiError::NotInitialized));
        assert_eq!(c.get_component_name(), Err(BmiError::NotInitialized));
        assert_eq!(c.get_grid_rank(0), Err(BmiError::NotInitialized));
        assert_eq!(c.get_grid_face_count(0), Err(BmiError::NotInitialized));
        assert_eq!(c.finalize(), Err(BmiError::NotInitialized));
        assert!(!c.is_initialized());
    }

    #[test]
    fn cursor_starts_at_zero_and_indexes_table() {
        let mut c = component(48, "2007-01-01T05:00:00", "2007-01-02T05:00:00");
        assert_eq!(c.get_current_time().unwrap(), 0.0);
        assert_eq!(c.get_value(T2D).unwrap(), t2d(5));
        c.update().unwrap();
        assert_eq!(c.get_current_time().unwrap(), 1.0);
        assert_eq!(c.get_value(T2D).unwrap(), t2d(6));
    }

    #[test]
    fn end_time_is_hours_between_dates() {
        let c = component(48, "2007-01-01T05:00:00", "2007-01-02T05:00:00");
        assert_eq!(c.get_start_time().unwrap(), 0.0);
        assert_eq!(c.get_end_time().unwrap(), 24.0);
        assert_eq!(c.get_time_step().unwrap(), 3600.0);
        assert_eq!(c.get_time_units().unwrap(), "s");
    }

    #[test]
    fn update_until_ignores_targets_behind_cursor() {
        let mut c = component(48, "2007-01-01T00:00:00", "2007-01-02T00:00:00");
        c.update_until(3.0 * TIME_STEP_SECONDS).unwrap();
        assert_eq!(c.get_current_time().unwrap(), 3.0);
        c.update_until(-7200.0).unwrap();
        c.update_until(0.0).unwrap();
        c.update_until(f64::NAN).unwrap();
        assert_eq!(c.get_current_time().unwrap(), 3.0);
    }

    #[test]
    fn huge_update_until_target_is_rejected() {
        let mut c = component(48, "2007-01-01T00:00:00", "2007-01-02T00:00:00");
        c.update().unwrap();
        for target in [1.0e30, f64::INFINITY] {
            assert!(matches!(c.update_until(target), Err(BmiError::OutOfRange { .. })));
            assert_eq!(c.get_current_time().unwrap(), 1.0);
        }
        c.update().unwrap();
        assert_eq!(c.get_current_time().unwrap(), 2.0);
    }

    #[test]
    fn cursor_cannot_wrap() {
        let mut c = component(48, "2007-01-01T00:00:00", "2007-01-02T00:00:00");
        if let Phase::Running(session) = &mut c.phase {
            session.cursor = usize::MAX;
        }
        assert!(matches!(c.update(), Err(BmiError::OutOfRange { .. })));
        assert!(matches!(c.update_until(f64::MAX), Err(BmiError::OutOfRange { .. })));
        assert_eq!(c.get_current_time().unwrap(), usize::MAX as f64);
    }

    #[test]
    fn reading_past_table_end_is_out_of_range() {
        let mut c = component(48, "2007-01-01T00:00:00", "2007-01-01T02:00:00");
        c.update().unwrap();
        assert!(c.get_value(T2D).is_ok());
        c.update().unwrap();
        assert!(matches!(c.get_value(T2D), Err(BmiError::OutOfRange { .. })));
        assert!(matches!(c.get_value_ptr(T2D), Err(BmiError::OutOfRange { .. })));
        assert!(matches!(c.set_value(T2D, 1.0), Err(BmiError::OutOfRange { .. })));
        assert!(matches!(
            c.get_value_at_indices(T2D, &[0]),
            Err(BmiError::OutOfRange { .. })
        ));
    }

    #[test]
    fn only_item_zero_exists() {
        let mut c = component(48, "2007-01-01T00:00:00", "2007-01-01T02:00:00");
        assert_eq!(c.get_value_at_indices(T2D, &[0, 0]).unwrap(), vec![t2d(0), t2d(0)]);
        assert!(matches!(
            c.get_value_at_indices(T2D, &[1]),
            Err(BmiError::OutOfRange { .. })
        ));
        assert!(matches!(
            c.set_value_at_indices(T2D, &[1], &[2.0]),
            Err(BmiError::OutOfRange { .. })
        ));
        assert!(matches!(
            c.set_value_at_indices(T2D, &[0], &[]),
            Err(BmiError::InvalidArg { .. })
        ));

        c.set_value_at_indices(T2D, &[0], &[-3.0]).unwrap();
        assert_eq!(c.get_value(T2D).unwrap(), -3.0);
    }

    #[test]
    fn value_ptr_aliases_table() {
        let mut c = component(48, "2007-01-01T00:00:00", "2007-01-01T02:00:00");
        *c.get_value_ptr(T2D).unwrap() = 42.0;
        assert_eq!(c.get_value(T2D).unwrap(), 42.0);
        assert_eq!(
            c.store().unwrap().table().value(0, ForcingVariable::AirTemperature),
            Some(42.0)
        );
    }

    #[test]
    fn unknown_names_and_grids() {
        let c = component(48, "2007-01-01T00:00:00", "2007-01-01T02:00:00");
        assert!(matches!(c.get_value("T2D"), Err(BmiError::UnknownVariable { .. })));
        assert!(matches!(c.get_var_units("nope"), Err(BmiError::UnknownVariable { .. })));
        assert!(matches!(c.get_grid_size(1), Err(BmiError::OutOfRange { .. })));
    }

    #[test]
    fn spatial_queries_unsupported() {
        let c = component(48, "2007-01-01T00:00:00", "2007-01-01T02:00:00");
        let mut shape = [0_usize; 1];
        let mut coords = [0.0_f64; 1];
        assert!(matches!(
            c.get_grid_shape(0, &mut shape),
            Err(BmiError::UnsupportedOperation { .. })
        ));
        assert!(matches!(
            c.get_grid_x(0, &mut coords),
            Err(BmiError::UnsupportedOperation { .. })
        ));
        assert!(matches!(
            c.get_grid_face_count(0),
            Err(BmiError::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn double_initialize_is_rejected() {
        let mut c = component(48, "2007-01-01T00:00:00", "2007-01-01T02:00:00");
        assert_eq!(c.initialize(None), Err(BmiError::AlreadyInitialized));
        // The running session is untouched.
        assert_eq!(c.get_value(T2D).unwrap(), t2d(0));
    }

    #[test]
    fn finalize_is_terminal() {
        let mut c = component(48, "2007-01-01T00:00:00", "2007-01-01T02:00:00");
        c.finalize().unwrap();
        assert_eq!(c.get_value(T2D), Err(BmiError::NotInitialized));
        assert_eq!(c.update(), Err(BmiError::NotInitialized));
        assert_eq!(c.finalize(), Err(BmiError::NotInitialized));
        assert_eq!(c.initialize(None), Err(BmiError::AlreadyInitialized));
    }
}
