//! The coupling contract.

use std::path::Path;

use crate::error::BmiResult;

/// Identifier of a computational grid.
pub type GridId = u32;

/// Lifecycle, introspection and value access for a time-stepping component.
///
/// Variables are addressed by standard name and hold `f64` items. Components
/// without spatial structure answer the shape, spacing, coordinate and
/// topology queries with [`BmiError::UnsupportedOperation`].
///
/// [`BmiError::UnsupportedOperation`]: crate::BmiError::UnsupportedOperation
pub trait Bmi {
    // ---- lifecycle ----

    /// Prepare the component, optionally from a configuration file.
    fn initialize(&mut self, config_file: Option<&Path>) -> BmiResult<()>;

    /// Advance by one time step.
    fn update(&mut self) -> BmiResult<()>;

    /// Advance by whole time steps until `time` would be passed.
    fn update_until(&mut self, time: f64) -> BmiResult<()>;

    /// Release resources. The component cannot be used afterwards.
    fn finalize(&mut self) -> BmiResult<()>;

    // ---- component information ----

    fn get_component_name(&self) -> BmiResult<&str>;
    fn get_input_item_count(&self) -> BmiResult<usize>;
    fn get_output_item_count(&self) -> BmiResult<usize>;
    fn get_input_var_names(&self) -> BmiResult<Vec<&str>>;
    fn get_output_var_names(&self) -> BmiResult<Vec<&str>>;

    // ---- variable information ----

    fn get_var_grid(&self, name: &str) -> BmiResult<GridId>;
    fn get_var_type(&self, name: &str) -> BmiResult<&str>;
    fn get_var_units(&self, name: &str) -> BmiResult<&str>;
    fn get_var_itemsize(&self, name: &str) -> BmiResult<usize>;
    fn get_var_nbytes(&self, name: &str) -> BmiResult<usize>;
    fn get_var_location(&self, name: &str) -> BmiResult<&str>;

    // ---- time ----

    fn get_start_time(&self) -> BmiResult<f64>;
    fn get_end_time(&self) -> BmiResult<f64>;
    fn get_current_time(&self) -> BmiResult<f64>;
    fn get_time_step(&self) -> BmiResult<f64>;
    fn get_time_units(&self) -> BmiResult<&str>;

    // ---- values ----

    /// Copy of the variable's value at the current time step.
    fn get_value(&self, name: &str) -> BmiResult<f64>;

    /// Mutable reference to the variable's value at the current time step.
    fn get_value_ptr(&mut self, name: &str) -> BmiResult<&mut f64>;

    /// Items at flat `indices` of the variable's current value.
    fn get_value_at_indices(&self, name: &str, indices: &[usize]) -> BmiResult<Vec<f64>>;

    fn set_value(&mut self, name: &str, value: f64) -> BmiResult<()>;

    /// Overwrite items at flat `indices`; `values` pairs up with `indices`.
    fn set_value_at_indices(&mut self, name: &str, indices: &[usize], values: &[f64])
    -> BmiResult<()>;

    // ---- grid information ----

    fn get_grid_rank(&self, grid: GridId) -> BmiResult<usize>;
    fn get_grid_size(&self, grid: GridId) -> BmiResult<usize>;
    fn get_grid_type(&self, grid: GridId) -> BmiResult<&str>;

    // ---- structured grids ----

    fn get_grid_shape(&self, grid: GridId, shape: &mut [usize]) -> BmiResult<()>;
    fn get_grid_spacing(&self, grid: GridId, spacing: &mut [f64]) -> BmiResult<()>;
    fn get_grid_origin(&self, grid: GridId, origin: &mut [f64]) -> BmiResult<()>;
    fn get_grid_x(&self, grid: GridId, x: &mut [f64]) -> BmiResult<()>;
    fn get_grid_y(&self, grid: GridId, y: &mut [f64]) -> BmiResult<()>;
    fn get_grid_z(&self, grid: GridId, z: &mut [f64]) -> BmiResult<()>;

    // ---- unstructured grids ----

    fn get_grid_node_count(&self, grid: GridId) -> BmiResult<usize>;
    fn get_grid_edge_count(&self, grid: GridId) -> BmiResult<usize>;
    fn get_grid_face_count(&self, grid: GridId) -> BmiResult<usize>;
    fn get_grid_edge_nodes(&self, grid: GridId, edge_nodes: &mut [usize]) -> BmiResult<()>;
    fn get_grid_face_edges(&self, grid: GridId, face_edges: &mut [usize]) -> BmiResult<()>;
    fn get_grid_face_nodes(&self, grid: GridId, face_nodes: &mut [usize]) -> BmiResult<()>;
    fn get_grid_nodes_per_face(&self, grid: GridId, nodes_per_face: &mut [usize])
    -> BmiResult<()>;
}
