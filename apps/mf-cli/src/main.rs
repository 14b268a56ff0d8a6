use clap::{Parser, Subcommand};
use mf_bmi::{Bmi, BmiError, BmiResult, ForcingComponent, GridId};
use mf_core::ForcingVariable;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mf-cli")]
#[command(about = "MetForce CLI - serve hourly forcing data through the coupling interface", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the component, print its metadata and step through forcing rows
    Run {
        /// Path to the forcing configuration YAML file
        config_path: PathBuf,
        /// Number of time steps to advance
        #[arg(long, default_value_t = 5)]
        steps: usize,
    },
    /// Call every interface method and report which ones fail
    Check {
        /// Path to the forcing configuration YAML file
        config_path: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Bmi(#[from] BmiError),

    #[error("{} interface call(s) failed: {}", .names.len(), .names.join(", "))]
    ChecksFailed { names: Vec<&'static str> },
}

type CliResult<T> = Result<T, CliError>;

const GRID: GridId = 0;

fn main() -> CliResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config_path, steps } => cmd_run(&config_path, steps),
        Commands::Check { config_path } => cmd_check(&config_path),
    }
}

fn output_names(bmi: &impl Bmi) -> BmiResult<Vec<String>> {
    Ok(bmi
        .get_output_var_names()?
        .into_iter()
        .map(str::to_owned)
        .collect())
}

fn short_name(name: &str) -> &str {
    ForcingVariable::from_standard_name(name).map_or(name, |v| v.short_name())
}

fn cmd_run(config_path: &Path, steps: usize) -> CliResult<()> {
    println!("Initializing from: {}", config_path.display());
    let mut bmi = ForcingComponent::new();
    bmi.initialize(Some(config_path))?;
    tracing::info!(config = %config_path.display(), "forcing component initialized");

    println!("\nMODEL INFORMATION");
    println!("  component name: {}", bmi.get_component_name()?);
    println!("  output item count: {}", bmi.get_output_item_count()?);
    println!("  start time: {}", bmi.get_start_time()?);
    println!("  end time: {}", bmi.get_end_time()?);

    println!("\nVARIABLE INFORMATION");
    for name in output_names(&bmi)? {
        println!("  {name} ({})", short_name(&name));
        println!("    units: {}", bmi.get_var_units(&name)?);
        println!("    itemsize: {}", bmi.get_var_itemsize(&name)?);
        println!("    type: {}", bmi.get_var_type(&name)?);
        println!("    nbytes: {}", bmi.get_var_nbytes(&name)?);
        println!("    grid: {}", bmi.get_var_grid(&name)?);
        println!("    location: {}", bmi.get_var_location(&name)?);
    }

    println!("\nGRID INFORMATION");
    println!("  grid id: {GRID}");
    println!("    rank: {}", bmi.get_grid_rank(GRID)?);
    println!("    size: {}", bmi.get_grid_size(GRID)?);
    println!("    type: {}", bmi.get_grid_type(GRID)?);

    let names = output_names(&bmi)?;
    for _ in 0..steps {
        bmi.update()?;
        println!("\ncurrent time: {}", bmi.get_current_time()?);
        for name in &names {
            println!("  {}: {}", short_name(name), bmi.get_value(name)?);
        }
    }

    bmi.finalize()?;
    tracing::info!(steps, "forcing run finished");
    Ok(())
}

/// Pass/fail tally for [`cmd_check`].
#[derive(Default)]
struct Tally {
    passed: usize,
    failed: Vec<&'static str>,
}

impl Tally {
    fn record<T: Debug>(&mut self, call: &'static str, result: BmiResult<T>) -> Option<T> {
        match result {
            Ok(value) => {
                println!("  {call}: {value:?}");
                self.passed += 1;
                Some(value)
            }
            Err(err) => {
                println!("  *ERROR* {call}: {err}");
                self.failed.push(call);
                None
            }
        }
    }

    /// A call the component may legitimately decline.
    fn record_optional<T: Debug>(&mut self, call: &'static str, result: BmiResult<T>) {
        match result {
            Err(BmiError::UnsupportedOperation { .. }) => {
                println!("  {call}: not supported");
                self.passed += 1;
            }
            other => {
                self.record(call, other);
            }
        }
    }

    /// A call that must fail with `expected`.
    fn record_rejected<T: Debug>(
        &mut self,
        call: &'static str,
        result: BmiResult<T>,
        expected: &BmiError,
    ) {
        match result {
            Err(ref err) if err == expected => {
                println!("  {call}: rejected ({err})");
                self.passed += 1;
            }
            other => {
                println!("  *ERROR* {call}: expected {expected}, got {other:?}");
                self.failed.push(call);
            }
        }
    }
}

fn cmd_check(config_path: &Path) -> CliResult<()> {
    let mut bmi = ForcingComponent::new();
    let mut tally = Tally::default();

    println!("LIFECYCLE");
    tally.record_rejected("update (before initialize)", bmi.update(), &BmiError::NotInitialized);
    tally.record("initialize", bmi.initialize(Some(config_path)));
    if !bmi.is_initialized() {
        tracing::error!(
            config = %config_path.display(),
            "initialize failed, skipping remaining checks"
        );
        return Err(CliError::ChecksFailed { names: tally.failed });
    }

    println!("\nMODEL INFORMATION");
    tally.record("get_component_name", bmi.get_component_name());
    tally.record("get_input_item_count", bmi.get_input_item_count());
    tally.record("get_output_item_count", bmi.get_output_item_count());
    tally.record("get_input_var_names", bmi.get_input_var_names());
    let names = tally
        .record("get_output_var_names", output_names(&bmi))
        .unwrap_or_default();

    println!("\nVARIABLE INFORMATION");
    for name in &names {
        println!(" {name}");
        tally.record("get_var_units", bmi.get_var_units(name));
        tally.record("get_var_itemsize", bmi.get_var_itemsize(name));
        tally.record("get_var_type", bmi.get_var_type(name));
        tally.record("get_var_nbytes", bmi.get_var_nbytes(name));
        tally.record("get_var_grid", bmi.get_var_grid(name));
        tally.record("get_var_location", bmi.get_var_location(name));
    }

    println!("\nGRID INFORMATION");
    tally.record("get_grid_rank", bmi.get_grid_rank(GRID));
    tally.record("get_grid_size", bmi.get_grid_size(GRID));
    tally.record("get_grid_type", bmi.get_grid_type(GRID));
    let mut shape = [0_usize; 1];
    let mut coords = [0.0_f64; 1];
    tally.record_optional("get_grid_shape", bmi.get_grid_shape(GRID, &mut shape));
    tally.record_optional("get_grid_spacing", bmi.get_grid_spacing(GRID, &mut coords));
    tally.record_optional("get_grid_origin", bmi.get_grid_origin(GRID, &mut coords));
    tally.record_optional("get_grid_x", bmi.get_grid_x(GRID, &mut coords));
    tally.record_optional("get_grid_y", bmi.get_grid_y(GRID, &mut coords));
    tally.record_optional("get_grid_z", bmi.get_grid_z(GRID, &mut coords));
    tally.record_optional("get_grid_node_count", bmi.get_grid_node_count(GRID));
    tally.record_optional("get_grid_edge_count", bmi.get_grid_edge_count(GRID));
    tally.record_optional("get_grid_face_count", bmi.get_grid_face_count(GRID));
    tally.record_optional("get_grid_edge_nodes", bmi.get_grid_edge_nodes(GRID, &mut shape));
    tally.record_optional("get_grid_face_edges", bmi.get_grid_face_edges(GRID, &mut shape));
    tally.record_optional("get_grid_face_nodes", bmi.get_grid_face_nodes(GRID, &mut shape));
    tally.record_optional(
        "get_grid_nodes_per_face",
        bmi.get_grid_nodes_per_face(GRID, &mut shape),
    );

    println!("\nTIME INFORMATION");
    tally.record("get_start_time", bmi.get_start_time());
    tally.record("get_end_time", bmi.get_end_time());
    tally.record("get_time_step", bmi.get_time_step());
    tally.record("get_time_units", bmi.get_time_units());

    println!("\nVALUES");
    for _ in 0..5 {
        tally.record("update", bmi.update());
        tally.record("get_current_time", bmi.get_current_time());
        for name in &names {
            println!(" {}", short_name(name));
            tally.record("get_value", bmi.get_value(name));
            tally.record("get_value_ptr", bmi.get_value_ptr(name).map(|v| *v));
            tally.record("get_value_at_indices", bmi.get_value_at_indices(name, &[0]));
        }
    }
    if let Some(name) = names.first() {
        let original = bmi.get_value(name);
        tally.record("set_value", bmi.set_value(name, -1.0));
        tally.record("set_value_at_indices", bmi.set_value_at_indices(name, &[0], &[-2.0]));
        if let Ok(value) = original {
            bmi.set_value(name, value)?;
        }
    }
    let target = bmi.get_current_time()? + 10.0 * bmi.get_time_step()?;
    tally.record("update_until", bmi.update_until(target));
    tally.record("get_current_time", bmi.get_current_time());

    println!("\nFINALIZE");
    tally.record("finalize", bmi.finalize());
    tally.record_rejected(
        "get_current_time (after finalize)",
        bmi.get_current_time(),
        &BmiError::NotInitialized,
    );

    tracing::info!(
        passed = tally.passed,
        failed = tally.failed.len(),
        "interface check finished"
    );
    println!("\nTotal passed: {}", tally.passed);
    println!("Total failed: {}", tally.failed.len());
    if tally.failed.is_empty() {
        Ok(())
    } else {
        Err(CliError::ChecksFailed { names: tally.failed })
    }
}
