#![warn(clippy::all)]

pub mod app_timers;
pub mod boundary_regime;
pub mod checksum;
pub mod error;
pub mod grid;
pub mod kernels;
pub mod layered_array;
pub mod model_parameters;
pub mod simulation_variables;
pub mod tidal_forcing;
pub mod timer;

use log::info;

use app_timers::AppTimers;
use kernels::{
    boundary_scalars_kernel, boundary_velocities_kernel, next_kernel, open_boundary_fluxes_kernel,
};
use tidal_forcing::{HarmonicForcing, TidalForcing};

pub use error::ModelError;
pub use grid::Grid;
pub use layered_array::LayeredArray;
pub use model_parameters::ModelParameters;
pub use simulation_variables::SimulationVariables;

pub type WorkingPrecision = f64;

/// Runs the boundary kernels over the demonstration channel for the configured steps.
///
/// Parameters come from `config_fname` (optional) and `OPENBC_*` environment variables. The
/// interior is never advanced beyond shifting time levels, so the run exercises the boundary
/// treatment in isolation.
pub fn run_simulation(config_fname: &str) -> Result<(), ModelError> {
    let model_params = ModelParameters::new(config_fname)?;
    info!("Model params: {:?}", model_params);

    let grid = Grid::channel(&model_params)?;
    let forcing = HarmonicForcing::from_parameters(&model_params);
    let mut simulation_vars = SimulationVariables::new(&model_params, &grid);

    info!(
        "Initialised grid with {} cells, {} layers and {} edges ({} open, {} specified, {} mixed).",
        grid.num_cells(),
        grid.num_layers,
        grid.num_edges(),
        grid.edge_ranges.open.len(),
        grid.edge_ranges.specified.len(),
        grid.edge_ranges.mixed.len(),
    );

    let initial_step_index = model_params.initial_step_index;
    let final_step_index = model_params.final_step_index;

    let mut app_timers = AppTimers::new(model_params.num_steps());

    for step_idx in initial_step_index..=final_step_index {
        step_simulation(
            &model_params,
            &grid,
            &forcing,
            &mut simulation_vars,
            step_idx,
            &mut app_timers,
        );
    }

    if !model_params.logs_step(final_step_index) {
        log_checksums(&simulation_vars, final_step_index);
    }
    info!("Kernel timing report:\n{}", app_timers.generate_report());

    Ok(())
}

/// One driver step. The flux update reads both interior time levels, so it runs before
/// `next_kernel` shifts them.
pub fn step_simulation<F: TidalForcing>(
    model_params: &ModelParameters,
    grid: &Grid,
    forcing: &F,
    simulation_vars: &mut SimulationVariables,
    step_idx: u32,
    app_timers: &mut AppTimers,
) {
    let current_time = WorkingPrecision::from(step_idx) * model_params.rdt;

    app_timers.step.start();

    open_boundary_fluxes_kernel(
        model_params,
        grid,
        simulation_vars,
        forcing,
        current_time,
        &mut app_timers.open_boundary_fluxes,
    );
    boundary_velocities_kernel(
        model_params,
        grid,
        simulation_vars,
        current_time,
        &mut app_timers.boundary_velocities,
    );
    boundary_scalars_kernel(
        model_params,
        grid,
        simulation_vars,
        &mut app_timers.boundary_scalars,
    );
    next_kernel(simulation_vars, &mut app_timers.next);

    app_timers.step.stop();

    if model_params.logs_step(step_idx) {
        log_checksums(simulation_vars, step_idx);
    }
}

fn log_checksums(simulation_vars: &SimulationVariables, step_idx: u32) {
    let boundary = &simulation_vars.boundary;
    let num_open = boundary
        .regime
        .iter()
        .filter(|regime| regime.is_open())
        .count();

    info!(
        "Step {}: u checksum = {:.8E}, boundary h checksum = {:.8E}, {} of {} segments open",
        step_idx,
        checksum::field_checksum(&simulation_vars.u),
        checksum::values_checksum(boundary.h.iter()),
        num_open,
        boundary.num_segments(),
    );
}
