use std::f64::consts::PI;

use serde_derive::Deserialize;

use crate::error::ModelError;
use crate::tidal_forcing::TidalConstituent;
use crate::WorkingPrecision;

/// Seconds in a 12 hour semidiurnal tidal period.
const SEMIDIURNAL_PERIOD: WorkingPrecision = 12.0 * 3600.0;

/// Seconds in a 24 hour diurnal tidal period.
const DIURNAL_PERIOD: WorkingPrecision = 24.0 * 3600.0;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    /// Number of cell columns in the demonstration channel
    pub num_cells_x: usize,

    // Number of cell rows in the demonstration channel
    pub num_cells_y: usize,

    // Cell size in x direction (in meters)
    pub dx: WorkingPrecision,

    // Cell size in y direction (in meters)
    pub dy: WorkingPrecision,

    /// Constant depth of the channel (in meters)
    pub dep_const: WorkingPrecision,

    /// Number of vertical layers
    pub num_layers: usize,

    /// Initial time step
    pub initial_step_index: u32,

    /// Final time step
    pub final_step_index: u32,

    /// Interval between checksum log lines
    pub output_interval: u32,

    /// Size of time step (in seconds)
    pub rdt: WorkingPrecision,

    /// Gravitational acceleration (in m/s^2)
    pub gravity: WorkingPrecision,

    /// Amplitude of the rectified tidal height imposed on specified segments (in meters)
    pub tidal_amplitude: WorkingPrecision,

    /// Angular frequency of the tide that drives regime selection (in rad/s)
    pub tidal_omega: WorkingPrecision,

    /// Time constant pulling the depth-averaged boundary velocity toward the forcing (in seconds)
    pub relaxation_timescale: WorkingPrecision,

    /// Internal wave speed used to radiate the baroclinic deviation (in m/s).
    ///
    /// This is a fixed approximation, not the first-mode speed of a modal decomposition, so the
    /// per-layer radiation does not behave as a true radiating condition.
    pub baroclinic_wave_speed: WorkingPrecision,

    /// Harmonic constituents summed into the barotropic forcing velocity
    pub tidal_constituents: Vec<TidalConstituent>,

    /// Boundary points with `x` at or beyond this limit are left unforced; `None` forces all
    pub forcing_x_limit: Option<WorkingPrecision>,

    /// Along-coast `y` position splitting mixed segments into the two channel halves
    pub regime_y_threshold: WorkingPrecision,

    /// Depth (positive down, in meters) at which the second boundary scalar switches value
    pub scalar_depth_threshold: WorkingPrecision,

    /// Second boundary scalar above the depth threshold
    pub scalar_value_above: WorkingPrecision,

    /// Second boundary scalar at and below the depth threshold
    pub scalar_value_below: WorkingPrecision,

    /// Test each layer at its centre depth instead of advancing the depth counter by a full
    /// thickness before and after every layer
    pub scalar_depth_at_layer_centre: bool,

    /// Initial interior salinity
    pub background_salinity: WorkingPrecision,

    /// Initial interior temperature
    pub background_temperature: WorkingPrecision,
}

impl Default for ModelParameters {
    fn default() -> Self {
        ModelParameters {
            num_cells_x: 20,
            num_cells_y: 30,
            dx: 100.0,
            dy: 100.0,
            dep_const: 10.0,
            num_layers: 10,
            initial_step_index: 1,
            final_step_index: 1000,
            output_interval: 100,
            rdt: 1.0,
            gravity: 9.81,
            tidal_amplitude: 1.0,
            tidal_omega: 2.0 * PI / SEMIDIURNAL_PERIOD,
            relaxation_timescale: 7200.0,
            baroclinic_wave_speed: 1.94,
            tidal_constituents: vec![
                TidalConstituent::new(0.002445, 2.0 * PI / SEMIDIURNAL_PERIOD, 0.0),
                TidalConstituent::new(0.00182, 2.0 * PI / DIURNAL_PERIOD, 0.656),
            ],
            forcing_x_limit: None,
            regime_y_threshold: 1500.0,
            scalar_depth_threshold: 10.0,
            scalar_value_above: 0.0,
            scalar_value_below: 1.0,
            scalar_depth_at_layer_centre: false,
            background_salinity: 0.0,
            background_temperature: 0.0,
        }
    }
}

impl ModelParameters {
    /// Loads parameters from the optional config file `config_fname` (any extension `config`
    /// understands) overridden by `OPENBC_*` environment variables, then validates them.
    pub fn new(config_fname: &str) -> Result<Self, ModelError> {
        let mut settings = config::Config::default();

        settings
            .merge(config::File::with_name(config_fname).required(false))?
            .merge(config::Environment::with_prefix("OPENBC"))?;

        let model_params: ModelParameters = settings.try_into()?;
        model_params.validate()?;

        Ok(model_params)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        check_positive("rdt", self.rdt)?;
        check_positive("gravity", self.gravity)?;
        check_positive("relaxation_timescale", self.relaxation_timescale)?;
        check_positive("dx", self.dx)?;
        check_positive("dy", self.dy)?;
        check_positive("dep_const", self.dep_const)?;
        check_positive("scalar_depth_threshold", self.scalar_depth_threshold)?;

        if !(self.baroclinic_wave_speed >= 0.0) {
            return Err(ModelError::invalid_parameter(
                "baroclinic_wave_speed",
                format!("must be non-negative, got {}", self.baroclinic_wave_speed),
            ));
        }
        if self.num_layers == 0 {
            return Err(ModelError::invalid_parameter(
                "num_layers",
                "at least one layer is required",
            ));
        }
        if self.num_cells_x == 0 || self.num_cells_y == 0 {
            return Err(ModelError::invalid_parameter(
                "num_cells_x",
                "the channel needs at least one cell in each direction",
            ));
        }
        if self.output_interval == 0 {
            return Err(ModelError::invalid_parameter(
                "output_interval",
                "must be at least one step",
            ));
        }
        if self.final_step_index < self.initial_step_index {
            return Err(ModelError::invalid_parameter(
                "final_step_index",
                format!(
                    "{} is before initial_step_index {}",
                    self.final_step_index, self.initial_step_index
                ),
            ));
        }

        Ok(())
    }

    /// Number of steps from `initial_step_index` to `final_step_index` inclusive.
    pub fn num_steps(&self) -> usize {
        (u64::from(self.final_step_index) - u64::from(self.initial_step_index) + 1) as usize
    }

    /// Whether checksums are logged after `step_idx`.
    pub fn logs_step(&self, step_idx: u32) -> bool {
        step_idx % self.output_interval == 0
    }
}

fn check_positive(name: &'static str, value: WorkingPrecision) -> Result<(), ModelError> {
    // Written as a negated comparison so NaN is rejected too.
    if !(value > 0.0) {
        return Err(ModelError::invalid_parameter(
            name,
            format!("must be positive, got {}", value),
        ));
    }
    Ok(())
}
