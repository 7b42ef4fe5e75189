//! Barotropic forcing velocity at open boundary points.
//!
//! The forcing is a harmonic sum `ub(t) = Σ aᵢ cos(ωᵢ t + φᵢ)`. Evaluation takes the full
//! position and local water column of the boundary point so that position-dependent variants
//! can replace the default without touching the flux kernel.

use serde_derive::Deserialize;

use crate::model_parameters::ModelParameters;
use crate::WorkingPrecision;

/// One harmonic component of the forcing velocity.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TidalConstituent {
    /// Velocity amplitude (in m/s)
    pub amplitude: WorkingPrecision,

    /// Angular frequency (in rad/s)
    pub angular_frequency: WorkingPrecision,

    /// Phase (in radians)
    #[serde(default)]
    pub phase: WorkingPrecision,
}

impl TidalConstituent {
    pub fn new(
        amplitude: WorkingPrecision,
        angular_frequency: WorkingPrecision,
        phase: WorkingPrecision,
    ) -> Self {
        TidalConstituent {
            amplitude,
            angular_frequency,
            phase,
        }
    }

    pub fn evaluate(&self, time: WorkingPrecision) -> WorkingPrecision {
        self.amplitude * (self.angular_frequency * time + self.phase).cos()
    }
}

/// Where and when the forcing is evaluated.
#[derive(Clone, Copy, Debug)]
pub struct ForcingPoint {
    pub x: WorkingPrecision,
    pub y: WorkingPrecision,
    pub time: WorkingPrecision,

    /// Free-surface height of the interior cell
    pub free_surface: WorkingPrecision,

    /// Bottom depth of the interior cell
    pub depth: WorkingPrecision,

    pub omega: WorkingPrecision,
    pub amplitude: WorkingPrecision,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryForcing {
    /// Barotropic forcing velocity along the edge normal
    pub velocity: WorkingPrecision,

    /// When false the boundary is purely radiating and `velocity` is ignored
    pub forced: bool,
}

pub trait TidalForcing {
    fn evaluate(&self, point: &ForcingPoint) -> BoundaryForcing;
}

/// Multi-constituent harmonic forcing.
///
/// Every point is forced unless an x-limit is set, in which case points at or beyond the limit
/// radiate freely.
#[derive(Clone, Debug)]
pub struct HarmonicForcing {
    pub constituents: Vec<TidalConstituent>,
    pub x_limit: Option<WorkingPrecision>,
}

impl HarmonicForcing {
    pub fn new(constituents: Vec<TidalConstituent>) -> Self {
        HarmonicForcing {
            constituents,
            x_limit: None,
        }
    }

    pub fn from_parameters(model_params: &ModelParameters) -> Self {
        HarmonicForcing {
            constituents: model_params.tidal_constituents.clone(),
            x_limit: model_params.forcing_x_limit,
        }
    }

    pub fn velocity_at(&self, time: WorkingPrecision) -> WorkingPrecision {
        self.constituents
            .iter()
            .map(|constituent| constituent.evaluate(time))
            .sum()
    }
}

impl TidalForcing for HarmonicForcing {
    fn evaluate(&self, point: &ForcingPoint) -> BoundaryForcing {
        match self.x_limit {
            Some(x_limit) if point.x >= x_limit => BoundaryForcing {
                velocity: 0.0,
                forced: false,
            },
            _ => BoundaryForcing {
                velocity: self.velocity_at(point.time),
                forced: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    use super::*;

    fn point_at(x: WorkingPrecision, time: WorkingPrecision) -> ForcingPoint {
        ForcingPoint {
            x,
            y: 0.0,
            time,
            free_surface: 0.0,
            depth: 10.0,
            omega: 2.0 * PI / (12.0 * 3600.0),
            amplitude: 1.0,
        }
    }

    #[test]
    fn default_forcing_is_always_forced() {
        let forcing = HarmonicForcing::from_parameters(&ModelParameters::default());

        for &x in &[-1.0e6, 0.0, 999.0, 1000.0, 1.0e6] {
            assert!(forcing.evaluate(&point_at(x, 3600.0)).forced);
        }
    }

    #[test]
    fn default_constituents_sum_at_time_zero() {
        let forcing = HarmonicForcing::from_parameters(&ModelParameters::default());
        let result = forcing.evaluate(&point_at(0.0, 0.0));

        assert_relative_eq!(
            result.velocity,
            0.002445 + 0.00182 * 0.656_f64.cos(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn constituents_keep_independent_phase() {
        let forcing = HarmonicForcing::new(vec![
            TidalConstituent::new(1.0, 1.0, 0.0),
            TidalConstituent::new(0.5, 2.0, PI / 2.0),
        ]);

        assert_relative_eq!(forcing.velocity_at(0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            forcing.velocity_at(PI / 2.0),
            0.5 * (PI + PI / 2.0).cos(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn points_beyond_x_limit_radiate_freely() {
        let mut forcing = HarmonicForcing::from_parameters(&ModelParameters::default());
        forcing.x_limit = Some(1000.0);

        let west = forcing.evaluate(&point_at(500.0, 0.0));
        let east = forcing.evaluate(&point_at(1000.0, 0.0));

        assert!(west.forced);
        assert!(west.velocity != 0.0);
        assert_eq!(
            east,
            BoundaryForcing {
                velocity: 0.0,
                forced: false
            }
        );
    }

    #[test]
    fn evaluation_is_deterministic() {
        let forcing = HarmonicForcing::from_parameters(&ModelParameters::default());
        let point = point_at(10.0, 12345.0);
        assert_eq!(forcing.evaluate(&point), forcing.evaluate(&point));
    }
}
