use crate::boundary_regime::{select_regime, BoundaryRegime};
use crate::tidal_forcing::{ForcingPoint, TidalForcing};
use crate::timer::Timer;
use crate::{Grid, ModelParameters, SimulationVariables, WorkingPrecision};

/// Advances the depth-averaged normal velocity at one open edge.
///
/// First-order implicit relaxation toward `forcing_velocity`, radiating with Courant number
/// `courant` and a three-point backward estimate `3 * normal_velocity - normal_velocity_old`
/// of the interior flux. `relaxation` is `dt / timescale`; `forced` switches the forcing on.
#[inline(always)]
pub fn relax_barotropic_velocity(
    u0: WorkingPrecision,
    normal_velocity: WorkingPrecision,
    normal_velocity_old: WorkingPrecision,
    courant: WorkingPrecision,
    relaxation: WorkingPrecision,
    forced: bool,
    forcing_velocity: WorkingPrecision,
) -> WorkingPrecision {
    let forced = if forced { 1.0 } else { 0.0 };

    // The denominator keeps the relaxation term even when unforced.
    ((1.0 - 0.5 * courant - 0.5 * forced * relaxation) * u0
        + 0.5 * courant * (3.0 * normal_velocity - normal_velocity_old)
        + forced * forcing_velocity * relaxation)
        / (1.0 + 0.5 * courant + 0.5 * relaxation)
}

/// Radiates a per-layer deviation from the depth average with Courant number `courant`.
/// Internal waves are never forced.
#[inline(always)]
pub fn radiate_baroclinic_deviation(
    deviation: WorkingPrecision,
    interior_deviation: WorkingPrecision,
    interior_deviation_old: WorkingPrecision,
    courant: WorkingPrecision,
) -> WorkingPrecision {
    ((1.0 - 0.5 * courant) * deviation
        + 0.5 * courant * (3.0 * interior_deviation - interior_deviation_old))
        / (1.0 + 0.5 * courant)
}

/// Rectified tidal height imposed on specified segments.
#[inline(always)]
pub fn specified_height(
    amplitude: WorkingPrecision,
    omega: WorkingPrecision,
    time: WorkingPrecision,
) -> WorkingPrecision {
    amplitude * (omega * time).cos().abs()
}

/// Two-valued synthetic scalar: `above` for layers tested shallower than `threshold`,
/// `below` otherwise.
#[inline(always)]
pub fn depth_step_value(
    layer_depth: WorkingPrecision,
    threshold: WorkingPrecision,
    above: WorkingPrecision,
    below: WorkingPrecision,
) -> WorkingPrecision {
    if layer_depth < threshold {
        above
    } else {
        below
    }
}

/// Updates the normal velocity of every active layer at the open edges.
///
/// Must run before the interior velocity is advanced: it blends the current (`uc`, `vc`) and
/// previous (`uold`, `vold`) time levels. The per-layer radiation uses the fixed
/// `baroclinic_wave_speed` rather than a modal wave speed, so it is only an approximate
/// radiating condition.
pub fn open_boundary_fluxes_kernel<F: TidalForcing>(
    model_params: &ModelParameters,
    grid: &Grid,
    simulation_vars: &mut SimulationVariables,
    forcing: &F,
    current_time: WorkingPrecision,
    kernel_timer: &mut Timer,
) {
    let dt = model_params.rdt;
    let c1 = model_params.baroclinic_wave_speed;
    let relaxation = dt / model_params.relaxation_timescale;

    let SimulationVariables {
        h,
        uc,
        vc,
        uold,
        vold,
        u,
        ..
    } = simulation_vars;

    kernel_timer.start();

    for position in grid.edge_ranges.open.clone() {
        let (je, edge) = grid.edge_at(position);
        if edge.active_layers().is_empty() {
            continue;
        }

        let ib = edge.inner_cell;
        let cell = &grid.cells[ib];

        let water_column = cell.depth + h[ib];
        assert!(
            water_column > 0.0,
            "Open edge {} borders cell {} with non-positive water column {}.",
            je,
            ib,
            water_column
        );
        assert!(
            edge.length > 0.0,
            "Open edge {} has non-positive length {}.",
            je,
            edge.length
        );

        let boundary_forcing = forcing.evaluate(&ForcingPoint {
            x: cell.x,
            y: cell.y,
            time: current_time,
            free_surface: h[ib],
            depth: cell.depth,
            omega: model_params.tidal_omega,
            amplitude: model_params.tidal_amplitude,
        });

        let c0 = (model_params.gravity * cell.depth).sqrt();

        // Depth averages of the edge velocity and of the interior velocity at both time levels
        let mut u0 = 0.0;
        let mut uc0 = 0.0;
        let mut vc0 = 0.0;
        let mut uc0_old = 0.0;
        let mut vc0_old = 0.0;
        for k in edge.active_layers() {
            let dz = cell.layer_thickness[k];
            u0 += u.get(je, k) * dz;
            uc0 += uc.get(ib, k) * dz;
            vc0 += vc.get(ib, k) * dz;
            uc0_old += uold.get(ib, k) * dz;
            vc0_old += vold.get(ib, k) * dz;
        }
        u0 /= water_column;
        uc0 /= water_column;
        vc0 /= water_column;
        uc0_old /= water_column;
        vc0_old /= water_column;

        let courant0 = 2.0 * c0 * dt / edge.length;
        let courant1 = 2.0 * c1 * dt / edge.length;

        let u0_new = relax_barotropic_velocity(
            u0,
            edge.normal_component(uc0, vc0),
            edge.normal_component(uc0_old, vc0_old),
            courant0,
            relaxation,
            boundary_forcing.forced,
            boundary_forcing.velocity,
        );

        for k in edge.active_layers() {
            let interior_deviation =
                edge.normal_component(uc.get(ib, k) - uc0, vc.get(ib, k) - vc0);
            let interior_deviation_old =
                edge.normal_component(uold.get(ib, k) - uc0_old, vold.get(ib, k) - vc0_old);

            let deviation = radiate_baroclinic_deviation(
                u.get(je, k) - u0,
                interior_deviation,
                interior_deviation_old,
                courant1,
            );
            u.set(je, k, u0_new + deviation);
        }
    }

    kernel_timer.stop();
}

/// Selects the regime of every mixed segment and fills its boundary height and velocities.
pub fn boundary_velocities_kernel(
    model_params: &ModelParameters,
    grid: &Grid,
    simulation_vars: &mut SimulationVariables,
    current_time: WorkingPrecision,
    kernel_timer: &mut Timer,
) {
    let omega = model_params.tidal_omega;
    let tidal_height = specified_height(model_params.tidal_amplitude, omega, current_time);

    let SimulationVariables {
        h,
        uc,
        vc,
        w,
        u,
        boundary,
        ..
    } = simulation_vars;

    kernel_timer.start();

    for position in grid.edge_ranges.mixed.clone() {
        let (je, edge) = grid.edge_at(position);
        let ib = edge.inner_cell;
        let cell = &grid.cells[ib];
        let segment = grid.edge_ranges.segment_index(position);

        let regime = select_regime(omega, current_time, cell.y, model_params.regime_y_threshold);
        boundary.regime[segment] = regime;

        match regime {
            BoundaryRegime::Open => {
                boundary.h[segment] = h[ib];
                for k in cell.active_layers() {
                    boundary.u.set(segment, k, uc.get(ib, k));
                    boundary.v.set(segment, k, vc.get(ib, k));
                }
            }
            BoundaryRegime::Specified => {
                boundary.h[segment] = tidal_height;
                for k in cell.active_layers() {
                    boundary.u.set(segment, k, u.get(je, k) * edge.normal_x);
                    boundary.v.set(segment, k, u.get(je, k) * edge.normal_y);
                }
            }
        }

        for k in cell.active_layers() {
            boundary
                .w
                .set(segment, k, 0.5 * (w.get(ib, k) + w.get(ib, k + 1)));
        }
    }

    kernel_timer.stop();
}

/// Fills the boundary scalars of every boundary segment from the adjacent cell. Salinity is
/// copied; temperature is a step function of depth.
///
/// By default layer `k` is tested at `2 * (dz_0 + .. + dz_{k-1}) + dz_k`, the depth counter
/// advancing by a full thickness both before and after each test.
/// `scalar_depth_at_layer_centre` tests the layer-centre depth instead.
pub fn boundary_scalars_kernel(
    model_params: &ModelParameters,
    grid: &Grid,
    simulation_vars: &mut SimulationVariables,
    kernel_timer: &mut Timer,
) {
    let SimulationVariables { s, boundary, .. } = simulation_vars;

    kernel_timer.start();

    for position in grid.edge_ranges.boundary() {
        let (_, edge) = grid.edge_at(position);
        let ib = edge.inner_cell;
        let cell = &grid.cells[ib];
        let segment = grid.edge_ranges.segment_index(position);

        let mut layer_top = 0.0;
        let mut counter_depth = 0.0;
        for k in cell.active_layers() {
            let dz = cell.layer_thickness[k];
            counter_depth += dz;

            let tested_depth = if model_params.scalar_depth_at_layer_centre {
                layer_top + 0.5 * dz
            } else {
                counter_depth
            };

            boundary.s.set(segment, k, s.get(ib, k));
            boundary.t.set(
                segment,
                k,
                depth_step_value(
                    tested_depth,
                    model_params.scalar_depth_threshold,
                    model_params.scalar_value_above,
                    model_params.scalar_value_below,
                ),
            );

            counter_depth += dz;
            layer_top += dz;
        }
    }

    kernel_timer.stop();
}

/// Moves the current interior velocity into the previous time level.
pub fn next_kernel(simulation_vars: &mut SimulationVariables, kernel_timer: &mut Timer) {
    kernel_timer.start();

    simulation_vars.uold.copy_from(&simulation_vars.uc);
    simulation_vars.vold.copy_from(&simulation_vars.vc);

    kernel_timer.stop();
}
