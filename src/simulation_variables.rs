use crate::boundary_regime::BoundaryRegime;
use crate::grid::EdgeKind;
use crate::{Grid, LayeredArray, ModelParameters, WorkingPrecision};

/// Values imposed on or extracted at boundary segments. Row `i` belongs to the edge at
/// position `grid.edge_ranges.boundary().start + i`.
pub struct BoundaryValues {
    pub h: Vec<WorkingPrecision>,

    pub u: LayeredArray<WorkingPrecision>,
    pub v: LayeredArray<WorkingPrecision>,
    pub w: LayeredArray<WorkingPrecision>,

    // Salinity and temperature
    pub s: LayeredArray<WorkingPrecision>,
    pub t: LayeredArray<WorkingPrecision>,

    pub regime: Vec<BoundaryRegime>,
}

impl BoundaryValues {
    pub fn new(grid: &Grid) -> Self {
        let num_segments = grid.edge_ranges.num_segments();
        let num_layers = grid.num_layers;

        let regime = grid
            .edge_ranges
            .boundary()
            .map(|position| match grid.edge_at(position).1.kind {
                EdgeKind::Open => BoundaryRegime::Open,
                _ => BoundaryRegime::Specified,
            })
            .collect();

        BoundaryValues {
            h: vec![0.0; num_segments],
            u: LayeredArray::new(num_segments, num_layers),
            v: LayeredArray::new(num_segments, num_layers),
            w: LayeredArray::new(num_segments, num_layers),
            s: LayeredArray::new(num_segments, num_layers),
            t: LayeredArray::new(num_segments, num_layers),
            regime,
        }
    }

    pub fn num_segments(&self) -> usize {
        self.h.len()
    }
}

pub struct SimulationVariables {
    // Free-surface height
    pub h: Vec<WorkingPrecision>,

    // Cell-centred horizontal velocity - current step
    pub uc: LayeredArray<WorkingPrecision>,
    pub vc: LayeredArray<WorkingPrecision>,

    // Cell-centred horizontal velocity - previous step
    pub uold: LayeredArray<WorkingPrecision>,
    pub vold: LayeredArray<WorkingPrecision>,

    // Vertical velocity on layer interfaces, one more than the number of layers
    pub w: LayeredArray<WorkingPrecision>,

    // Salinity and temperature
    pub s: LayeredArray<WorkingPrecision>,
    pub t: LayeredArray<WorkingPrecision>,

    // Edge-normal velocity
    pub u: LayeredArray<WorkingPrecision>,

    pub boundary: BoundaryValues,
}

impl SimulationVariables {
    pub fn new(model_params: &ModelParameters, grid: &Grid) -> Self {
        let num_cells = grid.num_cells();
        let num_layers = grid.num_layers;

        let mut simulation_vars = SimulationVariables {
            h: vec![0.0; num_cells],

            uc: LayeredArray::new(num_cells, num_layers),
            vc: LayeredArray::new(num_cells, num_layers),

            uold: LayeredArray::new(num_cells, num_layers),
            vold: LayeredArray::new(num_cells, num_layers),

            w: LayeredArray::new(num_cells, num_layers + 1),

            s: LayeredArray::new(num_cells, num_layers),
            t: LayeredArray::new(num_cells, num_layers),

            u: LayeredArray::new(grid.num_edges(), num_layers),

            boundary: BoundaryValues::new(grid),
        };

        simulation_vars.initialise(model_params, grid);
        simulation_vars
    }

    fn initialise(&mut self, model_params: &ModelParameters, grid: &Grid) {
        for (ic, cell) in grid.cells.iter().enumerate() {
            for k in cell.active_layers() {
                self.s.set(ic, k, model_params.background_salinity);
                self.t.set(ic, k, model_params.background_temperature);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_regimes_start_from_edge_kind() {
        let model_params = ModelParameters {
            num_cells_x: 2,
            num_cells_y: 3,
            ..ModelParameters::default()
        };
        let grid = Grid::channel(&model_params).unwrap();
        let simulation_vars = SimulationVariables::new(&model_params, &grid);
        let boundary = &simulation_vars.boundary;

        assert_eq!(boundary.num_segments(), 6);
        assert_eq!(
            boundary.regime,
            vec![
                BoundaryRegime::Open,
                BoundaryRegime::Open,
                BoundaryRegime::Open,
                BoundaryRegime::Specified,
                BoundaryRegime::Specified,
                BoundaryRegime::Specified,
            ]
        );
    }

    #[test]
    fn interior_scalars_start_at_background() {
        let model_params = ModelParameters {
            num_cells_x: 2,
            num_cells_y: 2,
            background_salinity: 33.5,
            background_temperature: 11.0,
            ..ModelParameters::default()
        };
        let grid = Grid::channel(&model_params).unwrap();
        let simulation_vars = SimulationVariables::new(&model_params, &grid);

        assert!(simulation_vars.s.iter().all(|&s| s == 33.5));
        assert!(simulation_vars.t.iter().all(|&t| t == 11.0));
        assert_eq!(simulation_vars.w.num_layers(), model_params.num_layers + 1);
    }
}
