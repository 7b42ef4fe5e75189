use std::ops::Range;

use crate::error::ModelError;
use crate::{ModelParameters, WorkingPrecision};

const NORMAL_TOLERANCE: WorkingPrecision = 1.0e-6;

/// Edge types, in the order their ranges appear in `Grid::edge_order`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EdgeKind {
    Interior,
    Closed,
    /// Normal velocity advanced by the radiation/relaxation scheme
    Open,
    /// Always clamped to the prescribed tide
    Specified,
    /// Regime chosen every step from tidal phase and position
    Mixed,
}

/// A water column.
#[derive(Clone, Debug)]
pub struct Cell {
    pub x: WorkingPrecision,
    pub y: WorkingPrecision,

    /// Bottom depth below the undisturbed surface (positive down)
    pub depth: WorkingPrecision,

    /// Active layers are `top_layer..bottom_layer`, counted from the surface
    pub top_layer: usize,
    pub bottom_layer: usize,

    /// Thickness of every layer, sized to the grid's layer count
    pub layer_thickness: Vec<WorkingPrecision>,
}

impl Cell {
    pub fn active_layers(&self) -> Range<usize> {
        self.top_layer..self.bottom_layer
    }
}

/// A horizontal face. Boundary edges have a single, inner, neighbour.
#[derive(Clone, Debug)]
pub struct Edge {
    pub kind: EdgeKind,
    pub inner_cell: usize,
    pub outer_cell: Option<usize>,

    /// Unit normal pointing out of `inner_cell`
    pub normal_x: WorkingPrecision,
    pub normal_y: WorkingPrecision,

    /// Horizontal length scale across the edge used for Courant numbers
    pub length: WorkingPrecision,

    pub top_layer: usize,
    pub bottom_layer: usize,
}

impl Edge {
    pub fn active_layers(&self) -> Range<usize> {
        self.top_layer..self.bottom_layer
    }

    /// Component of `(u, v)` along the outward normal.
    #[inline(always)]
    pub fn normal_component(&self, u: WorkingPrecision, v: WorkingPrecision) -> WorkingPrecision {
        self.normal_x * u + self.normal_y * v
    }
}

/// Contiguous ranges of positions in `Grid::edge_order`, one per edge kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeRanges {
    pub interior: Range<usize>,
    pub closed: Range<usize>,
    pub open: Range<usize>,
    pub specified: Range<usize>,
    pub mixed: Range<usize>,
}

impl EdgeRanges {
    /// Every open, specified and mixed position. Boundary mirror arrays are indexed from the
    /// start of this range.
    pub fn boundary(&self) -> Range<usize> {
        self.open.start..self.mixed.end
    }

    pub fn num_segments(&self) -> usize {
        self.boundary().len()
    }

    #[inline(always)]
    pub fn segment_index(&self, position: usize) -> usize {
        debug_assert!(self.boundary().contains(&position));
        position - self.open.start
    }

    fn range_for(&mut self, kind: EdgeKind) -> &mut Range<usize> {
        match kind {
            EdgeKind::Interior => &mut self.interior,
            EdgeKind::Closed => &mut self.closed,
            EdgeKind::Open => &mut self.open,
            EdgeKind::Specified => &mut self.specified,
            EdgeKind::Mixed => &mut self.mixed,
        }
    }
}

pub struct Grid {
    pub num_layers: usize,
    pub cells: Vec<Cell>,
    pub edges: Vec<Edge>,

    /// Edge indices grouped by kind; `edge_order[position]` is an index into `edges`
    pub edge_order: Vec<usize>,
    pub edge_ranges: EdgeRanges,
}

impl Grid {
    /// Validates the mesh and groups the edges into contiguous ranges by kind, keeping the
    /// original relative order within each kind.
    pub fn new(num_layers: usize, cells: Vec<Cell>, edges: Vec<Edge>) -> Result<Self, ModelError> {
        if num_layers == 0 {
            return Err(ModelError::malformed_grid("a grid needs at least one layer"));
        }
        for (idx, cell) in cells.iter().enumerate() {
            validate_cell(idx, cell, num_layers)?;
        }
        for (idx, edge) in edges.iter().enumerate() {
            validate_edge(idx, edge, cells.len(), num_layers)?;
        }

        let mut edge_order: Vec<usize> = (0..edges.len()).collect();
        edge_order.sort_by_key(|&idx| edges[idx].kind);

        let mut edge_ranges = EdgeRanges::default();
        let mut position = 0;
        for &kind in &[
            EdgeKind::Interior,
            EdgeKind::Closed,
            EdgeKind::Open,
            EdgeKind::Specified,
            EdgeKind::Mixed,
        ] {
            let count = edges.iter().filter(|edge| edge.kind == kind).count();
            *edge_ranges.range_for(kind) = position..position + count;
            position += count;
        }

        Ok(Grid {
            num_layers,
            cells,
            edges,
            edge_order,
            edge_ranges,
        })
    }

    /// Rectangular channel of uniformly layered cells: the west side is open, the east side is
    /// mixed and the north and south sides are walls.
    pub fn channel(model_params: &ModelParameters) -> Result<Self, ModelError> {
        let nx = model_params.num_cells_x;
        let ny = model_params.num_cells_y;
        let dx = model_params.dx;
        let dy = model_params.dy;
        let num_layers = model_params.num_layers;

        let cell_idx = |ji: usize, jj: usize| jj * nx + ji;
        let thickness = model_params.dep_const / num_layers as WorkingPrecision;

        let mut cells = Vec::with_capacity(nx * ny);
        for jj in 0..ny {
            for ji in 0..nx {
                cells.push(Cell {
                    x: dx * (ji as WorkingPrecision + 0.5),
                    y: dy * (jj as WorkingPrecision + 0.5),
                    depth: model_params.dep_const,
                    top_layer: 0,
                    bottom_layer: num_layers,
                    layer_thickness: vec![thickness; num_layers],
                });
            }
        }

        let face = |kind: EdgeKind,
                    inner_cell: usize,
                    outer_cell: Option<usize>,
                    normal_x: WorkingPrecision,
                    normal_y: WorkingPrecision,
                    length: WorkingPrecision| Edge {
            kind,
            inner_cell,
            outer_cell,
            normal_x,
            normal_y,
            length,
            top_layer: 0,
            bottom_layer: num_layers,
        };

        let mut edges = Vec::new();
        for jj in 0..ny {
            // Faces normal to x
            for ji in 0..=nx {
                let edge = if ji == 0 {
                    face(EdgeKind::Open, cell_idx(0, jj), None, -1.0, 0.0, dx)
                } else if ji == nx {
                    face(EdgeKind::Mixed, cell_idx(nx - 1, jj), None, 1.0, 0.0, dx)
                } else {
                    face(
                        EdgeKind::Interior,
                        cell_idx(ji - 1, jj),
                        Some(cell_idx(ji, jj)),
                        1.0,
                        0.0,
                        dx,
                    )
                };
                edges.push(edge);
            }
        }
        for jj in 0..=ny {
            // Faces normal to y
            for ji in 0..nx {
                let edge = if jj == 0 {
                    face(EdgeKind::Closed, cell_idx(ji, 0), None, 0.0, -1.0, dy)
                } else if jj == ny {
                    face(EdgeKind::Closed, cell_idx(ji, ny - 1), None, 0.0, 1.0, dy)
                } else {
                    face(
                        EdgeKind::Interior,
                        cell_idx(ji, jj - 1),
                        Some(cell_idx(ji, jj)),
                        0.0,
                        1.0,
                        dy,
                    )
                };
                edges.push(edge);
            }
        }

        Grid::new(num_layers, cells, edges)
    }

    /// Edge index and edge stored at `position` of the kind-sorted ordering.
    #[inline(always)]
    pub fn edge_at(&self, position: usize) -> (usize, &Edge) {
        let edge_idx = self.edge_order[position];
        (edge_idx, &self.edges[edge_idx])
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
}

fn validate_cell(idx: usize, cell: &Cell, num_layers: usize) -> Result<(), ModelError> {
    if !(cell.depth > 0.0) {
        return Err(ModelError::malformed_grid(format!(
            "cell {} has non-positive depth {}",
            idx, cell.depth
        )));
    }
    if cell.layer_thickness.len() != num_layers {
        return Err(ModelError::malformed_grid(format!(
            "cell {} has {} layer thicknesses for {} layers",
            idx,
            cell.layer_thickness.len(),
            num_layers
        )));
    }
    if cell.top_layer > cell.bottom_layer || cell.bottom_layer > num_layers {
        return Err(ModelError::malformed_grid(format!(
            "cell {} has invalid active layers {}..{}",
            idx, cell.top_layer, cell.bottom_layer
        )));
    }
    if cell.layer_thickness.iter().any(|&dz| dz < 0.0) {
        return Err(ModelError::malformed_grid(format!(
            "cell {} has a negative layer thickness",
            idx
        )));
    }
    Ok(())
}

fn validate_edge(
    idx: usize,
    edge: &Edge,
    num_cells: usize,
    num_layers: usize,
) -> Result<(), ModelError> {
    if !(edge.length > 0.0) {
        return Err(ModelError::malformed_grid(format!(
            "edge {} has non-positive length {}",
            idx, edge.length
        )));
    }
    let normal_norm = edge.normal_x.hypot(edge.normal_y);
    if (normal_norm - 1.0).abs() > NORMAL_TOLERANCE {
        return Err(ModelError::malformed_grid(format!(
            "edge {} has a normal of length {}",
            idx, normal_norm
        )));
    }
    if edge.inner_cell >= num_cells || edge.outer_cell.map_or(false, |cell| cell >= num_cells) {
        return Err(ModelError::malformed_grid(format!(
            "edge {} references a cell outside 0..{}",
            idx, num_cells
        )));
    }
    match (edge.kind, edge.outer_cell) {
        (EdgeKind::Interior, None) => {
            return Err(ModelError::malformed_grid(format!(
                "interior edge {} has a single neighbour",
                idx
            )))
        }
        (kind, Some(_)) if kind != EdgeKind::Interior => {
            return Err(ModelError::malformed_grid(format!(
                "{:?} edge {} has two neighbours",
                kind, idx
            )))
        }
        _ => {}
    }
    if edge.top_layer > edge.bottom_layer || edge.bottom_layer > num_layers {
        return Err(ModelError::malformed_grid(format!(
            "edge {} has invalid active layers {}..{}",
            idx, edge.top_layer, edge.bottom_layer
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_channel() -> Grid {
        let model_params = ModelParameters {
            num_cells_x: 3,
            num_cells_y: 2,
            num_layers: 4,
            ..ModelParameters::default()
        };
        Grid::channel(&model_params).unwrap()
    }

    #[test]
    fn channel_edges_are_grouped_by_kind() {
        let grid = small_channel();
        let ranges = &grid.edge_ranges;

        // 2 rows of 4 x-faces, 3 rows of 3 y-faces
        assert_eq!(grid.num_edges(), 8 + 9);
        assert_eq!(ranges.interior.len(), 2 * 2 + 3);
        assert_eq!(ranges.closed.len(), 6);
        assert_eq!(ranges.open.len(), 2);
        assert_eq!(ranges.specified.len(), 0);
        assert_eq!(ranges.mixed.len(), 2);
        assert_eq!(ranges.num_segments(), 4);
        assert_eq!(ranges.mixed.end, grid.num_edges());

        for (kind, range) in &[
            (EdgeKind::Interior, ranges.interior.clone()),
            (EdgeKind::Closed, ranges.closed.clone()),
            (EdgeKind::Open, ranges.open.clone()),
            (EdgeKind::Mixed, ranges.mixed.clone()),
        ] {
            for position in range.clone() {
                assert_eq!(grid.edge_at(position).1.kind, *kind);
            }
        }
    }

    #[test]
    fn open_edges_face_west_of_the_first_column() {
        let grid = small_channel();
        for position in grid.edge_ranges.open.clone() {
            let (_, edge) = grid.edge_at(position);
            let cell = &grid.cells[edge.inner_cell];
            assert_eq!(edge.normal_x, -1.0);
            assert_eq!(cell.x, 50.0);
        }
    }

    #[test]
    fn segment_index_starts_at_first_open_edge() {
        let grid = small_channel();
        let ranges = &grid.edge_ranges;
        assert_eq!(ranges.segment_index(ranges.open.start), 0);
        assert_eq!(ranges.segment_index(ranges.mixed.end - 1), 3);
    }

    fn single_cell() -> Cell {
        Cell {
            x: 0.0,
            y: 0.0,
            depth: 10.0,
            top_layer: 0,
            bottom_layer: 1,
            layer_thickness: vec![10.0],
        }
    }

    fn boundary_edge(length: WorkingPrecision) -> Edge {
        Edge {
            kind: EdgeKind::Open,
            inner_cell: 0,
            outer_cell: None,
            normal_x: -1.0,
            normal_y: 0.0,
            length,
            top_layer: 0,
            bottom_layer: 1,
        }
    }

    #[test]
    fn zero_edge_length_is_malformed() {
        let result = Grid::new(1, vec![single_cell()], vec![boundary_edge(0.0)]);
        assert!(matches!(result, Err(ModelError::MalformedGrid(_))));
    }

    #[test]
    fn non_unit_normal_is_malformed() {
        let mut edge = boundary_edge(100.0);
        edge.normal_y = 1.0;
        assert!(Grid::new(1, vec![single_cell()], vec![edge]).is_err());
    }

    #[test]
    fn boundary_edge_with_two_neighbours_is_malformed() {
        let mut edge = boundary_edge(100.0);
        edge.outer_cell = Some(0);
        assert!(Grid::new(1, vec![single_cell()], vec![edge]).is_err());
    }

    #[test]
    fn layer_range_beyond_layer_count_is_malformed() {
        let mut edge = boundary_edge(100.0);
        edge.bottom_layer = 2;
        assert!(Grid::new(1, vec![single_cell()], vec![edge]).is_err());
    }

    #[test]
    fn empty_active_layer_range_is_accepted() {
        let mut edge = boundary_edge(100.0);
        edge.top_layer = 1;
        assert!(Grid::new(1, vec![single_cell()], vec![edge]).is_ok());
    }
}
