//! SOLPS quadrilateral mesh.
//!
//! A SOLPS mesh is a logically rectangular `nx x ny` grid of quadrilateral
//! cells in the poloidal (R, Z) plane. Corners of each cell are stored in
//! SOLPS order: lower-left, lower-right, upper-left, upper-right. Cells are
//! indexed `ix + nx * iy`.

use std::f64::consts::PI;

use glam::DVec2;
use plasma_scene_core::{PlasmaSceneError, Result};

use crate::extent::MeshExtent;

/// Corner visiting order that walks a SOLPS cell as a polygon.
const POLYGON_ORDER: [usize; 4] = [0, 1, 3, 2];

/// Slack applied to the point-in-cell test.
const INSIDE_TOLERANCE: f64 = 1e-12;

/// Uniform binning of cells for point lookup.
#[derive(Debug, Clone)]
struct CellLookup {
    origin: DVec2,
    bin_size: DVec2,
    bins_r: usize,
    bins_z: usize,
    bins: Vec<Vec<usize>>,
}

impl CellLookup {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn build(extent: &MeshExtent, cells: &[[DVec2; 4]]) -> Self {
        let per_axis = ((cells.len() as f64).sqrt().ceil() as usize).clamp(1, 512);
        let origin = DVec2::new(extent.min_r, extent.min_z);
        let size = DVec2::new(extent.max_r - extent.min_r, extent.max_z - extent.min_z);
        let bin_size = size / per_axis as f64;

        let mut lookup = Self {
            origin,
            bin_size,
            bins_r: per_axis,
            bins_z: per_axis,
            bins: vec![Vec::new(); per_axis * per_axis],
        };

        for (index, corners) in cells.iter().enumerate() {
            let (lo, hi) = corners
                .iter()
                .fold((DVec2::splat(f64::MAX), DVec2::splat(f64::MIN)), |(lo, hi), c| {
                    (lo.min(*c), hi.max(*c))
                });
            let (r0, z0) = lookup.bin_of(lo);
            let (r1, z1) = lookup.bin_of(hi);
            for iz in z0..=z1 {
                for ir in r0..=r1 {
                    lookup.bins[ir + iz * lookup.bins_r].push(index);
                }
            }
        }
        lookup
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn bin_of(&self, p: DVec2) -> (usize, usize) {
        let rel = ((p - self.origin) / self.bin_size).max(DVec2::ZERO);
        (
            (rel.x as usize).min(self.bins_r - 1),
            (rel.y as usize).min(self.bins_z - 1),
        )
    }

    fn candidates(&self, p: DVec2) -> &[usize] {
        let (ir, iz) = self.bin_of(p);
        &self.bins[ir + iz * self.bins_r]
    }
}

/// A SOLPS simulation mesh.
#[derive(Debug, Clone)]
pub struct SolpsMesh {
    nx: usize,
    ny: usize,
    cells: Vec<[DVec2; 4]>,
    extent: MeshExtent,
    lookup: CellLookup,
}

impl PartialEq for SolpsMesh {
    fn eq(&self, other: &Self) -> bool {
        self.nx == other.nx && self.ny == other.ny && self.cells == other.cells
    }
}

impl SolpsMesh {
    /// Creates a mesh from per-cell corner coordinates.
    ///
    /// `r` and `z` hold one `[ll, lr, ul, ur]` entry per cell, in cell index
    /// order.
    pub fn new(nx: usize, ny: usize, r: &[[f64; 4]], z: &[[f64; 4]]) -> Result<Self> {
        let expected = nx * ny;
        if expected == 0 {
            return Err(PlasmaSceneError::InvalidConfig(format!(
                "mesh must have at least one cell, got {nx} x {ny}"
            )));
        }
        for actual in [r.len(), z.len()] {
            if actual != expected {
                return Err(PlasmaSceneError::SizeMismatch { expected, actual });
            }
        }

        let cells: Vec<[DVec2; 4]> = r
            .iter()
            .zip(z)
            .map(|(r, z)| std::array::from_fn(|k| DVec2::new(r[k], z[k])))
            .collect();

        let mut lo = DVec2::splat(f64::MAX);
        let mut hi = DVec2::splat(f64::MIN);
        for corner in cells.iter().flatten() {
            if !corner.is_finite() {
                return Err(PlasmaSceneError::InvalidConfig(
                    "mesh corner coordinates must be finite".to_string(),
                ));
            }
            lo = lo.min(*corner);
            hi = hi.max(*corner);
        }
        let extent = MeshExtent::new(lo.x, hi.x, lo.y, hi.y)?;
        let lookup = CellLookup::build(&extent, &cells);

        Ok(Self {
            nx,
            ny,
            cells,
            extent,
            lookup,
        })
    }

    /// Creates an axis-aligned mesh from strictly increasing cell edges.
    pub fn rectilinear(r_edges: &[f64], z_edges: &[f64]) -> Result<Self> {
        let increasing = |edges: &[f64]| edges.len() >= 2 && edges.windows(2).all(|w| w[1] > w[0]);
        if !increasing(r_edges) || !increasing(z_edges) {
            return Err(PlasmaSceneError::InvalidConfig(
                "rectilinear mesh edges must be strictly increasing with at least two entries"
                    .to_string(),
            ));
        }
        let nx = r_edges.len() - 1;
        let ny = z_edges.len() - 1;
        let mut r = Vec::with_capacity(nx * ny);
        let mut z = Vec::with_capacity(nx * ny);
        for iy in 0..ny {
            for ix in 0..nx {
                let (r0, r1) = (r_edges[ix], r_edges[ix + 1]);
                let (z0, z1) = (z_edges[iy], z_edges[iy + 1]);
                r.push([r0, r1, r0, r1]);
                z.push([z0, z0, z1, z1]);
            }
        }
        Self::new(nx, ny, &r, &z)
    }

    /// Number of cells along the first (poloidal) index.
    #[must_use]
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Number of cells along the second (radial) index.
    #[must_use]
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Total number of cells.
    #[must_use]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// The (R, Z) bounds of all cell corners.
    #[must_use]
    pub fn extent(&self) -> MeshExtent {
        self.extent
    }

    /// Linear index of cell `(ix, iy)`.
    #[must_use]
    pub fn cell_index(&self, ix: usize, iy: usize) -> Option<usize> {
        (ix < self.nx && iy < self.ny).then_some(ix + self.nx * iy)
    }

    /// Corners of a cell in SOLPS order.
    #[must_use]
    pub fn cell_vertices(&self, index: usize) -> Option<[DVec2; 4]> {
        self.cells.get(index).copied()
    }

    /// Area-weighted centroid of a cell.
    #[must_use]
    pub fn cell_centre(&self, index: usize) -> Option<DVec2> {
        let (area, centroid) = polygon_area_centroid(self.cells.get(index)?);
        if area.abs() > 0.0 {
            Some(centroid)
        } else {
            let c = self.cells[index];
            Some((c[0] + c[1] + c[2] + c[3]) / 4.0)
        }
    }

    /// Volume swept by a cell revolved once about the z axis (m^3).
    #[must_use]
    pub fn cell_volume(&self, index: usize) -> Option<f64> {
        let (area, centroid) = polygon_area_centroid(self.cells.get(index)?);
        Some(2.0 * PI * centroid.x * area.abs())
    }

    /// Index of the cell containing `(r, z)`, if any.
    ///
    /// On an edge shared by two cells the lower index wins.
    #[must_use]
    pub fn cell_at(&self, r: f64, z: f64) -> Option<usize> {
        let p = DVec2::new(r, z);
        if !self.extent.contains(r, z) {
            return None;
        }
        self.lookup
            .candidates(p)
            .iter()
            .copied()
            .find(|&i| cell_contains(&self.cells[i], p))
    }
}

fn polygon_area_centroid(cell: &[DVec2; 4]) -> (f64, DVec2) {
    let mut area2 = 0.0;
    let mut weighted = DVec2::ZERO;
    for k in 0..4 {
        let a = cell[POLYGON_ORDER[k]];
        let b = cell[POLYGON_ORDER[(k + 1) % 4]];
        let cross = a.perp_dot(b);
        area2 += cross;
        weighted += (a + b) * cross;
    }
    let area = area2 / 2.0;
    if area2.abs() > 0.0 {
        (area, weighted / (3.0 * area2))
    } else {
        (0.0, DVec2::ZERO)
    }
}

fn cell_contains(cell: &[DVec2; 4], p: DVec2) -> bool {
    let [p0, p1, p2, p3] = POLYGON_ORDER.map(|k| cell[k]);
    triangle_contains(p0, p1, p2, p) || triangle_contains(p0, p2, p3, p)
}

/// Zero-area triangles, e.g. from collapsed cells, contain nothing.
fn triangle_contains(a: DVec2, b: DVec2, c: DVec2, p: DVec2) -> bool {
    if (b - a).perp_dot(c - a).abs() <= INSIDE_TOLERANCE {
        return false;
    }
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    let has_neg = d1 < -INSIDE_TOLERANCE || d2 < -INSIDE_TOLERANCE || d3 < -INSIDE_TOLERANCE;
    let has_pos = d1 > INSIDE_TOLERANCE || d2 > INSIDE_TOLERANCE || d3 > INSIDE_TOLERANCE;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> SolpsMesh {
        SolpsMesh::rectilinear(&[1.0, 1.5, 2.0], &[-1.0, 0.0, 1.0]).unwrap()
    }

    #[test]
    fn test_rectilinear_layout() {
        let mesh = grid();
        assert_eq!(mesh.nx(), 2);
        assert_eq!(mesh.ny(), 2);
        assert_eq!(mesh.num_cells(), 4);
        assert_eq!(mesh.cell_index(1, 1), Some(3));
        assert_eq!(mesh.cell_index(2, 0), None);
        let e = mesh.extent();
        assert_eq!((e.min_r, e.max_r, e.min_z, e.max_z), (1.0, 2.0, -1.0, 1.0));
    }

    #[test]
    fn test_cell_at() {
        let mesh = grid();
        assert_eq!(mesh.cell_at(1.2, -0.5), Some(0));
        assert_eq!(mesh.cell_at(1.7, -0.5), Some(1));
        assert_eq!(mesh.cell_at(1.2, 0.5), Some(2));
        assert_eq!(mesh.cell_at(1.7, 0.5), Some(3));
        assert_eq!(mesh.cell_at(0.9, 0.0), None);
        assert_eq!(mesh.cell_at(1.5, 2.0), None);
    }

    #[test]
    fn test_shared_edge_prefers_lower_index() {
        let mesh = grid();
        assert_eq!(mesh.cell_at(1.5, -0.5), Some(0));
    }

    #[test]
    fn test_collapsed_cell_contains_nothing() {
        // cell 0 shrinks to the point (1, 0); cell 1 is the real one
        let mesh = SolpsMesh::new(
            2,
            1,
            &[[1.0, 1.0, 1.0, 1.0], [1.0, 2.0, 1.0, 2.0]],
            &[[0.0, 0.0, 0.0, 0.0], [-1.0, -1.0, 1.0, 1.0]],
        )
        .unwrap();
        assert_eq!(mesh.cell_at(1.2, 0.5), Some(1));
        assert_eq!(mesh.cell_at(1.0, 0.0), Some(1));
        assert_eq!(mesh.cell_volume(0), Some(0.0));
    }

    #[test]
    fn test_triangular_cell() {
        // two coincident corners leave a triangle
        let mesh = SolpsMesh::new(1, 1, &[[1.0, 2.0, 1.0, 1.0]], &[[0.0, 0.0, 1.0, 1.0]]).unwrap();
        assert_eq!(mesh.cell_at(1.2, 0.5), Some(0));
        assert_eq!(mesh.cell_at(1.9, 0.9), None);
    }

    #[test]
    fn test_skewed_cell() {
        // a parallelogram leaning right
        let mesh = SolpsMesh::new(1, 1, &[[1.0, 2.0, 1.5, 2.5]], &[[0.0, 0.0, 1.0, 1.0]]).unwrap();
        assert_eq!(mesh.cell_at(2.2, 0.8), Some(0));
        assert_eq!(mesh.cell_at(1.1, 0.8), None);
        assert_eq!(mesh.extent().max_r, 2.5);
    }

    #[test]
    fn test_cell_geometry() {
        let mesh = grid();
        let c = mesh.cell_centre(0).unwrap();
        assert!((c - DVec2::new(1.25, -0.5)).length() < 1e-12);
        // 2 pi R A with R = 1.25, A = 0.5
        let v = mesh.cell_volume(0).unwrap();
        assert!((v - 2.0 * PI * 1.25 * 0.5).abs() < 1e-12);
        assert!(mesh.cell_volume(9).is_none());
    }

    #[test]
    fn test_size_mismatch() {
        let err =
            SolpsMesh::new(2, 1, &[[1.0, 2.0, 1.0, 2.0]], &[[0.0, 0.0, 1.0, 1.0]]).unwrap_err();
        assert!(matches!(
            err,
            PlasmaSceneError::SizeMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_rejects_bad_edges() {
        assert!(SolpsMesh::rectilinear(&[1.0], &[0.0, 1.0]).is_err());
        assert!(SolpsMesh::rectilinear(&[1.0, 1.0], &[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_mesh_equality_ignores_lookup() {
        assert_eq!(grid(), grid());
        let other = SolpsMesh::rectilinear(&[1.0, 2.0], &[-1.0, 1.0]).unwrap();
        assert_ne!(grid(), other);
    }
}
