//! Per-cell functions on a SOLPS mesh.

use std::sync::Arc;

use plasma_scene_core::{Function2D, PlasmaSceneError, Result};

use crate::mesh::SolpsMesh;

/// A function that is constant on each cell of a [`SolpsMesh`] and zero
/// outside it.
///
/// Cloning is cheap: the mesh and the values are shared.
#[derive(Debug, Clone)]
pub struct SolpsFunction2D {
    mesh: Arc<SolpsMesh>,
    values: Arc<[f64]>,
}

impl SolpsFunction2D {
    /// Creates a function from one value per mesh cell.
    pub fn new(mesh: Arc<SolpsMesh>, values: Vec<f64>) -> Result<Self> {
        if values.len() != mesh.num_cells() {
            return Err(PlasmaSceneError::SizeMismatch {
                expected: mesh.num_cells(),
                actual: values.len(),
            });
        }
        Ok(Self {
            mesh,
            values: values.into(),
        })
    }

    /// The mesh this function is defined on.
    #[must_use]
    pub fn mesh(&self) -> &Arc<SolpsMesh> {
        &self.mesh
    }

    /// Per-cell values in cell index order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Whether this function is defined on `mesh`, either the very same
    /// mesh or one with identical cells.
    #[must_use]
    pub fn is_defined_on(&self, mesh: &SolpsMesh) -> bool {
        std::ptr::eq(self.mesh.as_ref(), mesh) || self.mesh.as_ref() == mesh
    }

    /// Largest cell value, `None` if any value is NaN.
    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.values
            .iter()
            .try_fold(f64::MIN, |acc, &v| (!v.is_nan()).then_some(acc.max(v)))
    }

    /// Integral of the function over the toroidal volume swept by the mesh.
    #[must_use]
    pub fn volume_integral(&self) -> f64 {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| v * self.mesh.cell_volume(i).unwrap_or(0.0))
            .sum()
    }
}

impl Function2D for SolpsFunction2D {
    fn evaluate(&self, r: f64, z: f64) -> f64 {
        self.mesh.cell_at(r, z).map_or(0.0, |i| self.values[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn mesh() -> Arc<SolpsMesh> {
        Arc::new(SolpsMesh::rectilinear(&[1.0, 1.5, 2.0], &[-1.0, 0.0, 1.0]).unwrap())
    }

    #[test]
    fn test_evaluate() {
        let f = SolpsFunction2D::new(mesh(), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(f.evaluate(1.2, -0.5), 1.0);
        assert_eq!(f.evaluate(1.7, 0.5), 4.0);
        assert_eq!(f.evaluate(0.5, 0.0), 0.0);
        assert_eq!(f.evaluate(1.2, 3.0), 0.0);
    }

    #[test]
    fn test_size_mismatch() {
        let err = SolpsFunction2D::new(mesh(), vec![1.0; 3]).unwrap_err();
        assert!(matches!(
            err,
            PlasmaSceneError::SizeMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_is_defined_on() {
        let m = mesh();
        let f = SolpsFunction2D::new(Arc::clone(&m), vec![0.0; 4]).unwrap();
        assert!(f.is_defined_on(&m));
        assert!(f.is_defined_on(&mesh()));
        let coarse = SolpsMesh::rectilinear(&[1.0, 2.0], &[-1.0, 1.0]).unwrap();
        assert!(!f.is_defined_on(&coarse));
    }

    #[test]
    fn test_max_value() {
        let f = SolpsFunction2D::new(mesh(), vec![1.0, 5.0, 3.0, -1.0]).unwrap();
        assert_eq!(f.max_value(), Some(5.0));
        let g = SolpsFunction2D::new(mesh(), vec![1.0, f64::NAN, 3.0, 0.0]).unwrap();
        assert_eq!(g.max_value(), None);
    }

    #[test]
    fn test_volume_integral() {
        let f = SolpsFunction2D::new(mesh(), vec![1.0; 4]).unwrap();
        // annulus R in [1, 2], height 2
        let expected = PI * (2.0_f64.powi(2) - 1.0) * 2.0;
        assert!((f.volume_integral() - expected).abs() < 1e-9);
    }
}
