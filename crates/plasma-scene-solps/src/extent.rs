//! Radial and vertical bounds of a mesh.

use plasma_scene_core::{PlasmaSceneError, Result};
use serde::{Deserialize, Serialize};

/// The (R, Z) rectangle enclosing a plasma cross-section, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshExtent {
    pub min_r: f64,
    pub max_r: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl MeshExtent {
    /// Creates an extent, failing unless it is a valid non-empty rectangle
    /// in the right half-plane.
    pub fn new(min_r: f64, max_r: f64, min_z: f64, max_z: f64) -> Result<Self> {
        let extent = Self {
            min_r,
            max_r,
            min_z,
            max_z,
        };
        extent.validate()?;
        Ok(extent)
    }

    /// Checks `max_r > min_r >= 0` and `max_z > min_z`, all finite.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.min_r, self.max_r, self.min_z, self.max_z]
            .iter()
            .all(|v| v.is_finite());
        if finite && self.min_r >= 0.0 && self.max_r > self.min_r && self.max_z > self.min_z {
            Ok(())
        } else {
            Err(PlasmaSceneError::InvalidExtent {
                min_r: self.min_r,
                max_r: self.max_r,
                min_z: self.min_z,
                max_z: self.max_z,
            })
        }
    }

    /// Vertical size `max_z - min_z`.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_z - self.min_z
    }

    /// Whether `(r, z)` lies inside the rectangle, boundaries included.
    #[must_use]
    pub fn contains(&self, r: f64, z: f64) -> bool {
        r >= self.min_r && r <= self.max_r && z >= self.min_z && z <= self.max_z
    }
}
