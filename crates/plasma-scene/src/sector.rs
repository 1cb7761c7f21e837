//! Toroidal sector geometry.
//!
//! The plasma volume is a hollow cylinder spanning the mesh extents. One
//! sector of it, the wedge between the toroidal angles `0` and
//! `sector_width`, is cut out by subtracting two boxes that each cover a
//! half-space bounded by a vertical plane through the z axis:
//!
//! - box 1 removes `y < 0`, i.e. angles `(180, 360)`; its `y = 0` face is
//!   open, so the plane at angle 0 stays in the wedge;
//! - box 2 is the `y >= 0` half rotated by `sector_width`, removing angles
//!   `[sector_width, sector_width + 180]`.
//!
//! Each wedge is therefore half-open, `[0, sector_width)`, and the rotated
//! copies tile the full turn with every face owned by exactly one sector.
//! Both boxes are larger than the cylinder by `padding` in every direction.

use glam::{DAffine3, DVec3};
use plasma_scene_core::transform::{rotate_z, translate};
use plasma_scene_core::{PlasmaSceneError, Result, Solid};
use plasma_scene_solps::MeshExtent;

use crate::config::EmitterConfig;

/// Fraction of a sector within which a direction snaps onto the next face.
const FACE_SNAP: f64 = 1e-9;

/// Derived slicing parameters for one mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorGeometry {
    pub num_sectors: usize,
    pub sector_width_deg: f64,
    pub sector_width_rad: f64,
    /// Limiter part of each sector. Not used to shape emission.
    pub limiter_width_deg: f64,
    pub padding: f64,
    pub box_height: f64,
    pub box_width: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl SectorGeometry {
    /// Computes the slicing parameters for `extent`.
    pub fn new(extent: &MeshExtent, config: &EmitterConfig) -> Result<Self> {
        extent.validate()?;
        config.validate()?;

        #[allow(clippy::cast_precision_loss)]
        let sector_width_deg = 360.0 / config.num_sectors as f64;
        let padding = config.padding;
        let box_height = 2.0 * (extent.min_z.abs().max(extent.max_z.abs()) + padding);
        let box_width = 2.0 * (2.0 * extent.max_r + padding);

        Ok(Self {
            num_sectors: config.num_sectors,
            sector_width_deg,
            sector_width_rad: sector_width_deg.to_radians(),
            limiter_width_deg: config.limiter_angular_width_deg,
            padding,
            box_height,
            box_width,
            inner_radius: extent.min_r,
            outer_radius: extent.max_r,
            min_z: extent.min_z,
            max_z: extent.max_z,
        })
    }

    /// Vertical size of the plasma volume.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_z - self.min_z
    }

    /// Part of each sector that is not limiter, in degrees.
    #[must_use]
    pub fn non_limiter_width_deg(&self) -> f64 {
        self.sector_width_deg - self.limiter_width_deg
    }

    /// Rotation of sector `index` about +z, in degrees.
    #[must_use]
    pub fn rotation_angle_deg(&self, index: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let i = index as f64;
        i * self.sector_width_deg
    }

    /// Rotations of all sectors, in degrees.
    #[must_use]
    pub fn rotation_angles_deg(&self) -> Vec<f64> {
        (0..self.num_sectors)
            .map(|i| self.rotation_angle_deg(i))
            .collect()
    }

    /// Instance transform of sector `index`.
    #[must_use]
    pub fn sector_transform(&self, index: usize) -> DAffine3 {
        rotate_z(self.rotation_angle_deg(index))
    }

    /// Sector whose angular range `[start, start + width)` contains the
    /// direction `(x, y)`.
    ///
    /// Directions within rounding of a face belong to the sector starting
    /// there, matching the wedge solids.
    #[must_use]
    pub fn sector_index_at(&self, x: f64, y: f64) -> usize {
        let angle = y.atan2(x).to_degrees().rem_euclid(360.0);
        let position = angle / self.sector_width_deg;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = (position + FACE_SNAP).floor() as usize;
        index % self.num_sectors.max(1)
    }

    /// The full hollow cylinder, spanning `min_z..max_z`.
    pub fn hollow_cylinder(&self) -> Result<Solid> {
        Ok(hollow_cylinder(self.inner_radius, self.outer_radius, self.height())?
            .with_transform(translate(0.0, 0.0, self.min_z)))
    }

    /// The two half-space boxes cutting out the first sector.
    pub fn cutting_boxes(&self) -> Result<[Solid; 2]> {
        let w = 0.5 * self.box_width;
        let h = 0.5 * self.box_height;
        let below = Solid::half_open_box(DVec3::new(-w, -w, -h), DVec3::new(w, 0.0, h))?;
        let above = Solid::box_from_points(DVec3::new(-w, 0.0, -h), DVec3::new(w, w, h))?
            .with_transform(rotate_z(self.sector_width_deg));
        Ok([below, above])
    }

    /// The wedge spanning toroidal angles `0..sector_width`.
    pub fn wedge(&self) -> Result<Solid> {
        let [box_1, box_2] = self.cutting_boxes()?;
        let sliced = Solid::subtract(self.hollow_cylinder()?, box_1);
        Ok(Solid::subtract(sliced, box_2))
    }
}

/// Hollow cylinder with its base on z = 0.
///
/// A zero inner radius yields a solid cylinder.
pub(crate) fn hollow_cylinder(inner_radius: f64, outer_radius: f64, height: f64) -> Result<Solid> {
    if inner_radius >= outer_radius {
        return Err(PlasmaSceneError::InvalidConfig(format!(
            "inner radius {inner_radius} must be smaller than outer radius {outer_radius}"
        )));
    }
    let outer = Solid::cylinder(outer_radius, height)?;
    if inner_radius > 0.0 {
        Ok(Solid::subtract(outer, Solid::cylinder(inner_radius, height)?))
    } else {
        Ok(outer)
    }
}
