//! Affine transforms used to position solids and instances.
//!
//! All transforms map a node's local coordinates into its parent's
//! coordinates. Angles taken by the helper constructors are in degrees,
//! following the convention of the scene-description tooling this crate
//! feeds.

use glam::{DAffine3, DVec3};

/// Returns a pure translation.
#[must_use]
pub fn translate(x: f64, y: f64, z: f64) -> DAffine3 {
    DAffine3::from_translation(DVec3::new(x, y, z))
}

/// Returns a rotation about the +z axis by `degrees`.
#[must_use]
pub fn rotate_z(degrees: f64) -> DAffine3 {
    DAffine3::from_rotation_z(degrees.to_radians())
}

/// Rotation angle about +z encoded by `transform`, in degrees within `(-180, 180]`.
///
/// Only meaningful for transforms whose rotation part is about the z axis.
#[must_use]
pub fn angle_z_degrees(transform: &DAffine3) -> f64 {
    let x_axis = transform.matrix3.x_axis;
    x_axis.y.atan2(x_axis.x).to_degrees()
}
