//! Constructive solid geometry.
//!
//! A [`Solid`] is a shape plus a transform from the shape's local frame into
//! its parent's frame. Boolean shapes own their operands, so a solid is a
//! self-contained tree that can be stored once in a [`Scene`](crate::Scene)
//! and referenced by any number of instances.
//!
//! Containment is inclusive on boundaries for primitive shapes, except for
//! the upper faces of a half-open box. A point that lies exactly on the
//! surface of a subtracted operand is therefore outside the difference,
//! unless that surface is an open face.
//!
//! Box faces are thickened by [`FACE_TOLERANCE`]: closed faces grow by it and
//! open faces shrink by it. A point on a face shared by two differently
//! rotated instances then resolves the same way in both frames.

use glam::{DAffine3, DVec3};

use crate::error::{PlasmaSceneError, Result};

/// Distance (m) within which a point counts as lying on a box face.
pub const FACE_TOLERANCE: f64 = 1e-9;

/// The geometric content of a [`Solid`].
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Cylinder with its base disc on the local z = 0 plane and its axis along +z.
    Cylinder { radius: f64, height: f64 },
    /// Axis-aligned box (in the local frame) spanning two corner points.
    Box { lower: DVec3, upper: DVec3 },
    /// Like [`Shape::Box`], with the faces at `upper` excluded.
    HalfOpenBox { lower: DVec3, upper: DVec3 },
    /// Points inside either operand.
    Union(Box<Solid>, Box<Solid>),
    /// Points inside both operands.
    Intersect(Box<Solid>, Box<Solid>),
    /// Points inside the first operand and outside the second.
    Subtract(Box<Solid>, Box<Solid>),
}

/// A shape positioned in its parent's coordinate frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    shape: Shape,
    transform: DAffine3,
    inverse: DAffine3,
}

impl Solid {
    fn from_shape(shape: Shape) -> Self {
        Self {
            shape,
            transform: DAffine3::IDENTITY,
            inverse: DAffine3::IDENTITY,
        }
    }

    /// Creates a cylinder of the given radius and height.
    pub fn cylinder(radius: f64, height: f64) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PlasmaSceneError::InvalidConfig(format!(
                "cylinder radius must be positive, got {radius}"
            )));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(PlasmaSceneError::InvalidConfig(format!(
                "cylinder height must be positive, got {height}"
            )));
        }
        Ok(Self::from_shape(Shape::Cylinder { radius, height }))
    }

    /// Creates a box spanning `lower` to `upper`.
    ///
    /// Every component of `upper` must exceed the matching one of `lower`.
    pub fn box_from_points(lower: DVec3, upper: DVec3) -> Result<Self> {
        check_box_corners(lower, upper)?;
        Ok(Self::from_shape(Shape::Box { lower, upper }))
    }

    /// Creates a box holding `lower <= p < upper`.
    ///
    /// Subtracting it leaves its upper faces in the difference.
    pub fn half_open_box(lower: DVec3, upper: DVec3) -> Result<Self> {
        check_box_corners(lower, upper)?;
        Ok(Self::from_shape(Shape::HalfOpenBox { lower, upper }))
    }

    /// Union of two solids.
    #[must_use]
    pub fn union(a: Solid, b: Solid) -> Self {
        Self::from_shape(Shape::Union(Box::new(a), Box::new(b)))
    }

    /// Intersection of two solids.
    #[must_use]
    pub fn intersect(a: Solid, b: Solid) -> Self {
        Self::from_shape(Shape::Intersect(Box::new(a), Box::new(b)))
    }

    /// Difference `a - b`.
    #[must_use]
    pub fn subtract(a: Solid, b: Solid) -> Self {
        Self::from_shape(Shape::Subtract(Box::new(a), Box::new(b)))
    }

    /// Replaces the local-to-parent transform.
    #[must_use]
    pub fn with_transform(mut self, transform: DAffine3) -> Self {
        self.transform = transform;
        self.inverse = transform.inverse();
        self
    }

    /// Returns the shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the local-to-parent transform.
    #[must_use]
    pub fn transform(&self) -> DAffine3 {
        self.transform
    }

    /// Returns whether `point`, given in the parent frame, is inside the solid.
    #[must_use]
    pub fn contains(&self, point: DVec3) -> bool {
        self.contains_local(self.inverse.transform_point3(point))
    }

    fn contains_local(&self, p: DVec3) -> bool {
        match &self.shape {
            Shape::Cylinder { radius, height } => {
                p.z >= 0.0 && p.z <= *height && p.x * p.x + p.y * p.y <= radius * radius
            }
            Shape::Box { lower, upper } => {
                p.cmpge(*lower - FACE_TOLERANCE).all() && p.cmple(*upper + FACE_TOLERANCE).all()
            }
            Shape::HalfOpenBox { lower, upper } => {
                p.cmpge(*lower - FACE_TOLERANCE).all() && p.cmplt(*upper - FACE_TOLERANCE).all()
            }
            Shape::Union(a, b) => a.contains(p) || b.contains(p),
            Shape::Intersect(a, b) => a.contains(p) && b.contains(p),
            Shape::Subtract(a, b) => a.contains(p) && !b.contains(p),
        }
    }

    /// Axis-aligned bounds in the parent frame, or `None` if provably empty.
    ///
    /// The bounds are conservative: a difference keeps the bounds of its
    /// first operand.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let (lower, upper) = self.local_bounding_box()?;
        Some(transform_bounds(&self.transform, lower, upper))
    }

    fn local_bounding_box(&self) -> Option<(DVec3, DVec3)> {
        match &self.shape {
            Shape::Cylinder { radius, height } => Some((
                DVec3::new(-radius, -radius, 0.0),
                DVec3::new(*radius, *radius, *height),
            )),
            Shape::Box { lower, upper } | Shape::HalfOpenBox { lower, upper } => {
                Some((*lower, *upper))
            }
            Shape::Union(a, b) => match (a.bounding_box(), b.bounding_box()) {
                (Some((a0, a1)), Some((b0, b1))) => Some((a0.min(b0), a1.max(b1))),
                (Some(bounds), None) | (None, Some(bounds)) => Some(bounds),
                (None, None) => None,
            },
            Shape::Intersect(a, b) => {
                let (a0, a1) = a.bounding_box()?;
                let (b0, b1) = b.bounding_box()?;
                let lower = a0.max(b0);
                let upper = a1.min(b1);
                upper.cmpge(lower).all().then_some((lower, upper))
            }
            Shape::Subtract(a, _) => a.bounding_box(),
        }
    }
}

fn check_box_corners(lower: DVec3, upper: DVec3) -> Result<()> {
    if lower.is_finite() && upper.is_finite() && upper.cmpgt(lower).all() {
        Ok(())
    } else {
        Err(PlasmaSceneError::InvalidConfig(format!(
            "box corners must satisfy lower < upper, got {lower} and {upper}"
        )))
    }
}

fn transform_bounds(transform: &DAffine3, lower: DVec3, upper: DVec3) -> (DVec3, DVec3) {
    let mut min = DVec3::splat(f64::MAX);
    let mut max = DVec3::splat(f64::MIN);
    for i in 0..8 {
        let corner = DVec3::new(
            if i & 1 == 0 { lower.x } else { upper.x },
            if i & 2 == 0 { lower.y } else { upper.y },
            if i & 4 == 0 { lower.z } else { upper.z },
        );
        let p = transform.transform_point3(corner);
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}
