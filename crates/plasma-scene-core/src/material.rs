//! Volume emitter materials.
//!
//! Materials are evaluated in the local frame of the primitive that carries
//! them. They are shared between primitives through `Arc`, so they are
//! read-only once built.

use std::f64::consts::PI;
use std::fmt;

use glam::{DAffine3, DVec3};

use crate::error::{PlasmaSceneError, Result};
use crate::function::Function3D;

/// A material that emits radiation from within a volume.
pub trait VolumeEmitter: Send + Sync {
    /// Emitted power per unit volume and solid angle (W m^-3 sr^-1) at a
    /// point in the primitive's local frame.
    fn emission_at(&self, point: DVec3) -> f64;

    /// Length of the integration step along a ray segment.
    fn step(&self) -> f64;

    /// Integrates the emission along the straight segment `start -> end`
    /// with the midpoint rule, using steps no longer than [`step`](Self::step).
    fn integrate(&self, start: DVec3, end: DVec3) -> f64 {
        let length = start.distance(end);
        if length <= 0.0 {
            return 0.0;
        }
        // step is validated positive at construction
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = ((length / self.step()).ceil() as usize).max(1);
        #[allow(clippy::cast_precision_loss)]
        let dl = length / n as f64;
        let direction = (end - start) / length;
        (0..n)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let t = (i as f64 + 0.5) * dl;
                self.emission_at(start + direction * t)
            })
            .sum::<f64>()
            * dl
    }
}

fn validate_step(step: f64) -> Result<f64> {
    if step.is_finite() && step > 0.0 {
        Ok(step)
    } else {
        Err(PlasmaSceneError::InvalidConfig(format!(
            "integration step must be positive, got {step}"
        )))
    }
}

/// Isotropic emitter driven by a volumetric power density function (W m^-3).
pub struct RadiationFunction<F> {
    function: F,
    step: f64,
}

impl<F: Function3D> RadiationFunction<F> {
    /// Creates an emitter that integrates `function` with the given step (m).
    pub fn new(function: F, step: f64) -> Result<Self> {
        Ok(Self {
            function,
            step: validate_step(step)?,
        })
    }

    /// Returns the power density function.
    pub fn function(&self) -> &F {
        &self.function
    }
}

impl<F: Function3D> VolumeEmitter for RadiationFunction<F> {
    fn emission_at(&self, point: DVec3) -> f64 {
        self.function.evaluate(point.x, point.y, point.z) / (4.0 * PI)
    }

    fn step(&self) -> f64 {
        self.step
    }
}

impl<F> fmt::Debug for RadiationFunction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RadiationFunction")
            .field("step", &self.step)
            .finish_non_exhaustive()
    }
}

/// Evaluates an inner material in a transformed coordinate frame.
///
/// A point `p` of the primitive frame is handed to the inner material as
/// `transform.inverse() * p`.
pub struct VolumeTransform<M> {
    material: M,
    transform: DAffine3,
    inverse: DAffine3,
}

impl<M: VolumeEmitter> VolumeTransform<M> {
    /// Wraps `material` with `transform`.
    pub fn new(material: M, transform: DAffine3) -> Self {
        Self {
            material,
            transform,
            inverse: transform.inverse(),
        }
    }

    /// Returns the material frame transform.
    pub fn transform(&self) -> DAffine3 {
        self.transform
    }

    /// Returns the wrapped material.
    pub fn inner(&self) -> &M {
        &self.material
    }
}

impl<M: VolumeEmitter> VolumeEmitter for VolumeTransform<M> {
    fn emission_at(&self, point: DVec3) -> f64 {
        self.material
            .emission_at(self.inverse.transform_point3(point))
    }

    fn step(&self) -> f64 {
        self.material.step()
    }

    fn integrate(&self, start: DVec3, end: DVec3) -> f64 {
        self.material.integrate(
            self.inverse.transform_point3(start),
            self.inverse.transform_point3(end),
        )
    }
}
