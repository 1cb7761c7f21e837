//! Scalar functions over the plane and over space.

/// A scalar function of two variables, typically (R, Z).
pub trait Function2D: Send + Sync {
    /// Evaluates the function at `(x, y)`.
    fn evaluate(&self, x: f64, y: f64) -> f64;
}

/// A scalar function of three variables.
pub trait Function3D: Send + Sync {
    /// Evaluates the function at `(x, y, z)`.
    fn evaluate(&self, x: f64, y: f64, z: f64) -> f64;
}

impl<F> Function2D for F
where
    F: Fn(f64, f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

impl<F> Function3D for F
where
    F: Fn(f64, f64, f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        self(x, y, z)
    }
}

/// Lifts an (R, Z) function into 3D by assuming rotational symmetry about +z.
///
/// `f(x, y, z) = g(sqrt(x^2 + y^2), z)`.
#[derive(Debug, Clone)]
pub struct AxisymmetricMapper<F> {
    function: F,
}

impl<F: Function2D> AxisymmetricMapper<F> {
    /// Wraps a 2D function.
    pub fn new(function: F) -> Self {
        Self { function }
    }

    /// Returns the wrapped 2D function.
    pub fn inner(&self) -> &F {
        &self.function
    }
}

impl<F: Function2D> Function3D for AxisymmetricMapper<F> {
    fn evaluate(&self, x: f64, y: f64, z: f64) -> f64 {
        self.function.evaluate(x.hypot(y), z)
    }
}
