//! SOLPS data for plasma-scene.
//!
//! - [`SolpsMesh`] quadrilateral simulation mesh with point lookup
//! - [`SolpsFunction2D`] cell-wise constant emissivity on that mesh
//! - [`SolpsSimulation`] per-species radiation of one run
//! - [`load_solps_from_file`] and the [`SimulationLoader`] seam

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod extent;
pub mod function2d;
pub mod loader;
pub mod mesh;
pub mod simulation;

pub use extent::MeshExtent;
pub use function2d::SolpsFunction2D;
pub use loader::{load_solps_from_file, FileLoader, SimulationLoader, SolpsDataFile};
pub use mesh::SolpsMesh;
pub use simulation::SolpsSimulation;
