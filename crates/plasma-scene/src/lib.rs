//! plasma-scene: toroidal SOLPS radiation volumes for ray-traced scenes.
//!
//! Reads SOLPS edge-plasma radiation, lifts the 2D (R, Z) emissivity into
//! 3D assuming rotational symmetry and attaches it to a [`Scene`] as an
//! emitting hollow cylinder. The discrete variant slices the cylinder into
//! toroidal sectors that all instance one wedge solid, so emission can later
//! differ per sector.
//!
//! # Quick Start
//!
//! ```no_run
//! use plasma_scene::*;
//!
//! fn main() -> Result<()> {
//!     let config = RunConfig::from_file("run.json")?;
//!
//!     let mut scene = Scene::new();
//!     let world = scene.root();
//!     let sol = load_discrete_sol_radiation(&config, &mut scene, Some(world))?;
//!
//!     for sector in sol.emitter.sectors() {
//!         println!("sector {} at {} deg", sector.index, sector.angle_deg);
//!     }
//!     println!("emission at (1.2, 0, 0): {}", scene.emission_at(DVec3::new(1.2, 0.0, 0.0)));
//!     Ok(())
//! }
//! ```
//!
//! # Crates
//!
//! - `plasma-scene-core`: solids, scene arena, materials and functions
//! - `plasma-scene-solps`: SOLPS mesh, fields and loaders
//! - this crate: configuration, sector geometry and the emitter builders

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod emitter;
pub mod radiation;
pub mod sector;

pub use config::{
    EmitterConfig, PlasmaConfig, RaytracingConfig, RunConfig, SolpsConfig,
    DEFAULT_LIMITER_WIDTH_DEG, DEFAULT_NUM_SECTORS, DEFAULT_PADDING,
};
pub use emitter::{
    make_solps_discrete_emitter, make_solps_discrete_emitter_with, make_solps_emitter,
    DiscreteEmitter, SectorEmission, SectorInstance, SectorMaterials, SolpsRadiation,
    UniformEmission,
};
pub use radiation::{
    load_discrete_sol_radiation, load_discrete_sol_radiation_with, load_sol_radiation,
    load_sol_radiation_with, SolRadiation,
};
pub use sector::SectorGeometry;

// Re-export core types
pub use plasma_scene_core::{
    transform, AxisymmetricMapper, DAffine3, DVec2, DVec3, Function2D, Function3D, MaterialId,
    Node, NodeId, NodeKind, PlasmaSceneError, RadiationFunction, Result, Scene, Shape, Solid,
    SolidId, VolumeEmitter, VolumeTransform,
};

// Re-export SOLPS types
pub use plasma_scene_solps::{
    load_solps_from_file, FileLoader, MeshExtent, SimulationLoader, SolpsDataFile,
    SolpsFunction2D, SolpsMesh, SolpsSimulation,
};

/// Installs `env_logger` as the `log` backend, configured from `RUST_LOG`.
///
/// Does nothing if a logger is already installed.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
