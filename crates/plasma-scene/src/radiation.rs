//! Configuration-driven entry points.

use std::path::PathBuf;

use plasma_scene_core::{NodeId, PlasmaSceneError, Result, Scene};
use plasma_scene_solps::{FileLoader, SimulationLoader, SolpsFunction2D, SolpsSimulation};

use crate::config::RunConfig;
use crate::emitter::{make_solps_discrete_emitter, make_solps_emitter, DiscreteEmitter};

/// An attached emitter together with the 2D field driving it.
#[derive(Debug, Clone)]
pub struct SolRadiation<E> {
    pub emitter: E,
    /// Total radiation summed over the configured species.
    pub radiation: SolpsFunction2D,
}

/// Loads the configured SOLPS run and attaches it as a sliced emitter.
///
/// The data path defaults to a `.mat` file, which is only readable with the
/// `matio` feature. Without it this returns
/// [`PlasmaSceneError::UnsupportedFormat`] before touching the scene; set
/// `SOLPS_data_extension` to `json` to read JSON exports instead.
pub fn load_discrete_sol_radiation(
    config: &RunConfig,
    scene: &mut Scene,
    parent: Option<NodeId>,
) -> Result<SolRadiation<DiscreteEmitter>> {
    load_discrete_sol_radiation_with(&FileLoader, config, scene, parent)
}

/// [`load_discrete_sol_radiation`] reading through `loader`.
pub fn load_discrete_sol_radiation_with(
    loader: &(impl SimulationLoader + ?Sized),
    config: &RunConfig,
    scene: &mut Scene,
    parent: Option<NodeId>,
) -> Result<SolRadiation<DiscreteEmitter>> {
    let (parent, simulation) = load(loader, config, scene, parent)?;
    let radiation = simulation.total_radiation_f2d().clone();
    let emitter = make_solps_discrete_emitter(
        scene,
        simulation.mesh(),
        &radiation,
        Some(parent),
        config.raytracing.integration_step,
        &config.emitter,
    )?;
    Ok(SolRadiation { emitter, radiation })
}

/// Loads the configured SOLPS run and attaches it as one hollow cylinder.
///
/// The data path defaults to a `.mat` file, which is only readable with the
/// `matio` feature. Without it this returns
/// [`PlasmaSceneError::UnsupportedFormat`] before touching the scene; set
/// `SOLPS_data_extension` to `json` to read JSON exports instead.
pub fn load_sol_radiation(
    config: &RunConfig,
    scene: &mut Scene,
    parent: Option<NodeId>,
) -> Result<SolRadiation<NodeId>> {
    load_sol_radiation_with(&FileLoader, config, scene, parent)
}

/// [`load_sol_radiation`] reading through `loader`.
pub fn load_sol_radiation_with(
    loader: &(impl SimulationLoader + ?Sized),
    config: &RunConfig,
    scene: &mut Scene,
    parent: Option<NodeId>,
) -> Result<SolRadiation<NodeId>> {
    let (parent, simulation) = load(loader, config, scene, parent)?;
    let radiation = simulation.total_radiation_f2d().clone();
    let emitter = make_solps_emitter(
        scene,
        simulation.mesh(),
        &radiation,
        Some(parent),
        config.raytracing.integration_step,
    )?;
    Ok(SolRadiation { emitter, radiation })
}

/// Checks the parent and configuration, then reads the simulation.
fn load(
    loader: &(impl SimulationLoader + ?Sized),
    config: &RunConfig,
    scene: &Scene,
    parent: Option<NodeId>,
) -> Result<(NodeId, SolpsSimulation)> {
    let parent = parent.ok_or(PlasmaSceneError::MissingParent)?;
    scene.require_node(parent)?;
    config.validate()?;

    let path: PathBuf = config.solps_data_path();
    let solps = &config.plasma.solps;
    let simulation = loader.load(&path, &solps.species_list, &solps.type_rad)?;
    Ok((parent, simulation))
}
