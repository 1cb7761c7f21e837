//! Emitter builders.
//!
//! Both builders lift a SOLPS emissivity field into 3D with an
//! [`AxisymmetricMapper`] and attach it to the scene as a radiating volume.
//! [`make_solps_emitter`] places one hollow cylinder;
//! [`make_solps_discrete_emitter`] slices that cylinder into toroidal
//! sectors that all instance a single wedge solid.
//!
//! Every input is checked before the scene is touched, so a failed build
//! leaves the scene as it was.

use std::sync::Arc;

use plasma_scene_core::transform::translate;
use plasma_scene_core::{
    AxisymmetricMapper, MaterialId, NodeId, PlasmaSceneError, RadiationFunction, Result, Scene,
    SolidId, VolumeTransform,
};
use plasma_scene_solps::{MeshExtent, SolpsFunction2D, SolpsMesh};

use crate::config::EmitterConfig;
use crate::sector::{hollow_cylinder, SectorGeometry};

/// Emissive material built from a SOLPS field.
pub type SolpsRadiation = RadiationFunction<AxisymmetricMapper<SolpsFunction2D>>;

/// Material of one sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorEmission {
    /// The material shared by the whole emitter.
    Shared,
    /// No material; the sector is present but does not radiate.
    Dark,
    /// A material already stored in the scene.
    Material(MaterialId),
}

/// Chooses the material of each sector.
pub trait SectorMaterials {
    fn sector_emission(&self, index: usize, geometry: &SectorGeometry) -> SectorEmission;
}

impl<F> SectorMaterials for F
where
    F: Fn(usize, &SectorGeometry) -> SectorEmission,
{
    fn sector_emission(&self, index: usize, geometry: &SectorGeometry) -> SectorEmission {
        self(index, geometry)
    }
}

/// Every sector radiates with the shared material.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformEmission;

impl SectorMaterials for UniformEmission {
    fn sector_emission(&self, _index: usize, _geometry: &SectorGeometry) -> SectorEmission {
        SectorEmission::Shared
    }
}

/// One placed copy of the wedge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorInstance {
    pub index: usize,
    /// Rotation about +z, in degrees.
    pub angle_deg: f64,
    pub node: NodeId,
    pub material: Option<MaterialId>,
}

/// A toroidally sliced emitter attached to a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteEmitter {
    geometry: SectorGeometry,
    wedge: SolidId,
    material: MaterialId,
    sectors: Vec<SectorInstance>,
}

impl DiscreteEmitter {
    /// Slicing parameters the emitter was built with.
    #[must_use]
    pub fn geometry(&self) -> &SectorGeometry {
        &self.geometry
    }

    /// The wedge solid every sector instances.
    #[must_use]
    pub fn wedge(&self) -> SolidId {
        self.wedge
    }

    /// The shared emissive material.
    #[must_use]
    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Placed sectors, in index order.
    #[must_use]
    pub fn sectors(&self) -> &[SectorInstance] {
        &self.sectors
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.sectors.iter().map(|s| s.node)
    }
}

/// Checks the arguments shared by both builders.
fn check_inputs(
    scene: &Scene,
    mesh: &SolpsMesh,
    field: &SolpsFunction2D,
    parent: Option<NodeId>,
) -> Result<(NodeId, MeshExtent)> {
    let parent = parent.ok_or(PlasmaSceneError::MissingParent)?;
    scene.require_node(parent)?;
    let extent = mesh.extent();
    extent.validate()?;
    if !field.is_defined_on(mesh) {
        return Err(PlasmaSceneError::FieldMeshMismatch);
    }
    match field.max_value() {
        Some(max) if max > 0.0 => {}
        Some(_) => log::warn!("emissivity is nowhere positive; the emitter will be dark"),
        None => log::warn!("emissivity contains NaN values"),
    }
    Ok((parent, extent))
}

fn solps_radiation(field: &SolpsFunction2D, step: f64) -> Result<SolpsRadiation> {
    RadiationFunction::new(AxisymmetricMapper::new(field.clone()), step)
}

/// Attaches the SOLPS emissivity as one hollow cylinder under `parent`.
///
/// The cylinder spans the mesh extents. Returns the primitive node.
pub fn make_solps_emitter(
    scene: &mut Scene,
    mesh: &SolpsMesh,
    field: &SolpsFunction2D,
    parent: Option<NodeId>,
    step: f64,
) -> Result<NodeId> {
    let (parent, extent) = check_inputs(scene, mesh, field, parent)?;
    let cylinder = hollow_cylinder(extent.min_r, extent.max_r, extent.height())?;
    // the primitive frame starts at min_z; shift back so the field sees world z
    let material = VolumeTransform::new(
        solps_radiation(field, step)?,
        translate(0.0, 0.0, -extent.min_z),
    );

    let solid = scene.add_solid(cylinder);
    let material = scene.add_material(Arc::new(material));
    let node = scene.instance(
        "solps_emitter",
        solid,
        Some(material),
        parent,
        translate(0.0, 0.0, extent.min_z),
    )?;
    log::info!(
        "attached SOLPS emitter: r in [{}, {}], z in [{}, {}], step {step}",
        extent.min_r,
        extent.max_r,
        extent.min_z,
        extent.max_z
    );
    Ok(node)
}

/// Attaches the SOLPS emissivity as `config.num_sectors` wedges under
/// `parent`, all radiating with the shared material.
pub fn make_solps_discrete_emitter(
    scene: &mut Scene,
    mesh: &SolpsMesh,
    field: &SolpsFunction2D,
    parent: Option<NodeId>,
    step: f64,
    config: &EmitterConfig,
) -> Result<DiscreteEmitter> {
    make_solps_discrete_emitter_with(scene, mesh, field, parent, step, config, &UniformEmission)
}

/// Like [`make_solps_discrete_emitter`], with the material of each sector
/// chosen by `materials`.
///
/// Materials named through [`SectorEmission::Material`] must already be
/// stored in `scene`.
pub fn make_solps_discrete_emitter_with(
    scene: &mut Scene,
    mesh: &SolpsMesh,
    field: &SolpsFunction2D,
    parent: Option<NodeId>,
    step: f64,
    config: &EmitterConfig,
    materials: &(impl SectorMaterials + ?Sized),
) -> Result<DiscreteEmitter> {
    let (parent, extent) = check_inputs(scene, mesh, field, parent)?;
    let geometry = SectorGeometry::new(&extent, config)?;
    log::debug!(
        "{} sectors of {} deg, boxes {} x {} (padding {})",
        geometry.num_sectors,
        geometry.sector_width_deg,
        geometry.box_width,
        geometry.box_height,
        geometry.padding
    );
    let wedge = geometry.wedge()?;
    let radiation = solps_radiation(field, step)?;

    let choices: Vec<SectorEmission> = (0..geometry.num_sectors)
        .map(|i| materials.sector_emission(i, &geometry))
        .collect();
    for (i, choice) in choices.iter().enumerate() {
        if let SectorEmission::Material(id) = *choice {
            if scene.material(id).is_none() {
                return Err(PlasmaSceneError::InvalidConfig(format!(
                    "sector {i} uses a material that is not stored in the scene"
                )));
            }
        }
    }

    let wedge = scene.add_solid(wedge);
    let material = scene.add_material(Arc::new(radiation));
    let mut sectors = Vec::with_capacity(choices.len());
    for (index, choice) in choices.into_iter().enumerate() {
        let sector_material = match choice {
            SectorEmission::Shared => Some(material),
            SectorEmission::Dark => None,
            SectorEmission::Material(id) => Some(id),
        };
        let angle_deg = geometry.rotation_angle_deg(index);
        let node = scene.instance(
            format!("sector_{index}"),
            wedge,
            sector_material,
            parent,
            geometry.sector_transform(index),
        )?;
        log::debug!("sector {index} at {angle_deg} deg -> node {}", node.index());
        sectors.push(SectorInstance {
            index,
            angle_deg,
            node,
            material: sector_material,
        });
    }

    log::info!(
        "attached discrete SOLPS emitter: {} sectors, r in [{}, {}], z in [{}, {}]",
        geometry.num_sectors,
        extent.min_r,
        extent.max_r,
        extent.min_z,
        extent.max_z
    );
    Ok(DiscreteEmitter {
        geometry,
        wedge,
        material,
        sectors,
    })
}
