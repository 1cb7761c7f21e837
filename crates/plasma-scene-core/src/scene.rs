//! The scene arena.
//!
//! A [`Scene`] owns three arenas: nodes, solids and materials. Nodes form a
//! tree rooted at the world node. A primitive node references one solid and
//! optionally one material by id, so many nodes can instance the same
//! geometry and share the same material without copying either.

use std::sync::Arc;

use glam::{DAffine3, DVec3};

use crate::error::{PlasmaSceneError, Result};
use crate::material::VolumeEmitter;
use crate::solid::Solid;

/// Identifier of a node in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Identifier of a solid stored in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SolidId(usize);

/// Identifier of a material stored in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(usize);

impl NodeId {
    /// Returns the arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A pure transform node.
    Group,
    /// An instance of a stored solid.
    Primitive {
        solid: SolidId,
        material: Option<MaterialId>,
    },
}

/// A node of the scene tree.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    transform: DAffine3,
    kind: NodeKind,
}

impl Node {
    /// Returns the node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parent node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the child nodes in insertion order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns the local-to-parent transform.
    #[must_use]
    pub fn transform(&self) -> DAffine3 {
        self.transform
    }

    /// Returns what the node carries.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }
}

/// In-memory scene description.
///
/// Nodes live in an append-only arena. Removed nodes leave an empty slot
/// that is never reused, so a stale [`NodeId`] keeps resolving to nothing.
/// Solids and materials are shared between nodes and are only released
/// when the scene is dropped.
pub struct Scene {
    nodes: Vec<Option<Node>>,
    solids: Vec<Solid>,
    materials: Vec<Arc<dyn VolumeEmitter>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates a scene holding only the world root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node {
                name: "world".to_string(),
                parent: None,
                children: Vec::new(),
                transform: DAffine3::IDENTITY,
                kind: NodeKind::Group,
            })],
            solids: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// Returns the world root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Gets a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Gets a node by id, failing if it does not exist.
    pub fn require_node(&self, id: NodeId) -> Result<&Node> {
        self.node(id).ok_or(PlasmaSceneError::NodeNotFound(id.0))
    }

    /// Returns the children of a node, empty if the node does not exist.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or_default()
    }

    /// Returns the number of live nodes, including the root.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Returns the number of stored solids.
    #[must_use]
    pub fn num_solids(&self) -> usize {
        self.solids.len()
    }

    /// Returns the number of stored materials.
    #[must_use]
    pub fn num_materials(&self) -> usize {
        self.materials.len()
    }

    /// Stores a solid for instancing.
    pub fn add_solid(&mut self, solid: Solid) -> SolidId {
        self.solids.push(solid);
        SolidId(self.solids.len() - 1)
    }

    /// Gets a stored solid.
    #[must_use]
    pub fn solid(&self, id: SolidId) -> Option<&Solid> {
        self.solids.get(id.0)
    }

    /// Stores a material for sharing between primitives.
    pub fn add_material(&mut self, material: Arc<dyn VolumeEmitter>) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Gets a stored material.
    #[must_use]
    pub fn material(&self, id: MaterialId) -> Option<&Arc<dyn VolumeEmitter>> {
        self.materials.get(id.0)
    }

    /// Adds a group node under `parent`.
    pub fn add_group(
        &mut self,
        name: impl Into<String>,
        parent: NodeId,
        transform: DAffine3,
    ) -> Result<NodeId> {
        self.require_node(parent)?;
        Ok(self.attach(name.into(), parent, transform, NodeKind::Group))
    }

    /// Adds a primitive node under `parent` that instances `solid`.
    ///
    /// Fails without touching the scene if the parent, solid or material
    /// does not exist.
    pub fn instance(
        &mut self,
        name: impl Into<String>,
        solid: SolidId,
        material: Option<MaterialId>,
        parent: NodeId,
        transform: DAffine3,
    ) -> Result<NodeId> {
        self.require_node(parent)?;
        if self.solid(solid).is_none() {
            return Err(PlasmaSceneError::InvalidConfig(format!(
                "solid {} is not stored in this scene",
                solid.0
            )));
        }
        if let Some(material) = material {
            if self.material(material).is_none() {
                return Err(PlasmaSceneError::InvalidConfig(format!(
                    "material {} is not stored in this scene",
                    material.0
                )));
            }
        }
        Ok(self.attach(
            name.into(),
            parent,
            transform,
            NodeKind::Primitive { solid, material },
        ))
    }

    fn attach(
        &mut self,
        name: String,
        parent: NodeId,
        transform: DAffine3,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node {
            name,
            parent: Some(parent),
            children: Vec::new(),
            transform,
            kind,
        }));
        if let Some(Some(p)) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    /// Removes a node and all of its descendants.
    ///
    /// Stored solids and materials are kept. The freed slots are not reused,
    /// so ids of removed nodes stay invalid. Returns the number of removed
    /// nodes. The root cannot be removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<usize> {
        if id == self.root() {
            return Err(PlasmaSceneError::InvalidConfig(
                "the world root cannot be removed".to_string(),
            ));
        }
        let parent = self.require_node(id)?.parent;
        if let Some(Some(p)) = parent.and_then(|p| self.nodes.get_mut(p.0)) {
            p.children.retain(|&c| c != id);
        }

        let mut removed = 0;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(next.0).and_then(Option::take) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        log::debug!("removed {removed} node(s) starting at node {}", id.0);
        Ok(removed)
    }

    /// Returns the local-to-world transform of a node.
    #[must_use]
    pub fn world_transform(&self, id: NodeId) -> Option<DAffine3> {
        let mut node = self.node(id)?;
        let mut transform = node.transform;
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            transform = node.transform * transform;
        }
        Some(transform)
    }

    /// Returns whether a world-space point lies inside a primitive node.
    pub fn primitive_contains(&self, id: NodeId, point: DVec3) -> Result<bool> {
        let node = self.require_node(id)?;
        let NodeKind::Primitive { solid, .. } = node.kind else {
            return Err(PlasmaSceneError::NotAPrimitive(id.0));
        };
        let world = self
            .world_transform(id)
            .ok_or(PlasmaSceneError::NodeNotFound(id.0))?;
        let local = world.inverse().transform_point3(point);
        Ok(self.solids[solid.0].contains(local))
    }

    /// Iterates over the live primitive nodes.
    pub fn primitives(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().filter_map(|(i, n)| {
            n.as_ref()
                .filter(|n| matches!(n.kind, NodeKind::Primitive { .. }))
                .map(|n| (NodeId(i), n))
        })
    }

    /// Total emission (W m^-3 sr^-1) at a world-space point.
    ///
    /// Sums the materials of every primitive containing the point, each
    /// evaluated in its primitive's local frame.
    #[must_use]
    pub fn emission_at(&self, point: DVec3) -> f64 {
        self.primitives()
            .filter_map(|(id, node)| {
                let NodeKind::Primitive {
                    solid,
                    material: Some(material),
                } = node.kind
                else {
                    return None;
                };
                let local = self.world_transform(id)?.inverse().transform_point3(point);
                self.solids[solid.0]
                    .contains(local)
                    .then(|| self.materials[material.0].emission_at(local))
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::RadiationFunction;
    use crate::transform::{rotate_z, translate};
    use std::f64::consts::PI;

    fn unit_box() -> Solid {
        Solid::box_from_points(DVec3::ZERO, DVec3::ONE).unwrap()
    }

    #[test]
    fn test_scene_creation() {
        let scene = Scene::new();
        assert_eq!(scene.num_nodes(), 1);
        assert_eq!(scene.require_node(scene.root()).unwrap().name(), "world");
        assert!(scene.children(scene.root()).is_empty());
    }

    #[test]
    fn test_instance_shares_solid() {
        let mut scene = Scene::new();
        let solid = scene.add_solid(unit_box());
        let root = scene.root();
        let a = scene
            .instance("a", solid, None, root, DAffine3::IDENTITY)
            .unwrap();
        let b = scene
            .instance("b", solid, None, root, translate(5.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(scene.num_solids(), 1);
        assert_eq!(scene.children(root), &[a, b]);
        assert!(scene.primitive_contains(a, DVec3::splat(0.5)).unwrap());
        assert!(!scene.primitive_contains(b, DVec3::splat(0.5)).unwrap());
        assert!(scene
            .primitive_contains(b, DVec3::new(5.5, 0.5, 0.5))
            .unwrap());
    }

    #[test]
    fn test_instance_rejects_unknown_parent() {
        let mut scene = Scene::new();
        let solid = scene.add_solid(unit_box());
        let result = scene.instance("x", solid, None, NodeId(42), DAffine3::IDENTITY);
        assert!(matches!(result, Err(PlasmaSceneError::NodeNotFound(42))));
        assert_eq!(scene.num_nodes(), 1);
    }

    #[test]
    fn test_instance_rejects_unknown_material() {
        let mut scene = Scene::new();
        let solid = scene.add_solid(unit_box());
        let root = scene.root();
        let result = scene.instance("x", solid, Some(MaterialId(3)), root, DAffine3::IDENTITY);
        assert!(matches!(result, Err(PlasmaSceneError::InvalidConfig(_))));
        assert_eq!(scene.num_nodes(), 1);
    }

    #[test]
    fn test_world_transform_composes() {
        let mut scene = Scene::new();
        let root = scene.root();
        let group = scene.add_group("g", root, rotate_z(90.0)).unwrap();
        let solid = scene.add_solid(unit_box());
        let leaf = scene
            .instance("leaf", solid, None, group, translate(1.0, 0.0, 0.0))
            .unwrap();
        let p = scene
            .world_transform(leaf)
            .unwrap()
            .transform_point3(DVec3::ZERO);
        assert!((p - DVec3::Y).length() < 1e-12);
    }

    #[test]
    fn test_remove_subtree() {
        let mut scene = Scene::new();
        let root = scene.root();
        let group = scene.add_group("g", root, DAffine3::IDENTITY).unwrap();
        let solid = scene.add_solid(unit_box());
        let leaf = scene
            .instance("leaf", solid, None, group, DAffine3::IDENTITY)
            .unwrap();
        assert_eq!(scene.remove_subtree(group).unwrap(), 2);
        assert!(scene.node(leaf).is_none());
        assert!(scene.children(root).is_empty());
        assert_eq!(scene.num_solids(), 1);
        assert!(scene.remove_subtree(root).is_err());
        assert!(scene.remove_subtree(group).is_err());
    }

    #[test]
    fn test_removed_ids_stay_invalid() {
        let mut scene = Scene::new();
        let root = scene.root();
        let old = scene.add_group("old", root, DAffine3::IDENTITY).unwrap();
        scene.remove_subtree(old).unwrap();
        let new = scene.add_group("new", root, DAffine3::IDENTITY).unwrap();
        assert_ne!(old, new);
        assert!(scene.node(old).is_none());
        assert!(scene.remove_subtree(old).is_err());
        assert_eq!(scene.node(new).map(Node::name), Some("new"));
    }

    #[test]
    fn test_group_is_not_primitive() {
        let mut scene = Scene::new();
        let root = scene.root();
        let group = scene.add_group("g", root, DAffine3::IDENTITY).unwrap();
        assert!(matches!(
            scene.primitive_contains(group, DVec3::ZERO),
            Err(PlasmaSceneError::NotAPrimitive(_))
        ));
    }

    #[test]
    fn test_emission_sums_containing_primitives() {
        let mut scene = Scene::new();
        let root = scene.root();
        let solid = scene.add_solid(unit_box());
        let material = scene.add_material(Arc::new(
            RadiationFunction::new(|_x: f64, _y: f64, _z: f64| 4.0 * PI, 0.01).unwrap(),
        ));
        scene
            .instance("a", solid, Some(material), root, DAffine3::IDENTITY)
            .unwrap();
        scene
            .instance("b", solid, Some(material), root, translate(0.5, 0.0, 0.0))
            .unwrap();
        assert!((scene.emission_at(DVec3::new(0.25, 0.5, 0.5)) - 1.0).abs() < 1e-12);
        assert!((scene.emission_at(DVec3::new(0.75, 0.5, 0.5)) - 2.0).abs() < 1e-12);
        assert_eq!(scene.emission_at(DVec3::splat(3.0)), 0.0);
    }
}
