//! Core abstractions for plasma-scene.
//!
//! This crate provides the scene-description kernel the emitter builders
//! are written against:
//! - [`Solid`] constructive solid geometry with point containment
//! - [`Scene`] arena of nodes, shared solids and shared materials
//! - [`VolumeEmitter`] materials and the [`Function2D`]/[`Function3D`] traits
//! - transform helpers in [`transform`]

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod function;
pub mod material;
pub mod scene;
pub mod solid;
pub mod transform;

pub use error::{PlasmaSceneError, Result};
pub use function::{AxisymmetricMapper, Function2D, Function3D};
pub use material::{RadiationFunction, VolumeEmitter, VolumeTransform};
pub use scene::{MaterialId, Node, NodeId, NodeKind, Scene, SolidId};
pub use solid::{Shape, Solid};

// Re-export glam types for convenience
pub use glam::{DAffine3, DVec2, DVec3};
