//! Radiation data of one SOLPS run.

use std::sync::Arc;

use plasma_scene_core::{PlasmaSceneError, Result};

use crate::function2d::SolpsFunction2D;
use crate::mesh::SolpsMesh;

/// Mesh plus per-species radiated power density (W m^-3) of one radiation type.
#[derive(Debug, Clone)]
pub struct SolpsSimulation {
    mesh: Arc<SolpsMesh>,
    radiation_type: String,
    species: Vec<(String, SolpsFunction2D)>,
    total: SolpsFunction2D,
}

impl SolpsSimulation {
    /// Builds a simulation from per-species cell values.
    ///
    /// The total radiation is the cell-wise sum over all species.
    pub fn new(
        mesh: Arc<SolpsMesh>,
        radiation_type: impl Into<String>,
        species: Vec<(String, Vec<f64>)>,
    ) -> Result<Self> {
        if species.is_empty() {
            return Err(PlasmaSceneError::InvalidConfig(
                "at least one species is required".to_string(),
            ));
        }

        let mut total = vec![0.0; mesh.num_cells()];
        let mut functions = Vec::with_capacity(species.len());
        for (name, values) in species {
            let f = SolpsFunction2D::new(Arc::clone(&mesh), values)?;
            for (t, v) in total.iter_mut().zip(f.values()) {
                *t += v;
            }
            functions.push((name, f));
        }
        let total = SolpsFunction2D::new(Arc::clone(&mesh), total)?;

        Ok(Self {
            mesh,
            radiation_type: radiation_type.into(),
            species: functions,
            total,
        })
    }

    /// The simulation mesh.
    #[must_use]
    pub fn mesh(&self) -> &Arc<SolpsMesh> {
        &self.mesh
    }

    /// The radiation type the data was read for.
    #[must_use]
    pub fn radiation_type(&self) -> &str {
        &self.radiation_type
    }

    /// Names of the loaded species, in load order.
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.species.iter().map(|(name, _)| name.as_str())
    }

    /// Radiation of a single species.
    #[must_use]
    pub fn radiation_f2d(&self, species: &str) -> Option<&SolpsFunction2D> {
        self.species
            .iter()
            .find(|(name, _)| name == species)
            .map(|(_, f)| f)
    }

    /// Radiation summed over all loaded species.
    #[must_use]
    pub fn total_radiation_f2d(&self) -> &SolpsFunction2D {
        &self.total
    }

    /// Total radiated power (W) of the swept toroidal volume.
    #[must_use]
    pub fn total_radiated_power(&self) -> f64 {
        self.total.volume_integral()
    }
}
