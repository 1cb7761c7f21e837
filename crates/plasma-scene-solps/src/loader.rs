//! Loading SOLPS radiation data from disk.
//!
//! Two formats are understood, selected by file extension:
//!
//! - `.json`: a [`SolpsDataFile`] document.
//! - `.mat`: a MATLAB export holding `nx`, `ny`, the corner arrays `crx`
//!   and `cry` with MATLAB shape `(nx, ny, 4)`, and one `(nx, ny)` array
//!   named `<radiation_type>_<species>` per species. Needs the `matio`
//!   feature.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use plasma_scene_core::{PlasmaSceneError, Result};
use serde::{Deserialize, Serialize};

use crate::mesh::SolpsMesh;
use crate::simulation::SolpsSimulation;

/// Source of SOLPS simulations.
pub trait SimulationLoader {
    /// Loads the radiation of `species` for `radiation_type` from `path`.
    fn load(&self, path: &Path, species: &[String], radiation_type: &str)
        -> Result<SolpsSimulation>;
}

/// Reads simulations with [`load_solps_from_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl SimulationLoader for FileLoader {
    fn load(
        &self,
        path: &Path,
        species: &[String],
        radiation_type: &str,
    ) -> Result<SolpsSimulation> {
        load_solps_from_file(path, species, radiation_type)
    }
}

/// JSON layout of a SOLPS radiation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolpsDataFile {
    pub nx: usize,
    pub ny: usize,
    /// Corner R per cell, SOLPS corner order.
    pub r: Vec<[f64; 4]>,
    /// Corner Z per cell, SOLPS corner order.
    pub z: Vec<[f64; 4]>,
    /// `radiation[radiation_type][species]` holds one value per cell.
    pub radiation: BTreeMap<String, BTreeMap<String, Vec<f64>>>,
}

impl SolpsDataFile {
    /// Extracts the requested species of one radiation type.
    pub fn into_simulation(
        mut self,
        species: &[String],
        radiation_type: &str,
    ) -> Result<SolpsSimulation> {
        let mesh = Arc::new(SolpsMesh::new(self.nx, self.ny, &self.r, &self.z)?);
        let mut by_species = self
            .radiation
            .remove(radiation_type)
            .ok_or_else(|| PlasmaSceneError::MissingField(radiation_type.to_string()))?;
        let selected = species
            .iter()
            .map(|name| {
                by_species
                    .remove(name)
                    .map(|values| (name.clone(), values))
                    .ok_or_else(|| {
                        PlasmaSceneError::MissingField(format!("{radiation_type}/{name}"))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        SolpsSimulation::new(mesh, radiation_type, selected)
    }
}

/// Loads a SOLPS simulation, summing the radiation of `species`.
pub fn load_solps_from_file(
    path: impl AsRef<Path>,
    species: &[String],
    radiation_type: &str,
) -> Result<SolpsSimulation> {
    let path = path.as_ref();
    log::info!(
        "reading SOLPS {radiation_type} radiation for {species:?} from {}",
        path.display()
    );
    if species.is_empty() {
        return Err(PlasmaSceneError::InvalidConfig(
            "SOLPS species list is empty".to_string(),
        ));
    }

    let simulation = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path, species, radiation_type)?,
        Some("mat") => load_mat(path, species, radiation_type)?,
        _ => {
            return Err(PlasmaSceneError::UnsupportedFormat(
                path.display().to_string(),
            ))
        }
    };

    log::debug!(
        "loaded {} x {} mesh, total radiated power {:.3e} W",
        simulation.mesh().nx(),
        simulation.mesh().ny(),
        simulation.total_radiated_power()
    );
    Ok(simulation)
}

fn load_json(path: &Path, species: &[String], radiation_type: &str) -> Result<SolpsSimulation> {
    let text = std::fs::read_to_string(path)?;
    let data: SolpsDataFile = serde_json::from_str(&text)?;
    data.into_simulation(species, radiation_type)
}

#[cfg(feature = "matio")]
fn load_mat(path: &Path, species: &[String], radiation_type: &str) -> Result<SolpsSimulation> {
    use matio_rs::MatFile;

    fn mat_err<E: std::fmt::Display>(name: &str) -> impl FnOnce(E) -> PlasmaSceneError + '_ {
        move |e| PlasmaSceneError::MatError(format!("{name}: {e}"))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn dimension(value: f64, name: &str) -> Result<usize> {
        if value.is_finite() && value >= 1.0 && value.fract() == 0.0 {
            Ok(value as usize)
        } else {
            Err(PlasmaSceneError::MatError(format!(
                "{name} must be a positive integer, got {value}"
            )))
        }
    }

    let mat = MatFile::load(path).map_err(mat_err(&path.display().to_string()))?;
    let nx: f64 = mat.var("nx").map_err(mat_err("nx"))?;
    let ny: f64 = mat.var("ny").map_err(mat_err("ny"))?;
    let (nx, ny) = (dimension(nx, "nx")?, dimension(ny, "ny")?);
    let crx: Vec<f64> = mat.var("crx").map_err(mat_err("crx"))?;
    let cry: Vec<f64> = mat.var("cry").map_err(mat_err("cry"))?;

    let r = corners_from_column_major(&crx, nx * ny)?;
    let z = corners_from_column_major(&cry, nx * ny)?;
    let mesh = Arc::new(SolpsMesh::new(nx, ny, &r, &z)?);

    let selected = species
        .iter()
        .map(|name| {
            let var = format!("{radiation_type}_{name}");
            let values: Vec<f64> = mat.var(var.as_str()).map_err(mat_err(&var))?;
            Ok((name.clone(), values))
        })
        .collect::<Result<Vec<_>>>()?;
    SolpsSimulation::new(mesh, radiation_type, selected)
}

#[cfg(not(feature = "matio"))]
fn load_mat(path: &Path, _species: &[String], _radiation_type: &str) -> Result<SolpsSimulation> {
    Err(PlasmaSceneError::UnsupportedFormat(format!(
        "{} (MAT support requires the `matio` feature)",
        path.display()
    )))
}

/// Regroups a MATLAB `(nx, ny, 4)` column-major array into per-cell corners.
#[cfg_attr(not(feature = "matio"), allow(dead_code))]
fn corners_from_column_major(flat: &[f64], num_cells: usize) -> Result<Vec<[f64; 4]>> {
    if flat.len() != 4 * num_cells {
        return Err(PlasmaSceneError::SizeMismatch {
            expected: 4 * num_cells,
            actual: flat.len(),
        });
    }
    Ok((0..num_cells)
        .map(|i| std::array::from_fn(|k| flat[i + k * num_cells]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("plasma-scene-loader-{}-{name}", std::process::id()))
    }

    fn data_file() -> SolpsDataFile {
        let mut species = BTreeMap::new();
        species.insert("D".to_string(), vec![1.0, 2.0]);
        species.insert("Ne".to_string(), vec![10.0, 20.0]);
        let mut radiation = BTreeMap::new();
        radiation.insert("line".to_string(), species);
        SolpsDataFile {
            nx: 2,
            ny: 1,
            r: vec![[1.0, 1.5, 1.0, 1.5], [1.5, 2.0, 1.5, 2.0]],
            z: vec![[-0.5, -0.5, 0.5, 0.5], [-0.5, -0.5, 0.5, 0.5]],
            radiation,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_load_json() {
        let path = temp_path("ok.json");
        std::fs::write(&path, serde_json::to_string(&data_file()).unwrap()).unwrap();
        let sim = load_solps_from_file(&path, &names(&["D", "Ne"]), "line").unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(sim.mesh().num_cells(), 2);
        assert_eq!(sim.total_radiation_f2d().values(), &[11.0, 22.0]);
        assert_eq!(sim.radiation_type(), "line");
    }

    #[test]
    fn test_species_subset() {
        let sim = data_file()
            .into_simulation(&names(&["Ne"]), "line")
            .unwrap();
        assert_eq!(sim.total_radiation_f2d().values(), &[10.0, 20.0]);
    }

    #[test]
    fn test_missing_species() {
        let err = data_file()
            .into_simulation(&names(&["D", "Ar"]), "line")
            .unwrap_err();
        assert!(matches!(err, PlasmaSceneError::MissingField(f) if f == "line/Ar"));
    }

    #[test]
    fn test_missing_radiation_type() {
        let err = data_file()
            .into_simulation(&names(&["D"]), "bremsstrahlung")
            .unwrap_err();
        assert!(matches!(err, PlasmaSceneError::MissingField(f) if f == "bremsstrahlung"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_solps_from_file(temp_path("absent.json"), &names(&["D"]), "line")
            .unwrap_err();
        assert!(matches!(err, PlasmaSceneError::IoError(_)));
    }

    #[test]
    fn test_malformed_json() {
        let path = temp_path("bad.json");
        std::fs::write(&path, "{ \"nx\": 2 ").unwrap();
        let err = load_solps_from_file(&path, &names(&["D"]), "line").unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, PlasmaSceneError::JsonError(_)));
    }

    #[test]
    fn test_unknown_extension() {
        let err = load_solps_from_file("run.h5", &names(&["D"]), "line").unwrap_err();
        assert!(matches!(err, PlasmaSceneError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_empty_species_list() {
        let err = load_solps_from_file("run.json", &[], "line").unwrap_err();
        assert!(matches!(err, PlasmaSceneError::InvalidConfig(_)));
    }

    #[test]
    fn test_column_major_corners() {
        // two cells, corner k of cell i at i + 2k
        let flat = [0.0, 1.0, 10.0, 11.0, 20.0, 21.0, 30.0, 31.0];
        let corners = corners_from_column_major(&flat, 2).unwrap();
        assert_eq!(corners, vec![[0.0, 10.0, 20.0, 30.0], [1.0, 11.0, 21.0, 31.0]]);
        assert!(corners_from_column_major(&flat, 3).is_err());
    }

    #[cfg(not(feature = "matio"))]
    #[test]
    fn test_mat_requires_feature() {
        let err = load_solps_from_file("run.mat", &names(&["D"]), "line").unwrap_err();
        assert!(matches!(err, PlasmaSceneError::UnsupportedFormat(_)));
    }
}
