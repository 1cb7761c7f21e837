//! Run configuration.
//!
//! The JSON layout mirrors the run files used by the SOLPS post-processing
//! chain, so key names such as `SOLPS_data_file` keep their original
//! spelling.

use std::path::{Path, PathBuf};

use plasma_scene_core::{PlasmaSceneError, Result};
use serde::{Deserialize, Serialize};

/// Number of toroidal sectors the emitter is sliced into.
pub const DEFAULT_NUM_SECTORS: usize = 8;

/// Toroidal width of a limiter, in degrees.
pub const DEFAULT_LIMITER_WIDTH_DEG: f64 = 10.0;

/// Margin added around the cutting boxes, in metres.
pub const DEFAULT_PADDING: f64 = 0.1;

/// Top-level run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Run identifier; also names the run's data directory.
    pub run: String,
    /// Directory containing one sub-directory per run.
    pub input_directory: PathBuf,
    pub plasma: PlasmaConfig,
    pub raytracing: RaytracingConfig,
    #[serde(default)]
    pub emitter: EmitterConfig,
}

/// Plasma data sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlasmaConfig {
    #[serde(rename = "SOLPS")]
    pub solps: SolpsConfig,
}

/// SOLPS data selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolpsConfig {
    /// File name prefix; the run id and extension are appended.
    #[serde(rename = "SOLPS_data_file")]
    pub data_file: String,
    #[serde(rename = "SOLPS_species_list")]
    pub species_list: Vec<String>,
    #[serde(rename = "SOLPS_type_rad")]
    pub type_rad: String,
    /// Extension of the data file, `mat` unless overridden.
    #[serde(rename = "SOLPS_data_extension", default = "default_extension")]
    pub data_extension: String,
}

fn default_extension() -> String {
    "mat".to_string()
}

/// Ray-tracing settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaytracingConfig {
    /// Volume integration step, in metres.
    pub integration_step: f64,
}

/// Toroidal slicing of the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Number of wedges around the torus.
    pub num_sectors: usize,
    /// Width of the limiter part of each sector, in degrees.
    ///
    /// Carried through to [`SectorGeometry`](crate::SectorGeometry) but not
    /// used to shape emission.
    pub limiter_angular_width_deg: f64,
    /// Safety margin around the cutting boxes, in metres.
    pub padding: f64,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            num_sectors: DEFAULT_NUM_SECTORS,
            limiter_angular_width_deg: DEFAULT_LIMITER_WIDTH_DEG,
            padding: DEFAULT_PADDING,
        }
    }
}

impl EmitterConfig {
    /// Checks the slicing parameters.
    ///
    /// A wedge is cut by two half-space boxes, which only works for sectors
    /// no wider than 180 degrees, hence at least two sectors.
    pub fn validate(&self) -> Result<()> {
        if self.num_sectors < 2 {
            return Err(PlasmaSceneError::InvalidConfig(format!(
                "num_sectors must be at least 2, got {}",
                self.num_sectors
            )));
        }
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(PlasmaSceneError::InvalidConfig(format!(
                "padding must be non-negative, got {}",
                self.padding
            )));
        }
        #[allow(clippy::cast_precision_loss)]
        let sector_width = 360.0 / self.num_sectors as f64;
        let limiter = self.limiter_angular_width_deg;
        if !(limiter.is_finite() && (0.0..=sector_width).contains(&limiter)) {
            return Err(PlasmaSceneError::InvalidConfig(format!(
                "limiter width must lie in [0, {sector_width}] degrees, got {limiter}"
            )));
        }
        Ok(())
    }
}

impl RunConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks every value the emitter builders rely on.
    pub fn validate(&self) -> Result<()> {
        let step = self.raytracing.integration_step;
        if !(step.is_finite() && step > 0.0) {
            return Err(PlasmaSceneError::InvalidConfig(format!(
                "integration_step must be positive, got {step}"
            )));
        }
        if self.plasma.solps.species_list.is_empty() {
            return Err(PlasmaSceneError::InvalidConfig(
                "SOLPS_species_list is empty".to_string(),
            ));
        }
        self.emitter.validate()
    }

    /// Path of the SOLPS data file:
    /// `{input_directory}/{run}/{SOLPS_data_file}{run}.{extension}`.
    #[must_use]
    pub fn solps_data_path(&self) -> PathBuf {
        let solps = &self.plasma.solps;
        self.input_directory.join(&self.run).join(format!(
            "{}{}.{}",
            solps.data_file, self.run, solps.data_extension
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "run": "123",
        "input_directory": "/data/solps",
        "plasma": {
            "SOLPS": {
                "SOLPS_data_file": "rad_",
                "SOLPS_species_list": ["D", "Ne"],
                "SOLPS_type_rad": "line"
            }
        },
        "raytracing": { "integration_step": 0.01 }
    }"#;

    #[test]
    fn test_parse_with_defaults() {
        let config = RunConfig::from_json_str(CONFIG).unwrap();
        assert_eq!(config.run, "123");
        assert_eq!(config.plasma.solps.species_list, vec!["D", "Ne"]);
        assert_eq!(config.plasma.solps.type_rad, "line");
        assert_eq!(config.raytracing.integration_step, 0.01);
        assert_eq!(config.emitter, EmitterConfig::default());
        assert_eq!(config.emitter.num_sectors, 8);
    }

    #[test]
    fn test_data_path() {
        let config = RunConfig::from_json_str(CONFIG).unwrap();
        assert_eq!(
            config.solps_data_path(),
            PathBuf::from("/data/solps/123/rad_123.mat")
        );
    }

    #[test]
    fn test_emitter_section() {
        let text = CONFIG.replace(
            r#""raytracing": { "integration_step": 0.01 }"#,
            r#""raytracing": { "integration_step": 0.01 },
               "emitter": { "num_sectors": 16 }"#,
        );
        let config = RunConfig::from_json_str(&text).unwrap();
        assert_eq!(config.emitter.num_sectors, 16);
        assert_eq!(config.emitter.padding, DEFAULT_PADDING);
    }

    #[test]
    fn test_rejects_bad_step() {
        let text = CONFIG.replace("0.01", "0.0");
        assert!(matches!(
            RunConfig::from_json_str(&text),
            Err(PlasmaSceneError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_missing_key() {
        let text = CONFIG.replace(r#""SOLPS_type_rad": "line""#, r#""other": "line""#);
        assert!(matches!(
            RunConfig::from_json_str(&text),
            Err(PlasmaSceneError::JsonError(_))
        ));
    }

    #[test]
    fn test_emitter_validation() {
        let single = EmitterConfig {
            num_sectors: 1,
            ..Default::default()
        };
        assert!(single.validate().is_err());

        let limiter_fills_sector = EmitterConfig {
            num_sectors: 36,
            ..Default::default()
        };
        assert!(limiter_fills_sector.validate().is_ok());

        let too_wide = EmitterConfig {
            num_sectors: 40,
            ..Default::default()
        };
        assert!(too_wide.validate().is_err());

        let negative_padding = EmitterConfig {
            padding: -0.1,
            ..Default::default()
        };
        assert!(negative_padding.validate().is_err());
    }
}
