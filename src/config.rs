// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::pipeline::Stage;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "SFM_ORCHESTRATOR";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    pub toolchain: ToolchainConfig,
    pub pipeline: PipelineConfig,
}

/// Where the external reconstruction binaries and their data files live.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ToolchainConfig {
    pub bin_dir: PathBuf,
    pub camera_db_dir: PathBuf,
    pub camera_db_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_threads: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct PipelineConfig {
    pub verify_outputs: bool,
    pub write_report: bool,
    pub progress: bool,
}

impl ToolchainConfig {
    pub fn camera_db_path(&self) -> PathBuf {
        self.camera_db_dir.join(&self.camera_db_file)
    }

    pub fn executable(&self, stage: Stage) -> PathBuf {
        self.bin_dir.join(stage.executable())
    }
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from("./openMVG_Build/Linux-x86_64-Release"),
            camera_db_dir: PathBuf::from("./openMVG/exif/sensor_width_database"),
            camera_db_file: "sensor_width_camera_database.txt".to_string(),
            feature_threads: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            verify_outputs: true,
            write_report: true,
            progress: true,
        }
    }
}

impl Config {
    /// Defaults, then the TOML file, then `SFM_ORCHESTRATOR__*` environment variables.
    ///
    /// With no explicit path the default location is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder
                .add_source(config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            toolchain: ToolchainConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.toolchain.bin_dir.as_os_str().is_empty() {
            return Err(PipelineError::Config(
                "toolchain.bin_dir must not be empty".to_string(),
            ));
        }

        if self.toolchain.camera_db_file.trim().is_empty() {
            return Err(PipelineError::Config(
                "toolchain.camera_db_file must not be empty".to_string(),
            ));
        }

        if self.toolchain.feature_threads == Some(0) {
            return Err(PipelineError::Config(
                "toolchain.feature_threads must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.toolchain.camera_db_path(),
            PathBuf::from(
                "./openMVG/exif/sensor_width_database/sensor_width_camera_database.txt"
            )
        );
    }

    #[test]
    fn test_executable_resolves_inside_bin_dir() {
        let toolchain = ToolchainConfig {
            bin_dir: PathBuf::from("/opt/openmvg/bin"),
            ..ToolchainConfig::default()
        };
        assert_eq!(
            toolchain.executable(Stage::Reconstruct),
            PathBuf::from("/opt/openmvg/bin/openMVG_main_SfM")
        );
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pipeline.toml");
        fs::write(
            &path,
            r#"
[toolchain]
bin_dir = "/usr/local/openmvg"
feature_threads = 6

[pipeline]
write_report = false
"#,
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.toolchain.bin_dir, PathBuf::from("/usr/local/openmvg"));
        assert_eq!(config.toolchain.feature_threads, Some(6));
        assert_eq!(
            config.toolchain.camera_db_file,
            "sensor_width_camera_database.txt"
        );
        assert!(!config.pipeline.write_report);
        assert!(config.pipeline.verify_outputs);
    }

    #[test]
    fn test_load_rejects_zero_threads() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("pipeline.toml");
        fs::write(&path, "[toolchain]\nfeature_threads = 0\n").unwrap();

        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("absent.toml");
        assert!(Config::load(Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_validate_empty_camera_db_file() {
        let mut config = Config::default_config();
        config.toolchain.camera_db_file = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
