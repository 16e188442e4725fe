// file: src/layout.rs
// description: on-disk project layout shared by every reconstruction stage
// reference: directory and filename conventions of the OpenMVG command line tools

use crate::config::ToolchainConfig;
use crate::error::{PipelineError, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MATCHES_DIR: &str = "matches";
pub const RECONSTRUCTION_DIR: &str = "reconstruction_global";
pub const MVS_DIR: &str = "openMVS";

pub const SFM_DATA_JSON: &str = "sfm_data.json";
pub const IMAGE_DESCRIBER: &str = "image_describer.json";
pub const PAIRS_FILE: &str = "pairs.bin";
pub const PUTATIVE_MATCHES: &str = "matches.putative.bin";
pub const ESSENTIAL_MATCHES: &str = "matches.e.bin";
pub const SFM_DATA_BIN: &str = "sfm_data.bin";
pub const COLORIZED_PLY: &str = "colorized.ply";
pub const SCENE_MVS: &str = "scene.mvs";

/// Every path a pipeline run reads or writes.
///
/// Paths are derived lexically from the two directories handed to the
/// orchestrator; nothing is canonicalized, so the same inputs always yield
/// the same layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectLayout {
    input_dir: PathBuf,
    output_dir: PathBuf,
    matches_dir: PathBuf,
    reconstruction_dir: PathBuf,
    mvs_dir: PathBuf,
    camera_db_file: PathBuf,
}

impl ProjectLayout {
    pub fn derive(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        toolchain: &ToolchainConfig,
    ) -> Self {
        let input_dir = input_dir.into();
        let output_dir = output_dir.into();

        Self {
            matches_dir: output_dir.join(MATCHES_DIR),
            reconstruction_dir: output_dir.join(RECONSTRUCTION_DIR),
            mvs_dir: input_dir.join("..").join(MVS_DIR),
            camera_db_file: toolchain.camera_db_path(),
            input_dir,
            output_dir,
        }
    }

    /// Creates the output, matches and reconstruction directories when absent.
    /// The MVS directory is left alone.
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.output_dir, &self.matches_dir, &self.reconstruction_dir] {
            if dir.is_dir() {
                debug!("Directory already present: {}", dir.display());
                continue;
            }

            fs::create_dir_all(dir).map_err(|source| PipelineError::FileOperation {
                path: dir.clone(),
                source,
            })?;
            info!("Created directory: {}", dir.display());
        }

        Ok(())
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn matches_dir(&self) -> &Path {
        &self.matches_dir
    }

    pub fn reconstruction_dir(&self) -> &Path {
        &self.reconstruction_dir
    }

    pub fn mvs_dir(&self) -> &Path {
        &self.mvs_dir
    }

    pub fn camera_db_file(&self) -> &Path {
        &self.camera_db_file
    }

    pub fn sfm_data_json(&self) -> PathBuf {
        self.matches_dir.join(SFM_DATA_JSON)
    }

    pub fn image_describer(&self) -> PathBuf {
        self.matches_dir.join(IMAGE_DESCRIBER)
    }

    pub fn pairs_file(&self) -> PathBuf {
        self.matches_dir.join(PAIRS_FILE)
    }

    pub fn putative_matches(&self) -> PathBuf {
        self.matches_dir.join(PUTATIVE_MATCHES)
    }

    pub fn essential_matches(&self) -> PathBuf {
        self.matches_dir.join(ESSENTIAL_MATCHES)
    }

    pub fn sfm_data_bin(&self) -> PathBuf {
        self.reconstruction_dir.join(SFM_DATA_BIN)
    }

    pub fn colorized_ply(&self) -> PathBuf {
        self.reconstruction_dir.join(COLORIZED_PLY)
    }

    pub fn scene_mvs(&self) -> PathBuf {
        self.mvs_dir.join(SCENE_MVS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn toolchain() -> ToolchainConfig {
        ToolchainConfig {
            camera_db_dir: PathBuf::from("/opt/openmvg/sensor_db"),
            ..ToolchainConfig::default()
        }
    }

    #[test]
    fn test_derived_paths() {
        let layout = ProjectLayout::derive("/data/photos", "/data/proj", &toolchain());

        assert_eq!(layout.matches_dir(), Path::new("/data/proj/matches"));
        assert_eq!(
            layout.reconstruction_dir(),
            Path::new("/data/proj/reconstruction_global")
        );
        assert_eq!(layout.mvs_dir(), Path::new("/data/photos/../openMVS"));
        assert_eq!(
            layout.camera_db_file(),
            Path::new("/opt/openmvg/sensor_db/sensor_width_camera_database.txt")
        );
        assert_eq!(
            layout.essential_matches(),
            PathBuf::from("/data/proj/matches/matches.e.bin")
        );
        assert_eq!(
            layout.colorized_ply(),
            PathBuf::from("/data/proj/reconstruction_global/colorized.ply")
        );
        assert_eq!(
            layout.scene_mvs(),
            PathBuf::from("/data/photos/../openMVS/scene.mvs")
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = ProjectLayout::derive("imgs", "out", &toolchain());
        let b = ProjectLayout::derive("imgs", "out", &toolchain());
        assert_eq!(a, b);
    }

    #[test]
    fn test_ensure_directories_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("proj");
        let layout = ProjectLayout::derive(temp.path().join("photos"), &output, &toolchain());

        layout.ensure_directories().unwrap();
        let marker = layout.sfm_data_json();
        fs::write(&marker, "{}").unwrap();

        layout.ensure_directories().unwrap();

        assert!(layout.matches_dir().is_dir());
        assert!(layout.reconstruction_dir().is_dir());
        assert_eq!(fs::read_to_string(&marker).unwrap(), "{}");
        assert!(!layout.mvs_dir().exists());
    }

    #[test]
    fn test_ensure_directories_reports_path_on_failure() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not_a_dir");
        fs::write(&blocker, "file").unwrap();

        let layout = ProjectLayout::derive(temp.path(), &blocker, &toolchain());
        let err = layout.ensure_directories().unwrap_err();

        match err {
            PipelineError::FileOperation { path, .. } => assert_eq!(path, blocker),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
