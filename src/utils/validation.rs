// file: src/utils/validation.rs
// description: filesystem checks run around each stage
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "tif", "tiff"];

pub struct Validator;

impl Validator {
    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// True when `path` is a regular file with at least one byte.
    pub fn is_non_empty_file(path: &Path) -> bool {
        path.metadata()
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    pub fn first_missing_output(outputs: &[PathBuf]) -> Option<&PathBuf> {
        outputs.iter().find(|path| !Self::is_non_empty_file(path))
    }

    /// Counts image files directly inside `dir`; image listing does not recurse.
    pub fn count_images(dir: &Path) -> usize {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_type().is_file() && Self::is_image(entry.path()))
            .count()
    }

    pub fn is_image(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| {
                IMAGE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_directory() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_directory(temp.path()).is_ok());
        assert!(Validator::validate_directory(Path::new("/nonexistent")).is_err());

        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(Validator::validate_directory(&file).is_err());
    }

    #[test]
    fn test_non_empty_file() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("pairs.bin");
        let full = temp.path().join("matches.e.bin");
        fs::write(&empty, "").unwrap();
        fs::write(&full, [1u8, 2, 3]).unwrap();

        assert!(!Validator::is_non_empty_file(&empty));
        assert!(Validator::is_non_empty_file(&full));
        assert!(!Validator::is_non_empty_file(temp.path()));
        assert!(!Validator::is_non_empty_file(&temp.path().join("absent")));

        let outputs = vec![full.clone(), empty.clone()];
        assert_eq!(Validator::first_missing_output(&outputs), Some(&empty));
        assert_eq!(Validator::first_missing_output(&[full]), None);
    }

    #[test]
    fn test_count_images_top_level_only() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.JPG"), "x").unwrap();
        fs::write(temp.path().join("b.png"), "x").unwrap();
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/c.jpg"), "x").unwrap();

        assert_eq!(Validator::count_images(temp.path()), 2);
    }

    #[test]
    fn test_is_image() {
        assert!(Validator::is_image(Path::new("IMG_0001.jpeg")));
        assert!(Validator::is_image(Path::new("scan.TIF")));
        assert!(!Validator::is_image(Path::new("sfm_data.json")));
        assert!(!Validator::is_image(Path::new("README")));
    }
}
