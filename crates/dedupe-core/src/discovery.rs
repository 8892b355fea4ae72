use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{Error, Result};

/// File extensions treated as candidate images
const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "webp", "bmp", "tif", "tiff"];

/// Discover candidate image files in the provided directories.
///
/// Walks each directory (depth-limited by the config), keeping regular
/// files with a recognized image extension. The result is sorted so a run
/// is reproducible regardless of filesystem enumeration order.
pub fn discover_images<P: AsRef<Path>>(directories: &[P], config: &Config) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for dir in directories {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Err(Error::FileNotFound(dir.to_path_buf()));
        }

        let max_depth = config.max_depth.unwrap_or(usize::MAX);

        for entry in WalkDir::new(dir)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if has_image_extension(path) {
                paths.push(path.to_path_buf());
            } else {
                debug!("Ignoring non-image file {}", path.display());
            }
        }
    }

    paths.sort();
    Ok(paths)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_images_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("photo.JPG"), b"x").unwrap();
        fs::write(dir.path().join("scan.png"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let paths = discover_images(&[dir.path()], &Config::default()).unwrap();
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn recurses_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("deep.webp"), b"x").unwrap();

        let paths = discover_images(&[dir.path()], &Config::default()).unwrap();
        assert_eq!(paths, vec![sub.join("deep.webp")]);
    }

    #[test]
    fn respects_max_depth() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        fs::write(dir.path().join("top.jpg"), b"x").unwrap();
        fs::write(sub.join("deep.jpg"), b"x").unwrap();

        let config = Config {
            max_depth: Some(1),
            ..Config::default()
        };
        let paths = discover_images(&[dir.path()], &config).unwrap();
        assert_eq!(paths, vec![dir.path().join("top.jpg")]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let result = discover_images(&[Path::new("/no/such/dir")], &Config::default());
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }
}
