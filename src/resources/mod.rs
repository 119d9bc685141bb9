//! Loading meshes, textures and point lists from the asset directory.
//!
//! Parsers work on in-memory text so they can be tested without files; the
//! `load_*` functions resolve names against an asset root and read from disk.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

pub mod obj;
pub mod ply;
pub mod points;
pub mod texture;

/// Resolve `file_name` against `root`. Absolute paths are returned unchanged.
pub fn asset_path(root: &Path, file_name: &str) -> PathBuf {
    let path = Path::new(file_name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

pub async fn load_string(root: &Path, file_name: &str) -> anyhow::Result<String> {
    let path = asset_path(root, file_name);
    tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))
}

pub async fn load_binary(root: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    let path = asset_path(root, file_name);
    tokio::fs::read(&path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_names_join_the_root() {
        let root = Path::new("/srv/assets");
        assert_eq!(asset_path(root, "Models/Box.obj"), PathBuf::from("/srv/assets/Models/Box.obj"));
        assert_eq!(asset_path(root, "/tmp/sky.png"), PathBuf::from("/tmp/sky.png"));
    }

    #[tokio::test]
    async fn missing_files_name_the_path() {
        let err = load_string(Path::new("/nonexistent-root"), "points.txt")
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent-root/points.txt"));
    }
}
