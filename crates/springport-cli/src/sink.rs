//! Persisting converted avatars to disk.

use springport_convert::{AssetSink, ConvertError};
use springport_rig::Avatar;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the converted avatar as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Creates a sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the output path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AssetSink for JsonFileSink {
    fn save(&mut self, avatar: &Avatar) -> Result<(), ConvertError> {
        let json = avatar.to_json_pretty()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Derives the default output path: `name.json` becomes
/// `name.converted.json` next to it.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "avatar".to_string());
    input.with_file_name(format!("{}.converted.json", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use springport_rig::{Scene, SkeletonBoneMap};
    use tempfile::tempdir;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("rigs/alice.json")),
            PathBuf::from("rigs/alice.converted.json")
        );
    }

    #[test]
    fn test_sink_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/nested/avatar.json");
        let mut sink = JsonFileSink::new(&path);

        let avatar = Avatar::new(Scene::new("Avatar"), SkeletonBoneMap::new());
        sink.save(&avatar).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(Avatar::from_json(&written).unwrap(), avatar);
    }
}
