//! Loading avatar documents and parameter files.
//!
//! Avatars are stored as JSON documents (see [`Avatar::from_json`]).
//! Parameter files hold a partial [`ParameterScale`]; omitted factors keep
//! their defaults.

use springport_convert::ParameterScale;
use springport_rig::{Avatar, RigError};
use std::path::{Path, PathBuf};

/// Error that can occur when loading an input file.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Avatar document failed to parse or referenced unknown nodes.
    InvalidAvatar { path: PathBuf, source: RigError },
    /// Parameter file failed to parse.
    InvalidParameters {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl InputError {
    /// Returns the path of the offending file.
    pub fn path(&self) -> &Path {
        match self {
            InputError::FileRead { path, .. }
            | InputError::InvalidAvatar { path, .. }
            | InputError::InvalidParameters { path, .. } => path,
        }
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::InvalidAvatar { path, source } => {
                write!(f, "invalid avatar '{}': {}", path.display(), source)
            }
            InputError::InvalidParameters { path, source } => {
                write!(f, "invalid parameter file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            InputError::InvalidAvatar { source, .. } => Some(source),
            InputError::InvalidParameters { source, .. } => Some(source),
        }
    }
}

fn read(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|source| InputError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads and validates an avatar document.
pub fn load_avatar(path: &Path) -> Result<Avatar, InputError> {
    let content = read(path)?;
    Avatar::from_json(&content).map_err(|source| InputError::InvalidAvatar {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a parameter scale file.
pub fn load_parameters(path: &Path) -> Result<ParameterScale, InputError> {
    let content = read(path)?;
    ParameterScale::from_json(&content).map_err(|source| InputError::InvalidParameters {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use springport_rig::{HumanoidBone, LocalTransform, Scene, SkeletonBoneMap};
    use tempfile::tempdir;

    #[test]
    fn test_load_avatar_roundtrip() {
        let mut scene = Scene::new("Avatar");
        let hips = scene.add_child(scene.root(), "Hips", LocalTransform::default());
        let mut skeleton = SkeletonBoneMap::new();
        skeleton.insert(HumanoidBone::Hips, hips).unwrap();
        let avatar = Avatar::new(scene, skeleton);

        let dir = tempdir().unwrap();
        let path = dir.path().join("avatar.json");
        std::fs::write(&path, avatar.to_json_pretty().unwrap()).unwrap();

        let loaded = load_avatar(&path).unwrap();
        assert_eq!(loaded.hips(), Some(hips));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = load_avatar(&path).unwrap_err();
        assert!(matches!(err, InputError::FileRead { .. }));
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn test_load_parameters_rejects_unknown_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, r#"{ "stiffness": 2.0 }"#).unwrap();
        assert!(matches!(
            load_parameters(&path),
            Err(InputError::InvalidParameters { .. })
        ));
    }
}
