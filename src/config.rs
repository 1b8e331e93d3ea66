use std::path::{Path, PathBuf};

use crate::error::FatalError;

pub const DEFAULT_OUTPUT_DIR: &str = "downloads";

/// Default output folder, `./downloads` with the platform separator
pub fn default_output_dir() -> PathBuf {
    Path::new(".").join(DEFAULT_OUTPUT_DIR)
}

/// Output folder chosen at startup and passed down explicitly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirectory {
    path: PathBuf,
    is_default: bool,
}

impl OutputDirectory {
    /// `None` selects the default folder
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::custom(path),
            None => Self::default_at(default_output_dir()),
        }
    }

    pub fn custom(path: PathBuf) -> Self {
        Self {
            path,
            is_default: false,
        }
    }

    /// A folder with default semantics: created on demand
    pub fn default_at(path: PathBuf) -> Self {
        Self {
            path,
            is_default: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Make sure the folder exists.
    ///
    /// The default folder is created when missing; a user-supplied one must
    /// already exist and is never created.
    pub fn ensure(&self) -> Result<PathBuf, FatalError> {
        if self.path.is_dir() {
            return Ok(self.path.clone());
        }
        if !self.is_default {
            return Err(FatalError::OutputDirMissing(self.path.clone()));
        }
        println!(
            "[*] Default output folder '{}' not found. Creating...",
            self.path.display()
        );
        std::fs::create_dir_all(&self.path).map_err(|source| FatalError::CreateOutputDir {
            path: self.path.clone(),
            source,
        })?;
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir() {
        assert_eq!(default_output_dir(), Path::new(".").join("downloads"));
        let out = OutputDirectory::from_arg(None);
        assert!(out.is_default());
        assert_eq!(out.path(), default_output_dir());
    }

    #[test]
    fn test_default_dir_is_created() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("downloads");
        let out = OutputDirectory::default_at(path.clone());

        assert_eq!(out.ensure().unwrap(), path);
        assert!(path.is_dir());
        // second call is a no-op
        assert_eq!(out.ensure().unwrap(), path);
    }

    #[test]
    fn test_custom_dir_must_exist() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("nonexistent_dir");
        let out = OutputDirectory::from_arg(Some(path.clone()));

        assert!(!out.is_default());
        assert!(matches!(out.ensure(), Err(FatalError::OutputDirMissing(p)) if p == path));
        assert!(!path.exists());
    }

    #[test]
    fn test_custom_dir_existing() {
        let root = tempfile::tempdir().unwrap();
        let out = OutputDirectory::custom(root.path().to_path_buf());
        assert_eq!(out.ensure().unwrap(), root.path());
    }
}
