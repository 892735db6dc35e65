//! Jar container access.
//!
//! The rest of the crate only consumes the [`ArchiveSource`] capability
//! ("does this entry exist", "read this entry as text"); [`JarArchive`] is
//! the zip-backed implementation. File handles are scoped to the single
//! call that opened them and are closed before it returns, error path
//! included.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::record::Loader;

/// Metadata entries probed inside a container, in priority order. The
/// first present entry wins and later ones are not consulted.
pub const ENTRY_PRIORITY: &[(&str, Loader)] = &[
    ("META-INF/neoforge.mods.toml", Loader::NeoForge),
    ("META-INF/mods.toml", Loader::Forge),
    ("quilt.mod.json", Loader::Quilt),
    ("fabric.mod.json", Loader::Fabric),
];

/// Errors that can occur while reading a container.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("entry not found: {0}")]
    EntryNotFound(String),
}

/// Read-only access to named entries of a mod container.
pub trait ArchiveSource {
    /// Whether the archive has an entry with this exact name.
    fn entry_exists(&self, name: &str) -> bool;

    /// Read an entry as text. Non-UTF-8 bytes are replaced rather than
    /// rejected, matching the tolerant parsing downstream.
    fn read_entry(&self, name: &str) -> Result<String, ArchiveError>;
}

/// A jar (zip) container on disk. Holds only the path; the file is opened
/// per call and dropped on return.
pub struct JarArchive {
    path: PathBuf,
}

impl JarArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JarArchive { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<zip::ZipArchive<File>, ArchiveError> {
        let file = File::open(&self.path).map_err(|source| ArchiveError::Open {
            path: self.path.clone(),
            source,
        })?;
        zip::ZipArchive::new(file).map_err(|source| ArchiveError::Archive {
            path: self.path.clone(),
            source,
        })
    }
}

impl ArchiveSource for JarArchive {
    fn entry_exists(&self, name: &str) -> bool {
        match self.open() {
            Ok(mut archive) => archive.by_name(name).is_ok(),
            Err(_) => false,
        }
    }

    fn read_entry(&self, name: &str) -> Result<String, ArchiveError> {
        let mut archive = self.open()?;
        let mut entry = match archive.by_name(name) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => {
                return Err(ArchiveError::EntryNotFound(name.to_string()));
            }
            Err(source) => {
                return Err(ArchiveError::Archive {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|source| ArchiveError::Open {
                path: self.path.clone(),
                source,
            })?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    /// Write a jar with the given (entry name, content) pairs.
    pub(crate) fn write_jar(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_entry_exists_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("example.jar");
        write_jar(&jar, &[("META-INF/mods.toml", "modId=\"example\"")]);

        let archive = JarArchive::new(&jar);
        assert!(archive.entry_exists("META-INF/mods.toml"));
        assert!(!archive.entry_exists("fabric.mod.json"));
        assert_eq!(
            archive.read_entry("META-INF/mods.toml").unwrap(),
            "modId=\"example\""
        );
    }

    #[test]
    fn test_missing_entry_is_typed() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("empty.jar");
        write_jar(&jar, &[("other.txt", "x")]);

        let archive = JarArchive::new(&jar);
        match archive.read_entry("quilt.mod.json") {
            Err(ArchiveError::EntryNotFound(name)) => assert_eq!(name, "quilt.mod.json"),
            other => panic!("expected EntryNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_unreadable_container() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_jar = dir.path().join("broken.jar");
        std::fs::write(&not_a_jar, b"not a zip file").unwrap();

        let archive = JarArchive::new(&not_a_jar);
        assert!(!archive.entry_exists("META-INF/mods.toml"));
        assert!(archive.read_entry("META-INF/mods.toml").is_err());
    }

    #[test]
    fn test_missing_file() {
        let archive = JarArchive::new("/nonexistent/path.jar");
        assert!(!archive.entry_exists("META-INF/mods.toml"));
        assert!(matches!(
            archive.read_entry("META-INF/mods.toml"),
            Err(ArchiveError::Open { .. })
        ));
    }
}
