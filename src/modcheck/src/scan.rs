//! Parsing entry points and folder-wide operations.
//!
//! Everything here is synchronous and processes one file at a time; file
//! and archive handles never outlive the parse call that opened them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::archive::{ArchiveSource, JarArchive, ENTRY_PRIORITY};
use crate::detect::{detect, Format};
use crate::fabric;
use crate::forge;
use crate::record::ModRecord;
use crate::validate;
use crate::version::compatible;

/// Unrecoverable scan failures. Per-file parse problems are not errors,
/// they just drop the file from the result with a diagnostic.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("mods folder not found: {0}")]
    FolderNotFound(PathBuf),

    #[error("failed to read mods folder {path}: {source}")]
    ReadFolder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Parse one mod file or container into a normalized record.
///
/// Returns `None` for unrecognized names, containers without a metadata
/// entry, and unrecoverable content; none of these are errors to the
/// caller.
pub fn parse(path: &Path) -> Option<ModRecord> {
    let format = match detect(path) {
        Some(format) => format,
        None => {
            debug!(path = %path.display(), "no recognized mod metadata pattern");
            return None;
        }
    };

    let mut record = match format {
        Format::Container => parse_container(&JarArchive::new(path))?,
        Format::ForgeText(loader) => {
            let text = read_text(path)?;
            forge::parse_lines(text.lines(), loader)
        }
        Format::FabricJson(loader) => {
            let text = read_text(path)?;
            fabric::parse_document(&text, loader)?
        }
    };

    record.source_file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    Some(record)
}

/// Parse the metadata entry of a container. Entries are probed in loader
/// priority order; the first present entry wins and later ones are not
/// consulted.
pub fn parse_container(archive: &impl ArchiveSource) -> Option<ModRecord> {
    for (entry, loader) in ENTRY_PRIORITY {
        if !archive.entry_exists(entry) {
            continue;
        }
        let text = match archive.read_entry(entry) {
            Ok(text) => text,
            Err(err) => {
                warn!("unreadable container entry {entry}: {err}");
                return None;
            }
        };
        return if loader.is_forge_family() {
            Some(forge::parse_lines(text.lines(), *loader))
        } else {
            fabric::parse_document(&text, *loader)
        };
    }
    None
}

fn read_text(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(path = %path.display(), "unreadable mod file: {err}");
            None
        }
    }
}

/// Required-dependency ids of the mod at `path`, in declaration order.
pub fn list_required(path: &Path) -> Vec<String> {
    parse(path)
        .map(|r| r.required_dependencies)
        .unwrap_or_default()
}

/// Optional-dependency ids of the mod at `path`.
pub fn list_optional(path: &Path) -> Vec<String> {
    parse(path)
        .map(|r| r.optional_dependencies)
        .unwrap_or_default()
}

/// Declared incompatibilities of the mod at `path`.
pub fn list_incompatibilities(path: &Path) -> Vec<String> {
    parse(path)
        .map(|r| r.incompatibilities.into_iter().collect())
        .unwrap_or_default()
}

/// Whether the mod at `path` fits the given environment. The loader must
/// match exactly (case-insensitive); each version field present on the
/// record must match under the wildcard rules. Unparseable files are
/// never compatible.
pub fn is_compatible(
    path: &Path,
    mc_version: &str,
    loader: &str,
    loader_version: &str,
) -> bool {
    let Some(record) = parse(path) else {
        return false;
    };
    if !record.loader.name().eq_ignore_ascii_case(loader) {
        return false;
    }
    if let Some(mc) = record.minecraft_version.as_deref() {
        if !compatible(mc, mc_version) {
            return false;
        }
    }
    if let Some(lv) = record.loader_version.as_deref() {
        if !compatible(lv, loader_version) {
            return false;
        }
    }
    true
}

/// Parse every recognized mod file directly inside `dir`, in file-name
/// order. Files that fail to parse are skipped with a diagnostic.
pub fn scan_folder(dir: &Path) -> Result<Vec<ModRecord>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::FolderNotFound(dir.to_path_buf()));
    }

    let mut records = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| ScanError::ReadFolder {
            path: dir.to_path_buf(),
            source: err
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("walk error")),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if detect(entry.path()).is_none() {
            continue;
        }
        match parse(entry.path()) {
            Some(record) => records.push(record),
            None => debug!(path = %entry.path().display(), "skipped unparseable mod file"),
        }
    }
    Ok(records)
}

/// Which mods in `dir` support the given minecraft version.
pub fn mods_supporting(
    dir: &Path,
    mc_version: &str,
) -> Result<Vec<ModRecord>, ScanError> {
    let records = scan_folder(dir)?;
    Ok(records
        .into_iter()
        .filter(|r| {
            r.minecraft_version
                .as_deref()
                .is_some_and(|mc| compatible(mc, mc_version))
        })
        .collect())
}

/// Scan `dir` and run folder-wide validation over everything found.
pub fn validate_folder_path(dir: &Path) -> Result<Vec<String>, ScanError> {
    let records = scan_folder(dir)?;
    Ok(validate::validate_folder(&records))
}
