//! Format detection from file names.
//!
//! Selection is purely suffix-based and case-insensitive; file content is
//! never inspected. Unrecognized names are not an error, the caller just
//! gets no strategy.

use crate::record::Loader;
use std::path::Path;

/// Parsing strategy selected for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Jar container; the entry found inside decides the loader.
    Container,
    /// Standalone TOML-like loader config, read as text lines.
    ForgeText(Loader),
    /// Standalone JSON loader manifest.
    FabricJson(Loader),
}

/// Pick the parsing strategy for a path, or `None` when the name matches
/// none of the recognized patterns.
///
/// `neoforge.mods.toml` is checked before `mods.toml` since the former also
/// ends in the latter.
pub fn detect(path: &Path) -> Option<Format> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();

    if name.ends_with(".jar") {
        Some(Format::Container)
    } else if name.ends_with("neoforge.mods.toml") {
        Some(Format::ForgeText(Loader::NeoForge))
    } else if name.ends_with("mods.toml") {
        Some(Format::ForgeText(Loader::Forge))
    } else if name.ends_with("quilt.mod.json") {
        Some(Format::FabricJson(Loader::Quilt))
    } else if name.ends_with("fabric.mod.json") {
        Some(Format::FabricJson(Loader::Fabric))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_container() {
        assert_eq!(detect(Path::new("mods/jei-1.20.1.jar")), Some(Format::Container));
        assert_eq!(detect(Path::new("JEI.JAR")), Some(Format::Container));
    }

    #[test]
    fn test_detect_forge_family() {
        assert_eq!(
            detect(Path::new("META-INF/mods.toml")),
            Some(Format::ForgeText(Loader::Forge))
        );
        assert_eq!(
            detect(Path::new("META-INF/neoforge.mods.toml")),
            Some(Format::ForgeText(Loader::NeoForge))
        );
        // Case-insensitive
        assert_eq!(
            detect(Path::new("Mods.TOML")),
            Some(Format::ForgeText(Loader::Forge))
        );
    }

    #[test]
    fn test_neoforge_wins_over_forge_suffix() {
        // "neoforge.mods.toml" also ends with "mods.toml"
        assert_eq!(
            detect(Path::new("neoforge.mods.toml")),
            Some(Format::ForgeText(Loader::NeoForge))
        );
    }

    #[test]
    fn test_detect_fabric_family() {
        assert_eq!(
            detect(Path::new("fabric.mod.json")),
            Some(Format::FabricJson(Loader::Fabric))
        );
        assert_eq!(
            detect(Path::new("quilt.mod.json")),
            Some(Format::FabricJson(Loader::Quilt))
        );
    }

    #[test]
    fn test_unrecognized_yields_none() {
        assert_eq!(detect(Path::new("readme.txt")), None);
        assert_eq!(detect(Path::new("mod.json")), None);
        assert_eq!(detect(Path::new("jarfile.zip")), None);
        assert_eq!(detect(Path::new("")), None);
    }
}
