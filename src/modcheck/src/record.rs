//! Normalized mod metadata shared by every parser.
//!
//! Both the Forge-family and Fabric-family parsers produce a [`ModRecord`],
//! so everything downstream (compatibility queries, dependency validation)
//! is loader-agnostic.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Mod-loading runtime family a mod targets.
///
/// Set by the parser from the detected file format, never inferred from
/// file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Loader {
    Forge,
    NeoForge,
    Fabric,
    Quilt,
}

impl Loader {
    /// Display name of the loader.
    pub fn name(&self) -> &'static str {
        match self {
            Loader::Forge => "Forge",
            Loader::NeoForge => "NeoForge",
            Loader::Fabric => "Fabric",
            Loader::Quilt => "Quilt",
        }
    }

    /// True for the loaders whose metadata is the TOML-like config format.
    pub fn is_forge_family(&self) -> bool {
        matches!(self, Loader::Forge | Loader::NeoForge)
    }
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Metadata extracted from one mod file or container entry.
///
/// Constructed once per parse call and not modified afterwards. Absent
/// fields mean the source simply did not carry them; that is valid output,
/// not an error.
#[derive(Debug, Clone, Serialize)]
pub struct ModRecord {
    /// Stable identifier, unique within a collection when present.
    /// Compared case-insensitively everywhere.
    pub mod_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub mod_version: Option<String>,
    pub loader: Loader,
    /// Loader version or schema marker, an opaque string. Fabric-family
    /// sources store their `schemaVersion` here verbatim, so dotted-version
    /// semantics must not be assumed.
    pub loader_version: Option<String>,
    /// Always a plain version token. Forge-family range expressions are
    /// reduced to their lower bound before storage.
    pub minecraft_version: Option<String>,
    /// Identifiers this mod mandates, in declaration order. Duplicates are
    /// kept; flagging them is the validator's job.
    pub required_dependencies: Vec<String>,
    /// Identifiers this mod suggests but does not require.
    pub optional_dependencies: Vec<String>,
    /// Identifiers explicitly declared as conflicting. Duplicates collapse.
    pub incompatibilities: BTreeSet<String>,
    /// Basename of the origin file or container.
    pub source_file_name: Option<String>,
}

impl ModRecord {
    /// Empty record for the given loader.
    pub fn new(loader: Loader) -> Self {
        ModRecord {
            mod_id: None,
            name: None,
            description: None,
            mod_version: None,
            loader,
            loader_version: None,
            minecraft_version: None,
            required_dependencies: Vec::new(),
            optional_dependencies: Vec::new(),
            incompatibilities: BTreeSet::new(),
            source_file_name: None,
        }
    }

    /// Lowercased `mod_id`, the graph key, when present and non-empty.
    pub fn id_key(&self) -> Option<String> {
        match self.mod_id.as_deref() {
            Some(id) if !id.is_empty() => Some(id.to_ascii_lowercase()),
            _ => None,
        }
    }

    /// Case-insensitive comparison against this record's id.
    pub fn is_own_id(&self, other: &str) -> bool {
        match self.mod_id.as_deref() {
            Some(id) if !id.is_empty() => id.eq_ignore_ascii_case(other),
            _ => false,
        }
    }

    /// Human-readable handle for findings: the id when known, otherwise the
    /// display name, otherwise the source file name.
    pub fn label(&self) -> &str {
        self.mod_id
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.name.as_deref())
            .or(self.source_file_name.as_deref())
            .unwrap_or("<unknown mod>")
    }
}
