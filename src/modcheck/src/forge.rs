//! Forge-family (TOML-like) mod config parsing.
//!
//! Real-world `mods.toml` files are hand-edited and frequently violate the
//! grammar (stray whitespace, non-standard multiline strings, partial
//! blocks), so this is a tolerant line scanner, not a validating TOML
//! parser. Unknown or malformed lines are ignored; the parser never fails.
//! A file with no mod-declaration block yields a record with only the
//! loader set, which is valid output.

use crate::record::{Loader, ModRecord};

/// Parse a sequence of config lines into a record.
pub fn parse_lines<I, S>(lines: I, loader: Loader) -> ModRecord
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut record = ModRecord::new(loader);
    let mut scanner = LineScanner::default();
    for line in lines {
        scanner.step(&mut record, line.as_ref());
    }
    scanner.finish(&mut record);
    record
}

/// Mod-declaration field a value can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModField {
    Id,
    DisplayName,
    Description,
    Version,
}

/// Accumulated state of the dependency block being scanned. Routed into
/// the record when the block ends (next section header or end of input),
/// so field order inside the block does not matter.
#[derive(Debug, Default)]
struct DependencyBlock {
    target: Option<String>,
    mandatory: Option<bool>,
    version_range: Option<String>,
}

/// In-progress triple-quoted string.
#[derive(Debug)]
struct Multiline {
    field: ModField,
    marker: &'static str,
    pieces: Vec<String>,
}

/// Scanner state threaded through each line step. Kept separate from the
/// record so arbitrary line sequences can be fed in tests.
#[derive(Debug, Default)]
struct LineScanner {
    in_mods_block: bool,
    dependency: Option<DependencyBlock>,
    multiline: Option<Multiline>,
}

impl LineScanner {
    fn step(&mut self, record: &mut ModRecord, line: &str) {
        // Multiline accumulation swallows everything until the closing
        // marker, section headers included.
        if let Some(mut ml) = self.multiline.take() {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_suffix(ml.marker) {
                let rest = rest.trim_end();
                if !rest.is_empty() {
                    ml.pieces.push(rest.to_string());
                }
                assign_field(record, ml.field, ml.pieces.join(" "));
            } else {
                if !trimmed.is_empty() {
                    ml.pieces.push(trimmed.to_string());
                }
                self.multiline = Some(ml);
            }
            return;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return;
        }

        if trimmed.starts_with('[') {
            self.enter_section(record, trimmed);
            return;
        }

        if let Some(dep) = self.dependency.as_mut() {
            Self::dependency_line(dep, trimmed);
        } else if self.in_mods_block {
            self.mods_line(record, trimmed);
        } else {
            global_line(record, trimmed);
        }
    }

    /// Flush any open state at end of input. An unterminated multiline
    /// string keeps what was accumulated rather than being dropped.
    fn finish(mut self, record: &mut ModRecord) {
        if let Some(ml) = self.multiline.take() {
            assign_field(record, ml.field, ml.pieces.join(" "));
        }
        self.flush_dependency(record);
    }

    fn enter_section(&mut self, record: &mut ModRecord, line: &str) {
        self.flush_dependency(record);

        let line = line.split('#').next().unwrap_or(line);
        let section = line.trim().trim_matches(|c| c == '[' || c == ']').trim();
        let lower = section.to_ascii_lowercase();

        self.in_mods_block = lower == "mods";
        if lower.starts_with("dependencies") {
            self.dependency = Some(DependencyBlock {
                target: section_target(section, "dependencies."),
                ..DependencyBlock::default()
            });
        } else if lower.contains("incompatibilities") {
            if let Some(id) = section_target(section, "incompatibilities.") {
                record.incompatibilities.insert(id);
            }
        }
    }

    fn dependency_line(dep: &mut DependencyBlock, line: &str) {
        if line.contains("modId") {
            if let Some(value) = quoted_value(line) {
                dep.target = Some(value);
            }
        } else if line.contains("versionRange") {
            if let Some(value) = quoted_value(line) {
                dep.version_range = Some(value);
            }
        } else if line.contains("mandatory") {
            if let Some(flag) = bool_value(line) {
                dep.mandatory = Some(flag);
            }
        } else if line.contains("type") {
            // NeoForge spells the flag as type="required"/"optional"
            match quoted_value(line).as_deref() {
                Some("required") => dep.mandatory = Some(true),
                Some("optional") => dep.mandatory = Some(false),
                _ => {}
            }
        }
    }

    fn mods_line(&mut self, record: &mut ModRecord, line: &str) {
        let field = if line.contains("modId") {
            ModField::Id
        } else if line.contains("displayName") {
            ModField::DisplayName
        } else if line.contains("description") {
            ModField::Description
        } else if line.contains("version") {
            ModField::Version
        } else {
            return;
        };

        if let Some((marker, rest)) = multiline_open(line) {
            match rest.strip_suffix(marker) {
                // Opened and closed on the same line
                Some(inner) => assign_field(record, field, inner.trim().to_string()),
                None => {
                    let mut pieces = Vec::new();
                    let rest = rest.trim();
                    if !rest.is_empty() {
                        pieces.push(rest.to_string());
                    }
                    self.multiline = Some(Multiline { field, marker, pieces });
                }
            }
            return;
        }

        if let Some(value) = quoted_value(line) {
            assign_field(record, field, value);
        }
    }

    /// Route the finished dependency block into the record.
    fn flush_dependency(&mut self, record: &mut ModRecord) {
        let Some(dep) = self.dependency.take() else {
            return;
        };
        let Some(target) = dep.target else {
            return;
        };
        if target.is_empty() {
            return;
        }

        // The version range on the minecraft pseudo-dependency is where
        // Forge-family configs carry the game version.
        if target.eq_ignore_ascii_case("minecraft") {
            if let Some(range) = dep.version_range.as_deref() {
                record.minecraft_version = Some(range_lower_bound(range));
            }
        }

        // Self-dependencies are dropped at parse time; the validator owns
        // reporting them when they survive through other paths.
        if record.is_own_id(&target) {
            return;
        }

        match dep.mandatory {
            Some(true) => record.required_dependencies.push(target),
            Some(false) => record.optional_dependencies.push(target),
            None => {}
        }
    }
}

fn assign_field(record: &mut ModRecord, field: ModField, value: String) {
    let slot = match field {
        ModField::Id => &mut record.mod_id,
        ModField::DisplayName => &mut record.name,
        ModField::Description => &mut record.description,
        ModField::Version => &mut record.mod_version,
    };
    *slot = Some(value);
}

/// Keys recognized outside both the mods block and dependency blocks.
fn global_line(record: &mut ModRecord, line: &str) {
    if line.contains("loaderVersion") {
        if let Some(value) = quoted_value(line) {
            record.loader_version = Some(value);
        }
    } else if line.contains("mcVersion") || line.contains("minecraftVersion") {
        if let Some(value) = quoted_value(line) {
            // The stored minecraft version is always a plain token
            record.minecraft_version = Some(range_lower_bound(&value));
        }
    }
}

/// Identifier embedded after `prefix` in a section header, e.g.
/// `dependencies.jei` -> `jei`. Matched case-insensitively by containment.
fn section_target(section: &str, prefix: &str) -> Option<String> {
    let idx = section.to_ascii_lowercase().find(prefix)?;
    let target = section[idx + prefix.len()..].trim().trim_matches('"');
    if target.is_empty() {
        None
    } else {
        Some(target.to_string())
    }
}

/// Reduce a version-range expression to its lower bound: first element
/// before a comma, bracket/paren characters stripped. Plain versions pass
/// through unchanged.
pub(crate) fn range_lower_bound(range: &str) -> String {
    let first = range.split(',').next().unwrap_or(range);
    first
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '(' | ')'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Right-hand side of a `key = "value"` line: split at the first `=`,
/// strip one matching pair of surrounding quotes, unescape. Lines with no
/// `=` or no quotes yield `None` and never overwrite an existing value.
fn quoted_value(line: &str) -> Option<String> {
    let (_, rhs) = line.split_once('=')?;
    let rhs = rhs.trim();
    let quote = rhs.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    if rhs.len() < 2 || !rhs[1..].ends_with(quote) {
        return None;
    }
    Some(unescape(&rhs[1..rhs.len() - 1]))
}

fn bool_value(line: &str) -> Option<bool> {
    let (_, rhs) = line.split_once('=')?;
    let rhs = rhs.trim();
    if rhs.starts_with("true") {
        Some(true)
    } else if rhs.starts_with("false") {
        Some(false)
    } else {
        None
    }
}

/// `=`-value opening with a triple-quote marker: returns the marker and
/// whatever follows it on the same line.
fn multiline_open(line: &str) -> Option<(&'static str, &str)> {
    let (_, rhs) = line.split_once('=')?;
    let rhs = rhs.trim();
    for marker in ["\"\"\"", "'''"] {
        if let Some(rest) = rhs.strip_prefix(marker) {
            return Some((marker, rest));
        }
    }
    None
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            // Unknown escapes pass through untouched
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
