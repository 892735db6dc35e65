//! Dependency graph validation across a mod collection.
//!
//! Findings are data, not errors: every check appends human-readable
//! strings to an ordered list and the caller decides what to do with
//! them. A malformed record never aborts validation of the rest.

use std::collections::{BTreeMap, BTreeSet};

use crate::record::ModRecord;

/// Per-record findings: missing fields, duplicate entries in the record's
/// own dependency lists, self-dependency, self-incompatibility.
pub fn validate_record(record: &ModRecord) -> Vec<String> {
    let mut findings = Vec::new();
    let label = record.label();

    if record.id_key().is_none() {
        findings.push(format!("{label}: missing mod id"));
    }
    if record.name.as_deref().unwrap_or("").is_empty() {
        findings.push(format!("{label}: missing display name"));
    }
    if record.mod_version.as_deref().unwrap_or("").is_empty() {
        findings.push(format!("{label}: missing mod version"));
    }
    if record.minecraft_version.as_deref().unwrap_or("").is_empty() {
        findings.push(format!("{label}: missing minecraft version"));
    }
    if record.loader_version.as_deref().unwrap_or("").is_empty() {
        findings.push(format!("{label}: missing loader version"));
    }

    duplicate_entries(&mut findings, label, "required", &record.required_dependencies);
    duplicate_entries(&mut findings, label, "optional", &record.optional_dependencies);

    if record
        .required_dependencies
        .iter()
        .any(|dep| record.is_own_id(dep))
    {
        findings.push(format!("{label}: lists itself as a required dependency"));
    }
    if record
        .incompatibilities
        .iter()
        .any(|id| record.is_own_id(id))
    {
        findings.push(format!("{label}: declares itself incompatible"));
    }

    findings
}

fn duplicate_entries(findings: &mut Vec<String>, label: &str, kind: &str, deps: &[String]) {
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    for dep in deps {
        let key = dep.to_ascii_lowercase();
        if !seen.insert(key.clone()) && reported.insert(key) {
            findings.push(format!("{label}: duplicate {kind} dependency '{dep}'"));
        }
    }
}

/// Folder-wide validation: per-record findings in collection order, then
/// duplicate identifiers, environment consistency, missing required
/// dependencies, cycles, and explicit incompatibilities.
///
/// An empty collection yields no findings. Records are only read, never
/// modified.
pub fn validate_folder(records: &[ModRecord]) -> Vec<String> {
    let mut findings = Vec::new();

    for record in records {
        findings.extend(validate_record(record));
    }

    duplicate_identifiers(&mut findings, records);
    environment_consistency(&mut findings, records);
    missing_dependencies(&mut findings, records);
    cycles(&mut findings, records);
    explicit_incompatibilities(&mut findings, records);

    findings
}

/// Case-insensitive ids declared by more than one record. Reported once
/// per identifier, in first-seen order, regardless of file order.
fn duplicate_identifiers(findings: &mut Vec<String>, records: &[ModRecord]) {
    let mut order = Vec::new();
    let mut counts: BTreeMap<String, (usize, &str)> = BTreeMap::new();
    for record in records {
        let Some(key) = record.id_key() else { continue };
        let entry = counts
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                (0, record.mod_id.as_deref().unwrap_or_default())
            });
        entry.0 += 1;
    }
    for key in order {
        let (count, display) = counts[&key];
        if count > 1 {
            findings.push(format!("duplicate mod id '{display}' declared by {count} mods"));
        }
    }
}

/// More than one distinct minecraft version, loader, or loader version in
/// the folder produces a warning naming every value seen.
fn environment_consistency(findings: &mut Vec<String>, records: &[ModRecord]) {
    fn distinct(values: Vec<&str>) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        values
            .into_iter()
            .filter(|v| !v.is_empty() && seen.insert(*v))
            .collect()
    }

    let checks: [(&str, Vec<&str>); 3] = [
        (
            "minecraft versions",
            distinct(
                records
                    .iter()
                    .filter_map(|r| r.minecraft_version.as_deref())
                    .collect(),
            ),
        ),
        (
            "loaders",
            distinct(records.iter().map(|r| r.loader.name()).collect()),
        ),
        (
            "loader versions",
            distinct(
                records
                    .iter()
                    .filter_map(|r| r.loader_version.as_deref())
                    .collect(),
            ),
        ),
    ];

    for (what, values) in checks {
        if values.len() > 1 {
            findings.push(format!("mixed {what} in folder: {}", values.join(", ")));
        }
    }
}

/// Required edges whose target id is not declared by any record in the
/// collection. A record's own id is always known, so self-edges never
/// surface here; they are reported as self-dependency findings instead.
fn missing_dependencies(findings: &mut Vec<String>, records: &[ModRecord]) {
    let known = known_ids(records);
    for record in records {
        for dep in &record.required_dependencies {
            if !known.contains(&dep.to_ascii_lowercase()) {
                findings.push(format!(
                    "{}: missing required dependency '{dep}'",
                    record.label()
                ));
            }
        }
    }
}

/// Directional incompatibility edges whose target exists in the
/// collection. No symmetric report unless the target declares one itself.
fn explicit_incompatibilities(findings: &mut Vec<String>, records: &[ModRecord]) {
    let known = known_ids(records);
    for record in records {
        for id in &record.incompatibilities {
            if record.is_own_id(id) {
                continue; // covered by the per-record finding
            }
            if known.contains(&id.to_ascii_lowercase()) {
                findings.push(format!("{}: incompatible with '{id}'", record.label()));
            }
        }
    }
}

fn known_ids(records: &[ModRecord]) -> BTreeSet<String> {
    records.iter().filter_map(ModRecord::id_key).collect()
}

/// Cycle detection over required-dependency edges only. Iterative DFS
/// with an explicit stack; the visited set is shared across starts, so a
/// node is fully explored at most once and each weakly-connected cluster
/// reports at least its first cycle in traversal order.
fn cycles(findings: &mut Vec<String>, records: &[ModRecord]) {
    // Graph over known ids; edges to unknown ids are the missing-dependency
    // check's business, and self-loops are the self-dependency finding's.
    let mut display: BTreeMap<String, &str> = BTreeMap::new();
    for record in records {
        if let (Some(key), Some(id)) = (record.id_key(), record.mod_id.as_deref()) {
            display.entry(key).or_insert(id);
        }
    }
    let mut edges: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for record in records {
        let Some(from) = record.id_key() else { continue };
        let targets = edges.entry(from.clone()).or_default();
        for dep in &record.required_dependencies {
            let to = dep.to_ascii_lowercase();
            if to != from && display.contains_key(&to) && !targets.contains(&to) {
                targets.push(to);
            }
        }
    }

    let mut visited: BTreeSet<String> = BTreeSet::new();
    for record in records {
        let Some(start) = record.id_key() else { continue };
        if visited.contains(&start) {
            continue;
        }

        // Explicit DFS stack of (node, next child index); `path` doubles as
        // the on-path set.
        let mut stack: Vec<(String, usize)> = vec![(start, 0)];
        let mut path: Vec<String> = Vec::new();

        while let Some((node, child)) = stack.pop() {
            if child == 0 {
                path.push(node.clone());
            }
            let children = edges.get(&node).map(Vec::as_slice).unwrap_or_default();
            match children.get(child) {
                Some(next) => {
                    stack.push((node.clone(), child + 1));
                    if let Some(pos) = path.iter().position(|p| p == next) {
                        // Back edge: the path from the target onwards plus
                        // the closing edge is a cycle.
                        let mut names: Vec<&str> = path[pos..]
                            .iter()
                            .map(|key| display[key])
                            .collect();
                        names.push(display[next.as_str()]);
                        findings.push(format!("dependency cycle: {}", names.join(" -> ")));
                    } else if !visited.contains(next) {
                        stack.push((next.clone(), 0));
                    }
                }
                None => {
                    visited.insert(node);
                    path.pop();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Loader;

    fn record(id: &str, required: &[&str]) -> ModRecord {
        let mut r = ModRecord::new(Loader::Forge);
        r.mod_id = Some(id.to_string());
        r.name = Some(id.to_string());
        r.mod_version = Some("1.0".to_string());
        r.minecraft_version = Some("1.20.1".to_string());
        r.loader_version = Some("47".to_string());
        r.required_dependencies = required.iter().map(|s| s.to_string()).collect();
        r
    }

    #[test]
    fn test_empty_collection_has_no_findings() {
        assert!(validate_folder(&[]).is_empty());
    }

    #[test]
    fn test_clean_pair_has_no_findings() {
        let records = vec![record("a", &["b"]), record("b", &[])];
        assert!(validate_folder(&records).is_empty());
    }

    #[test]
    fn test_missing_fields_reported() {
        let mut r = ModRecord::new(Loader::Fabric);
        r.source_file_name = Some("broken.jar".to_string());
        let findings = validate_record(&r);
        assert!(findings.iter().any(|f| f.contains("missing mod id")));
        assert!(findings.iter().any(|f| f.contains("missing display name")));
        assert!(findings.iter().any(|f| f.contains("missing mod version")));
        assert!(findings.iter().any(|f| f.contains("missing minecraft version")));
        assert!(findings.iter().any(|f| f.contains("missing loader version")));
        assert!(findings.iter().all(|f| f.starts_with("broken.jar:")));
    }

    #[test]
    fn test_duplicate_entries_within_record() {
        let mut r = record("a", &["b", "B", "c"]);
        r.optional_dependencies = vec!["d".to_string(), "d".to_string()];
        let findings = validate_record(&r);
        assert!(findings
            .iter()
            .any(|f| f.contains("duplicate required dependency 'B'")));
        assert!(findings
            .iter()
            .any(|f| f.contains("duplicate optional dependency 'd'")));
    }

    #[test]
    fn test_duplicate_identifier_once_per_id() {
        let a = record("jei", &[]);
        let b = record("JEI", &[]);
        let findings = validate_folder(&[a, b]);
        let dup: Vec<&String> = findings
            .iter()
            .filter(|f| f.contains("duplicate mod id"))
            .collect();
        assert_eq!(dup.len(), 1);
        assert!(dup[0].contains("jei"));
        assert!(dup[0].contains("2 mods"));

        // Same result regardless of file order
        let a = record("jei", &[]);
        let b = record("JEI", &[]);
        let reversed = validate_folder(&[b, a]);
        assert_eq!(
            reversed
                .iter()
                .filter(|f| f.contains("duplicate mod id"))
                .count(),
            1
        );
    }

    #[test]
    fn test_environment_consistency() {
        let mut a = record("a", &[]);
        let mut b = record("b", &[]);
        a.minecraft_version = Some("1.20.1".to_string());
        b.minecraft_version = Some("1.19.2".to_string());
        b.loader = Loader::Fabric;
        let findings = validate_folder(&[a, b]);
        assert!(findings
            .iter()
            .any(|f| f.contains("mixed minecraft versions") && f.contains("1.20.1") && f.contains("1.19.2")));
        assert!(findings
            .iter()
            .any(|f| f.contains("mixed loaders") && f.contains("Forge") && f.contains("Fabric")));
    }

    #[test]
    fn test_missing_dependency() {
        let findings = validate_folder(&[record("a", &["ghost"])]);
        assert!(findings
            .iter()
            .any(|f| f.contains("a: missing required dependency 'ghost'")));
    }

    #[test]
    fn test_optional_dependencies_never_missing() {
        let mut a = record("a", &[]);
        a.optional_dependencies = vec!["ghost".to_string()];
        assert!(validate_folder(&[a]).is_empty());
    }

    #[test]
    fn test_three_mod_cycle() {
        let records = vec![
            record("a", &["b"]),
            record("b", &["c"]),
            record("c", &["a"]),
        ];
        let findings = validate_folder(&records);
        let cycle = findings
            .iter()
            .find(|f| f.contains("dependency cycle"))
            .expect("cycle finding");
        for id in ["a", "b", "c"] {
            assert!(cycle.contains(id), "{cycle} should mention {id}");
        }
    }

    #[test]
    fn test_two_mod_cycle_case_insensitive() {
        let records = vec![record("Alpha", &["beta"]), record("beta", &["ALPHA"])];
        let findings = validate_folder(&records);
        assert!(findings.iter().any(|f| f.contains("dependency cycle")));
    }

    #[test]
    fn test_no_cycle_on_diamond() {
        // a -> b, a -> c, b -> d, c -> d: shared dependency, no cycle
        let records = vec![
            record("a", &["b", "c"]),
            record("b", &["d"]),
            record("c", &["d"]),
            record("d", &[]),
        ];
        let findings = validate_folder(&records);
        assert!(!findings.iter().any(|f| f.contains("dependency cycle")));
    }

    #[test]
    fn test_self_dependency_is_not_missing_or_cycle() {
        let findings = validate_folder(&[record("a", &["a"])]);
        assert!(findings
            .iter()
            .any(|f| f.contains("lists itself as a required dependency")));
        assert!(!findings.iter().any(|f| f.contains("missing required dependency")));
        assert!(!findings.iter().any(|f| f.contains("dependency cycle")));
    }

    #[test]
    fn test_explicit_incompatibility_is_directional() {
        let mut a = record("a", &[]);
        a.incompatibilities.insert("b".to_string());
        let b = record("b", &[]);
        let findings = validate_folder(&[a, b]);
        assert!(findings.iter().any(|f| f.contains("a: incompatible with 'b'")));
        assert!(!findings.iter().any(|f| f.contains("b: incompatible")));
    }

    #[test]
    fn test_incompatibility_with_absent_mod_not_reported() {
        let mut a = record("a", &[]);
        a.incompatibilities.insert("notinstalled".to_string());
        assert!(validate_folder(&[a]).is_empty());
    }

    #[test]
    fn test_self_incompatibility() {
        let mut a = record("a", &[]);
        a.incompatibilities.insert("A".to_string());
        let findings = validate_folder(&[a]);
        assert!(findings.iter().any(|f| f.contains("declares itself incompatible")));
        assert!(!findings.iter().any(|f| f.contains("incompatible with")));
    }

    #[test]
    fn test_findings_order_is_stable() {
        let records = vec![record("a", &["ghost"]), record("b", &["ghost"])];
        let first = validate_folder(&records);
        let second = validate_folder(&records);
        assert_eq!(first, second);
        let a_pos = first.iter().position(|f| f.starts_with("a:")).unwrap();
        let b_pos = first.iter().position(|f| f.starts_with("b:")).unwrap();
        assert!(a_pos < b_pos);
    }
}
