//! Fabric-family (JSON) mod manifest parsing.
//!
//! Manifests in the wild embed literal newlines and tabs inside string
//! values, which strict JSON rejects. A sanitize pre-pass repairs the
//! string literals before handing the document to serde_json; anything
//! still unparseable afterwards is reported as a diagnostic and dropped,
//! never propagated.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::record::{Loader, ModRecord};

/// Quoted string literal: quote, a run of non-quote-or-escape characters
/// or escape pairs, quote. `(?s)` so literal control bytes inside the run
/// stay inside the match.
static STRING_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)"(?:[^"\\]|\\.)*""#).expect("literal pattern compiles"));

/// Parse raw JSON manifest text into a record, or `None` when the document
/// is structurally unrecoverable.
pub fn parse_document(raw: &str, loader: Loader) -> Option<ModRecord> {
    let sanitized = sanitize(raw);
    let doc: Value = match serde_json::from_str(&sanitized) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(loader = loader.name(), "unparseable mod manifest: {err}");
            return None;
        }
    };

    let mut record = ModRecord::new(loader);
    record.mod_id = string_field(&doc, "id");
    record.name = string_field(&doc, "name");
    record.description = string_field(&doc, "description");
    record.mod_version = string_field(&doc, "version");

    // A loader-internal schema marker, stored verbatim whatever its JSON
    // type. Callers must not assume dotted-version semantics.
    record.loader_version = doc.get("schemaVersion").map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });

    if let Some(depends) = doc.get("depends").and_then(FieldShape::of) {
        collect_depends(&mut record, &depends);
    }

    if let Some(Value::Object(suggests)) = doc.get("suggests") {
        // Object form only
        record
            .optional_dependencies
            .extend(suggests.keys().cloned());
    }

    for key in ["breaks", "conflicts"] {
        if let Some(shape) = doc.get(key).and_then(FieldShape::of) {
            record.incompatibilities.extend(shape.ids());
        }
    }

    Some(record)
}

/// Repair string literals that embed raw control characters, and escape
/// any backslash or quote that would otherwise break the JSON grammar.
/// Best-effort normalization, not a guarantee of recovery.
pub fn sanitize(raw: &str) -> String {
    STRING_LITERAL
        .replace_all(raw, |caps: &regex::Captures<'_>| {
            let matched = &caps[0];
            let inner = &matched[1..matched.len() - 1];
            format!("\"{}\"", escape_literal(inner))
        })
        .into_owned()
}

fn escape_literal(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => match chars.peek() {
                Some(&next) if is_json_escape(next) => {
                    out.push('\\');
                    // Consume the escape pair so its second half is not
                    // re-inspected as a control character
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                _ => out.push_str("\\\\"),
            },
            other => out.push(other),
        }
    }
    out
}

fn is_json_escape(c: char) -> bool {
    matches!(c, '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u')
}

fn string_field(doc: &Value, key: &str) -> Option<String> {
    doc.get(key).and_then(Value::as_str).map(str::to_string)
}

/// The union shape ecosystem tools use for dependency-like fields:
/// an object keyed by id, or an array of ids. Resolved once at the JSON
/// boundary so object/array handling is not duplicated per field.
enum FieldShape<'a> {
    Object(&'a serde_json::Map<String, Value>),
    Array(&'a [Value]),
}

impl<'a> FieldShape<'a> {
    fn of(value: &'a Value) -> Option<FieldShape<'a>> {
        match value {
            Value::Object(map) => Some(FieldShape::Object(map)),
            Value::Array(items) => Some(FieldShape::Array(items)),
            _ => None,
        }
    }

    /// Every identifier the field names: property names in object form,
    /// string elements (or objects carrying an `id`) in array form.
    fn ids(&self) -> Vec<String> {
        match self {
            FieldShape::Object(map) => map.keys().cloned().collect(),
            FieldShape::Array(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(obj) => {
                        obj.get("id").and_then(Value::as_str).map(str::to_string)
                    }
                    _ => None,
                })
                .collect(),
        }
    }
}

/// `depends` feeds required dependencies, except the reserved `minecraft`
/// entry, whose value is the game version.
fn collect_depends(record: &mut ModRecord, depends: &FieldShape<'_>) {
    if let FieldShape::Object(map) = depends {
        if let Some(value) = map.iter().find_map(|(k, v)| {
            k.eq_ignore_ascii_case("minecraft").then_some(v)
        }) {
            record.minecraft_version = minecraft_version_of(value);
        }
    }

    for id in depends.ids() {
        if !id.eq_ignore_ascii_case("minecraft") {
            record.required_dependencies.push(id);
        }
    }
}

/// The minecraft entry's value: a version string, or an array whose first
/// string element is taken.
fn minecraft_version_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items
            .iter()
            .find_map(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Option<ModRecord> {
        parse_document(raw, Loader::Fabric)
    }

    #[test]
    fn test_basic_fields() {
        let record = parse(
            r#"{"schemaVersion": 1, "id": "sodium", "name": "Sodium", "version": "0.5.8", "description": "Rendering engine"}"#,
        )
        .unwrap();
        assert_eq!(record.mod_id.as_deref(), Some("sodium"));
        assert_eq!(record.name.as_deref(), Some("Sodium"));
        assert_eq!(record.mod_version.as_deref(), Some("0.5.8"));
        assert_eq!(record.description.as_deref(), Some("Rendering engine"));
        assert_eq!(record.loader, Loader::Fabric);
    }

    #[test]
    fn test_schema_version_stored_verbatim() {
        let record = parse(r#"{"schemaVersion": 1}"#).unwrap();
        assert_eq!(record.loader_version.as_deref(), Some("1"));
        let record = parse(r#"{"schemaVersion": "2.0"}"#).unwrap();
        assert_eq!(record.loader_version.as_deref(), Some("2.0"));
    }

    #[test]
    fn test_depends_object_form() {
        let record = parse(
            r#"{"id": "m", "depends": {"fabricloader": ">=0.15", "minecraft": "1.20.1", "fabric-api": "*"}}"#,
        )
        .unwrap();
        assert_eq!(record.minecraft_version.as_deref(), Some("1.20.1"));
        assert!(!record
            .required_dependencies
            .iter()
            .any(|d| d == "minecraft"));
        let mut deps = record.required_dependencies.clone();
        deps.sort();
        assert_eq!(deps, vec!["fabric-api", "fabricloader"]);
    }

    #[test]
    fn test_depends_minecraft_array_value() {
        let record =
            parse(r#"{"depends": {"minecraft": ["1.20.1", "1.20.2"]}}"#).unwrap();
        assert_eq!(record.minecraft_version.as_deref(), Some("1.20.1"));
    }

    #[test]
    fn test_depends_array_form() {
        let record = parse(
            r#"{"depends": ["fabricloader", {"id": "cloth-config"}, "minecraft", 42]}"#,
        )
        .unwrap();
        assert_eq!(
            record.required_dependencies,
            vec!["fabricloader", "cloth-config"]
        );
    }

    #[test]
    fn test_suggests_object_only() {
        let record = parse(
            r#"{"suggests": {"modmenu": "*"}, "breaks": {"optifine": "*"}}"#,
        )
        .unwrap();
        assert_eq!(record.optional_dependencies, vec!["modmenu"]);
        assert!(record.incompatibilities.contains("optifine"));
    }

    #[test]
    fn test_breaks_and_conflicts_union() {
        let record = parse(
            r#"{"breaks": {"optifine": "*"}, "conflicts": ["rubidium", "optifine"]}"#,
        )
        .unwrap();
        let ids: Vec<&str> = record.incompatibilities.iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["optifine", "rubidium"]);
    }

    #[test]
    fn test_literal_newline_in_string_survives() {
        let record = parse("{\"name\": \"Bad\nMod\"}").unwrap();
        assert_eq!(record.name.as_deref(), Some("Bad\nMod"));
    }

    #[test]
    fn test_literal_tab_and_cr_repaired() {
        let record = parse("{\"description\": \"a\tb\rc\"}").unwrap();
        assert_eq!(record.description.as_deref(), Some("a\tb\rc"));
    }

    #[test]
    fn test_invalid_escape_repaired() {
        // \q is not a JSON escape; the backslash itself gets escaped
        let record = parse(r#"{"description": "C:\quests\file"}"#).unwrap();
        assert_eq!(record.description.as_deref(), Some("C:\\quests\\file"));
    }

    #[test]
    fn test_valid_escapes_untouched() {
        let record = parse(r#"{"description": "line\nbreak \"quoted\""}"#).unwrap();
        assert_eq!(record.description.as_deref(), Some("line\nbreak \"quoted\""));
    }

    #[test]
    fn test_unrecoverable_document_yields_none() {
        assert!(parse("{not json at all").is_none());
        assert!(parse("").is_none());
    }

    #[test]
    fn test_missing_fields_are_absent_not_errors() {
        let record = parse("{}").unwrap();
        assert!(record.mod_id.is_none());
        assert!(record.required_dependencies.is_empty());
        assert!(record.incompatibilities.is_empty());
    }
}
