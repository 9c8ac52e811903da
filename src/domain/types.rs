//! Compiled native records.
//!
//! These are the serialized shape of the natives database: one
//! [`NativeDefinition`] per document, grouped by namespace then hash. Field
//! names follow the established JSON format (`manualHash`,
//! `resultsDescription`), so existing consumers keep working.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::annotate::AnnotationSet;

/// YAML front matter of a native document.
///
/// Keys other than the known ones are carried through to the output unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apiset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Frontmatter {
    /// Top-level keys owned by [`NativeDefinition`]; front matter may not set them.
    pub const RESERVED_KEYS: &'static [&'static str] = &[
        "name",
        "params",
        "results",
        "description",
        "examples",
        "hash",
        "jhash",
        "manualHash",
        "resultsDescription",
        "annotations",
    ];

    /// Drop extra keys that would collide with record fields once flattened.
    /// Returns the dropped key names.
    pub fn strip_reserved(&mut self) -> Vec<String> {
        let mut dropped = Vec::new();
        self.extra.retain(|key, _| {
            let reserved = Self::RESERVED_KEYS.contains(&key.as_str());
            if reserved {
                dropped.push(key.clone());
            }
            !reserved
        });
        dropped
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "AnnotationSet::is_empty")]
    pub annotations: AnnotationSet,
}

/// A fenced code block from the Examples section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeExample {
    pub lang: Option<String>,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeDefinition {
    /// Absent for natives only known by hash (`_0x...` names).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub params: Vec<NativeParam>,
    /// Return type spelling.
    pub results: String,
    pub description: String,
    pub examples: Vec<NativeExample>,
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jhash: Option<String>,
    #[serde(rename = "manualHash", default, skip_serializing_if = "is_false")]
    pub manual_hash: bool,
    #[serde(rename = "resultsDescription", default, skip_serializing_if = "Option::is_none")]
    pub results_description: Option<String>,
    #[serde(default, skip_serializing_if = "AnnotationSet::is_empty")]
    pub annotations: AnnotationSet,
    #[serde(flatten)]
    pub meta: Frontmatter,
}

impl NativeDefinition {
    /// Name for display: the declared name, or the hash for unnamed natives.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.hash)
    }

    pub fn param(&self, name: &str) -> Option<&NativeParam> {
        self.params.iter().find(|p| p.name == name)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Natives grouped by namespace, then by hash string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeDatabase {
    namespaces: BTreeMap<String, BTreeMap<String, NativeDefinition>>,
}

impl NativeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a native; returns the definition it replaced, if the hash was taken.
    pub fn insert(&mut self, ns: impl Into<String>, native: NativeDefinition) -> Option<NativeDefinition> {
        self.namespaces
            .entry(ns.into())
            .or_default()
            .insert(native.hash.clone(), native)
    }

    pub fn get(&self, ns: &str, hash: &str) -> Option<&NativeDefinition> {
        self.namespaces.get(ns).and_then(|m| m.get(hash))
    }

    pub fn namespaces(&self) -> impl Iterator<Item = (&str, usize)> {
        self.namespaces.iter().map(|(ns, m)| (ns.as_str(), m.len()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NativeDefinition)> {
        self.namespaces
            .iter()
            .flat_map(|(ns, m)| m.values().map(move |n| (ns.as_str(), n)))
    }

    pub fn len(&self) -> usize {
        self.namespaces.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn native(name: Option<&str>, hash: &str) -> NativeDefinition {
        NativeDefinition {
            name: name.map(str::to_string),
            params: Vec::new(),
            results: "void".into(),
            description: String::new(),
            examples: Vec::new(),
            hash: hash.into(),
            jhash: None,
            manual_hash: false,
            results_description: None,
            annotations: AnnotationSet::new(),
            meta: Frontmatter::default(),
        }
    }

    #[test]
    fn optional_fields_are_omitted() {
        let json = serde_json::to_value(native(Some("WAIT"), "0x4EDE34FBADD967A6")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "WAIT",
                "params": [],
                "results": "void",
                "description": "",
                "examples": [],
                "hash": "0x4EDE34FBADD967A6",
            })
        );
    }

    #[test]
    fn front_matter_is_flattened() {
        let mut n = native(None, "0x1");
        n.manual_hash = true;
        n.meta.ns = Some("CFX".into());
        n.meta.extra.insert("deprecated".into(), serde_json::Value::Bool(true));
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["ns"], "CFX");
        assert_eq!(json["deprecated"], true);
        assert_eq!(json["manualHash"], true);
        assert!(json.get("name").is_none());
        assert_eq!(n.label(), "0x1");

        let back: NativeDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(back, n);
    }

    #[test]
    fn reserved_front_matter_keys_are_stripped() {
        let mut meta: Frontmatter =
            serde_yaml::from_str("ns: CFX\nhash: custom\nname: Other\nmanualHash: true\ndeprecated: true\n").unwrap();
        let dropped = meta.strip_reserved();
        assert_eq!(dropped, vec!["hash".to_string(), "manualHash".to_string(), "name".to_string()]);
        assert_eq!(meta.extra.keys().collect::<Vec<_>>(), vec!["deprecated"]);
        assert_eq!(meta.ns.as_deref(), Some("CFX"));
    }

    #[test]
    fn database_groups_by_namespace() {
        let mut db = NativeDatabase::new();
        assert!(db.insert("PLAYER", native(Some("A"), "0x1")).is_none());
        assert!(db.insert("PLAYER", native(Some("B"), "0x2")).is_none());
        assert!(db.insert("CFX", native(Some("C"), "0x3")).is_none());
        assert!(db.insert("CFX", native(Some("D"), "0x3")).is_some());

        assert_eq!(db.len(), 3);
        let namespaces: Vec<_> = db.namespaces().collect();
        assert_eq!(namespaces, vec![("CFX", 1), ("PLAYER", 2)]);
        assert_eq!(db.get("CFX", "0x3").and_then(|n| n.name.as_deref()), Some("D"));
    }
}
