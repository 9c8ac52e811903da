//! Type vocabulary available to native declarations.
//!
//! A declaration may only name types listed here; anything else is rejected at
//! parse time, the same way a compiler rejects an undeclared identifier.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::handles::HandleKind;
use crate::domain::vector::Vector3;

/// How a vocabulary name is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "class", content = "handle")]
pub enum TypeClass {
    /// C builtin (`int`, `float`, `char`, ...).
    Builtin,
    /// Transparent `int` alias (`DWORD`, `BOOL`, `func`, `object`).
    Alias,
    /// Nominal handle type.
    Handle(HandleKind),
    /// The fixed-layout vector record.
    Vector3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeEntry {
    pub name: &'static str,
    #[serde(flatten)]
    pub class: TypeClass,
    /// Size in bytes; `None` for `void`.
    pub size: Option<usize>,
}

const BUILTINS: &[(&str, Option<usize>)] = &[
    ("void", None),
    ("bool", Some(1)),
    ("char", Some(1)),
    ("short", Some(2)),
    ("int", Some(4)),
    ("long", Some(4)),
    ("float", Some(4)),
    ("double", Some(8)),
    ("unsigned", Some(4)),
    ("signed", Some(4)),
    ("int8_t", Some(1)),
    ("int16_t", Some(2)),
    ("int32_t", Some(4)),
    ("int64_t", Some(8)),
    ("uint8_t", Some(1)),
    ("uint16_t", Some(2)),
    ("uint32_t", Some(4)),
    ("uint64_t", Some(8)),
    ("size_t", Some(8)),
];

const ALIASES: &[&str] = &["DWORD", "BOOL", "func", "object"];

/// Words that combine with a following builtin (`unsigned int`, `long long`).
pub const BUILTIN_MODIFIERS: &[&str] = &["unsigned", "signed", "short", "long"];

/// Lookup table from C spelling to [`TypeEntry`].
#[derive(Debug, Clone)]
pub struct TypeVocabulary {
    entries: BTreeMap<&'static str, TypeEntry>,
}

impl TypeVocabulary {
    /// The vocabulary every native document is written against.
    pub fn standard() -> Self {
        let mut entries = BTreeMap::new();
        for &(name, size) in BUILTINS {
            entries.insert(name, TypeEntry { name, class: TypeClass::Builtin, size });
        }
        for &name in ALIASES {
            entries.insert(name, TypeEntry { name, class: TypeClass::Alias, size: Some(4) });
        }
        for &kind in HandleKind::ALL {
            let name = kind.name();
            entries.insert(name, TypeEntry { name, class: TypeClass::Handle(kind), size: Some(4) });
        }
        entries.insert(
            "Vector3",
            TypeEntry { name: "Vector3", class: TypeClass::Vector3, size: Some(Vector3::SIZE) },
        );
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Resolve a possibly multi-word spelling (`unsigned int`) by its last word.
    pub fn resolve(&self, spelling: &str) -> Option<&TypeEntry> {
        spelling.split_whitespace().last().and_then(|word| self.get(word))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TypeVocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_vocabulary_classifies_names() {
        let vocab = TypeVocabulary::standard();
        assert_eq!(vocab.get("Ped").unwrap().class, TypeClass::Handle(HandleKind::Ped));
        assert_eq!(vocab.get("BOOL").unwrap().class, TypeClass::Alias);
        assert_eq!(vocab.get("float").unwrap().class, TypeClass::Builtin);
        assert_eq!(vocab.get("Vector3").unwrap().size, Some(24));
        assert_eq!(vocab.get("void").unwrap().size, None);
        assert!(vocab.get("Foo").is_none());
    }

    #[test]
    fn multi_word_builtins_resolve_by_last_word() {
        let vocab = TypeVocabulary::standard();
        assert_eq!(vocab.resolve("unsigned int").unwrap().name, "int");
        assert_eq!(vocab.resolve("long long").unwrap().name, "long");
        assert!(vocab.resolve("").is_none());
    }

    #[test]
    fn every_handle_is_in_the_vocabulary() {
        let vocab = TypeVocabulary::standard();
        for kind in HandleKind::ALL {
            assert!(vocab.contains(kind.name()), "{kind} missing");
        }
        assert_eq!(vocab.len(), BUILTINS.len() + ALIASES.len() + HandleKind::ALL.len() + 1);
    }
}
