//! Declaration-time annotations.
//!
//! Declarations can carry `since(ver)`, `until(ver)`, `cs_type(T)`, `cs_split`
//! and `cs_omit`. They are stored here as plain data, keyed by the symbol they
//! were attached to, for binding generators to query. Nothing in this crate
//! changes behaviour because of an annotation.
//!
//! Payloads are opaque: `since(1.0)` stores `"1.0"` and nothing checks that it
//! looks like a version.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decl::FunctionDecl;

/// One annotation with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Annotation {
    /// First version the symbol exists in.
    Since(String),
    /// Last version the symbol exists in.
    Until(String),
    /// Type name generated code should use instead of the declared one.
    CsType(String),
    /// Split the generated symbol into several declarations.
    CsSplit,
    /// Do not generate the symbol.
    CsOmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnnotationKind {
    Since,
    Until,
    CsType,
    CsSplit,
    CsOmit,
}

impl AnnotationKind {
    pub const ALL: [AnnotationKind; 5] = [
        AnnotationKind::Since,
        AnnotationKind::Until,
        AnnotationKind::CsType,
        AnnotationKind::CsSplit,
        AnnotationKind::CsOmit,
    ];

    /// Keyword as written in declarations.
    pub fn keyword(self) -> &'static str {
        match self {
            AnnotationKind::Since => "since",
            AnnotationKind::Until => "until",
            AnnotationKind::CsType => "cs_type",
            AnnotationKind::CsSplit => "cs_split",
            AnnotationKind::CsOmit => "cs_omit",
        }
    }

    pub fn from_keyword(word: &str) -> Option<AnnotationKind> {
        AnnotationKind::ALL.into_iter().find(|k| k.keyword() == word)
    }

    /// Whether the keyword is followed by a parenthesised payload.
    pub fn takes_payload(self) -> bool {
        matches!(self, AnnotationKind::Since | AnnotationKind::Until | AnnotationKind::CsType)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("unknown annotation '{0}'")]
    UnknownKind(String),
    #[error("annotation '{0}' requires a payload")]
    MissingPayload(&'static str),
    #[error("annotation '{0}' does not take a payload")]
    UnexpectedPayload(&'static str),
}

impl Annotation {
    /// Build from a keyword and its raw payload text.
    pub fn new(kind: AnnotationKind, payload: Option<&str>) -> Result<Self, AnnotationError> {
        let payload = payload.map(normalize_payload).filter(|p| !p.is_empty());
        match (kind, payload) {
            (AnnotationKind::Since, Some(p)) => Ok(Annotation::Since(p)),
            (AnnotationKind::Until, Some(p)) => Ok(Annotation::Until(p)),
            (AnnotationKind::CsType, Some(p)) => Ok(Annotation::CsType(p)),
            (AnnotationKind::CsSplit, None) => Ok(Annotation::CsSplit),
            (AnnotationKind::CsOmit, None) => Ok(Annotation::CsOmit),
            (k, None) => Err(AnnotationError::MissingPayload(k.keyword())),
            (k, Some(_)) => Err(AnnotationError::UnexpectedPayload(k.keyword())),
        }
    }

    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Since(_) => AnnotationKind::Since,
            Annotation::Until(_) => AnnotationKind::Until,
            Annotation::CsType(_) => AnnotationKind::CsType,
            Annotation::CsSplit => AnnotationKind::CsSplit,
            Annotation::CsOmit => AnnotationKind::CsOmit,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            Annotation::Since(p) | Annotation::Until(p) | Annotation::CsType(p) => Some(p),
            Annotation::CsSplit | Annotation::CsOmit => None,
        }
    }

    /// Clang `annotate` attribute string: `since:1.0`, `cs_omit`.
    pub fn attribute(&self) -> String {
        match self.payload() {
            Some(p) => format!("{}:{p}", self.kind().keyword()),
            None => self.kind().keyword().to_string(),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload() {
            Some(p) => write!(f, "{}({p})", self.kind().keyword()),
            None => f.write_str(self.kind().keyword()),
        }
    }
}

impl FromStr for Annotation {
    type Err = AnnotationError;

    /// Parse an attribute string as produced by [`Annotation::attribute`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (keyword, payload) = match s.split_once(':') {
            Some((k, p)) => (k, Some(p)),
            None => (s, None),
        };
        let kind = AnnotationKind::from_keyword(keyword.trim())
            .ok_or_else(|| AnnotationError::UnknownKind(keyword.trim().to_string()))?;
        Annotation::new(kind, payload)
    }
}

fn normalize_payload(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The annotations of one symbol, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationSet(Vec<Annotation>);

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an annotation. Exact duplicates are ignored; returns whether it was added.
    pub fn insert(&mut self, annotation: Annotation) -> bool {
        if self.0.contains(&annotation) {
            return false;
        }
        self.0.push(annotation);
        true
    }

    pub fn extend(&mut self, other: &AnnotationSet) {
        for a in other.iter() {
            self.insert(a.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, kind: AnnotationKind) -> bool {
        self.0.iter().any(|a| a.kind() == kind)
    }

    fn first_payload(&self, kind: AnnotationKind) -> Option<&str> {
        self.0.iter().find(|a| a.kind() == kind).and_then(Annotation::payload)
    }

    pub fn since(&self) -> Option<&str> {
        self.first_payload(AnnotationKind::Since)
    }

    pub fn until(&self) -> Option<&str> {
        self.first_payload(AnnotationKind::Until)
    }

    /// `cs_type` override, if any.
    pub fn display_type(&self) -> Option<&str> {
        self.first_payload(AnnotationKind::CsType)
    }

    pub fn is_split(&self) -> bool {
        self.has(AnnotationKind::CsSplit)
    }

    pub fn is_omitted(&self) -> bool {
        self.has(AnnotationKind::CsOmit)
    }
}

impl FromIterator<Annotation> for AnnotationSet {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        let mut set = AnnotationSet::new();
        for a in iter {
            set.insert(a);
        }
        set
    }
}

/// A declared symbol: a native, or one parameter of a native.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolPath {
    pub function: String,
    pub param: Option<String>,
}

impl SymbolPath {
    pub fn function(name: impl Into<String>) -> Self {
        Self { function: name.into(), param: None }
    }

    pub fn param(function: impl Into<String>, param: impl Into<String>) -> Self {
        Self { function: function.into(), param: Some(param.into()) }
    }
}

impl fmt::Display for SymbolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(p) => write!(f, "{}.{p}", self.function),
            None => f.write_str(&self.function),
        }
    }
}

static EMPTY: AnnotationSet = AnnotationSet(Vec::new());

/// Queryable mapping from symbol to its annotations.
///
/// Symbols without annotations have no entry, so a lookup of an unknown symbol
/// and of a symbol whose set was cleared give the same empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationTable {
    entries: BTreeMap<SymbolPath, AnnotationSet>,
}

impl AnnotationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the function-level and parameter-level annotations of a declaration.
    pub fn from_declaration(decl: &FunctionDecl) -> Self {
        let mut table = AnnotationTable::new();
        table.merge_declaration(decl);
        table
    }

    pub fn merge_declaration(&mut self, decl: &FunctionDecl) {
        for a in decl.annotations.iter() {
            self.annotate(SymbolPath::function(&decl.name), a.clone());
        }
        for param in &decl.params {
            for a in param.annotations.iter() {
                self.annotate(SymbolPath::param(&decl.name, &param.name), a.clone());
            }
        }
    }

    pub fn annotate(&mut self, symbol: SymbolPath, annotation: Annotation) -> bool {
        self.entries.entry(symbol).or_default().insert(annotation)
    }

    /// Replace the set for `symbol`; an empty set removes the entry.
    pub fn set(&mut self, symbol: SymbolPath, set: AnnotationSet) {
        if set.is_empty() {
            self.entries.remove(&symbol);
        } else {
            self.entries.insert(symbol, set);
        }
    }

    pub fn get(&self, symbol: &SymbolPath) -> &AnnotationSet {
        self.entries.get(symbol).unwrap_or(&EMPTY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SymbolPath, &AnnotationSet)> {
        self.entries.iter()
    }

    /// Number of annotated symbols.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Symbols carrying an annotation of `kind`.
    pub fn symbols_with(&self, kind: AnnotationKind) -> impl Iterator<Item = &SymbolPath> {
        self.entries
            .iter()
            .filter(move |(_, set)| set.has(kind))
            .map(|(symbol, _)| symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn since_and_omit_coexist() {
        let mut table = AnnotationTable::new();
        let sym = SymbolPath::function("SET_PED_ARMOUR");
        table.annotate(sym.clone(), Annotation::Since("1.0".into()));
        table.annotate(sym.clone(), Annotation::CsOmit);

        let set = table.get(&sym);
        assert_eq!(set.len(), 2);
        assert_eq!(set.since(), Some("1.0"));
        assert!(set.is_omitted());
        assert!(!set.is_split());
        assert_eq!(set.until(), None);
    }

    #[test]
    fn unknown_symbol_equals_explicit_empty() {
        let mut explicit = AnnotationTable::new();
        let sym = SymbolPath::param("GET_PLAYER_PED", "playerId");
        explicit.annotate(sym.clone(), Annotation::CsSplit);
        explicit.set(sym.clone(), AnnotationSet::new());

        let untouched = AnnotationTable::new();
        assert_eq!(explicit.get(&sym), untouched.get(&sym));
        assert_eq!(explicit, untouched);
        assert!(explicit.is_empty());
    }

    #[test]
    fn duplicates_are_ignored_but_same_kind_is_kept() {
        let mut set = AnnotationSet::new();
        assert!(set.insert(Annotation::Since("1.0".into())));
        assert!(!set.insert(Annotation::Since("1.0".into())));
        assert!(set.insert(Annotation::Since("2.0".into())));
        assert_eq!(set.len(), 2);
        assert_eq!(set.since(), Some("1.0"));
    }

    #[test]
    fn attribute_strings_parse_back() {
        for text in ["since:1.0", "until:2189", "cs_type:Any*", "cs_split", "cs_omit"] {
            let a: Annotation = text.parse().unwrap();
            assert_eq!(a.attribute(), text);
        }
        assert_eq!(
            "cs_type".parse::<Annotation>(),
            Err(AnnotationError::MissingPayload("cs_type"))
        );
        assert_eq!(
            "cs_omit:yes".parse::<Annotation>(),
            Err(AnnotationError::UnexpectedPayload("cs_omit"))
        );
        assert!(matches!("deprecated".parse::<Annotation>(), Err(AnnotationError::UnknownKind(_))));
    }

    #[test]
    fn payload_whitespace_is_collapsed() {
        let a = Annotation::new(AnnotationKind::CsType, Some("  unsigned   int ")).unwrap();
        assert_eq!(a, Annotation::CsType("unsigned int".into()));
        assert_eq!(a.to_string(), "cs_type(unsigned int)");
    }

    #[test]
    fn serializes_as_kind_and_value() {
        let set: AnnotationSet = [Annotation::Since("1.0".into()), Annotation::CsOmit].into_iter().collect();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "kind": "since", "value": "1.0" }, { "kind": "cs_omit" }])
        );
    }

    #[test]
    fn symbols_with_filters_by_kind() {
        let mut table = AnnotationTable::new();
        table.annotate(SymbolPath::function("A"), Annotation::CsOmit);
        table.annotate(SymbolPath::param("B", "p0"), Annotation::CsSplit);
        table.annotate(SymbolPath::function("C"), Annotation::CsOmit);
        let omitted: Vec<String> = table.symbols_with(AnnotationKind::CsOmit).map(|s| s.to_string()).collect();
        assert_eq!(omitted, vec!["A".to_string(), "C".to_string()]);
    }
}
