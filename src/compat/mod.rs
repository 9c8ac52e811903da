//! Native compatibility signatures.
//!
//! The script runtime marshals every argument through a 64-bit slot, so two
//! declarations are call-compatible when their *wrapper* types agree: almost
//! everything collapses to `ulong` (by value) or `ulong*` (by pointer), with a
//! few types that the runtime treats specially. The compatibility table keeps,
//! per native hash, every distinct wrapper signature a native has ever had.

pub mod lua;
pub mod version;

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::decl::{FunctionDecl, TypeRef};
use crate::domain::Vector3;

pub const VALUE_TYPE: &str = "ulong";
pub const REF_TYPE: &str = "ulong*";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompatError {
    #[error(
        "Unexpected Lua format, expecting a Lua array with strings, on line {line}, got `{text}`"
    )]
    BadSignature { line: usize, text: String },
    #[error(
        "Unexpected Lua format, found a new signature but we aren't in any method group, on line {line}, got `{text}`"
    )]
    OrphanSignature { line: usize, text: String },
    #[error("Unexpected Lua format, expecting a hex value on line {line}, got `{text}`")]
    BadHash { line: usize, text: String },
    #[error("Invalid version '{0}', must be either 2 or 4 integers")]
    BadVersion(String),
    #[error("Version '{0}' contains at least 1 number that isn't < 65535")]
    VersionOutOfRange(String),
    #[error("Native hash '{0}' is not a hexadecimal value")]
    BadNativeHash(String),
}

/// Wrapper type for one declared type.
pub fn wrap_type(base: &str, is_pointer: bool) -> &'static str {
    match (base, is_pointer) {
        ("void", false) => "void",
        ("object", false) => "object",
        ("Vector3", false) => "Vector3",
        ("char", true) => "string",
        ("Vector3", true) => "Vector3*",
        (_, false) => VALUE_TYPE,
        (_, true) => REF_TYPE,
    }
}

fn wrap(ty: &TypeRef) -> &'static str {
    let base = ty.name.rsplit(' ').next().unwrap_or_default();
    wrap_type(base, ty.is_pointer())
}

/// Return wrapper type followed by parameter wrapper types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<String>);

impl Signature {
    pub fn new(types: Vec<String>) -> Self {
        Self(types)
    }

    /// Signature of a declaration. A by-value `Vector3` parameter occupies
    /// three argument slots and is listed as three `ulong`s.
    pub fn of(decl: &FunctionDecl) -> Self {
        let mut types = vec![wrap(&decl.return_type).to_string()];
        for param in &decl.params {
            match wrap(&param.ty) {
                "Vector3" => types.extend(std::iter::repeat_n(VALUE_TYPE.to_string(), Vector3::SLOTS)),
                other => types.push(other.to_string()),
            }
        }
        Self(types)
    }

    pub fn types(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.0.iter().map(|t| format!("\"{t}\"")).collect();
        write!(f, "{{ {} }}", quoted.join(", "))
    }
}

/// Signatures per native hash, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompatTable {
    natives: Vec<(u64, Vec<Signature>)>,
    index: HashMap<u64, usize>,
}

impl CompatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh (empty) group for `hash`, replacing any previous one.
    pub fn reset(&mut self, hash: u64) {
        match self.index.get(&hash) {
            Some(&idx) => self.natives[idx].1.clear(),
            None => {
                self.index.insert(hash, self.natives.len());
                self.natives.push((hash, Vec::new()));
            }
        }
    }

    /// Add a signature unless the hash already has an identical one.
    pub fn insert(&mut self, hash: u64, signature: Signature) -> bool {
        let idx = match self.index.get(&hash) {
            Some(&idx) => idx,
            None => {
                self.index.insert(hash, self.natives.len());
                self.natives.push((hash, Vec::new()));
                self.natives.len() - 1
            }
        };
        let signatures = &mut self.natives[idx].1;
        if signatures.contains(&signature) {
            return false;
        }
        signatures.push(signature);
        true
    }

    pub fn get(&self, hash: u64) -> Option<&[Signature]> {
        self.index.get(&hash).map(|&idx| self.natives[idx].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &[Signature])> {
        self.natives.iter().map(|(h, s)| (*h, s.as_slice()))
    }

    /// Number of natives.
    pub fn len(&self) -> usize {
        self.natives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.natives.is_empty()
    }

    pub fn signature_count(&self) -> usize {
        self.natives.iter().map(|(_, s)| s.len()).sum()
    }
}

/// Parse a `0x`-prefixed native hash.
pub fn parse_native_hash(text: &str) -> Result<u64, CompatError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16).map_err(|_| CompatError::BadNativeHash(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::parse_declaration;
    use crate::domain::TypeVocabulary;
    use pretty_assertions::assert_eq;

    fn sig(src: &str) -> Vec<String> {
        let decl = parse_declaration(src, &TypeVocabulary::standard()).unwrap();
        Signature::of(&decl).types().to_vec()
    }

    #[test]
    fn wrapper_overrides() {
        assert_eq!(wrap_type("void", false), "void");
        assert_eq!(wrap_type("Ped", false), "ulong");
        assert_eq!(wrap_type("float", true), "ulong*");
        assert_eq!(wrap_type("char", true), "string");
        assert_eq!(wrap_type("char", false), "ulong");
        assert_eq!(wrap_type("Vector3", true), "Vector3*");
    }

    #[test]
    fn vector_by_value_takes_three_slots() {
        assert_eq!(
            sig("Vector3 GET_COORDS(Entity e, Vector3 offset, BOOL alive);"),
            vec!["Vector3", "ulong", "ulong", "ulong", "ulong", "ulong"]
        );
    }

    #[test]
    fn const_and_cs_type_do_not_matter() {
        assert_eq!(
            sig("cs_type(Any*) void F(const char* name, cs_type(Vehicle) Any* out);"),
            vec!["void", "string", "ulong*"]
        );
    }

    #[test]
    fn table_ignores_duplicate_signatures() {
        let mut table = CompatTable::new();
        let a = Signature::new(vec!["void".into(), "ulong".into()]);
        let b = Signature::new(vec!["void".into()]);
        assert!(table.insert(0x10, a.clone()));
        assert!(!table.insert(0x10, a.clone()));
        assert!(table.insert(0x10, b));
        assert!(table.insert(0x02, a));
        assert_eq!(table.len(), 2);
        assert_eq!(table.signature_count(), 3);
        let order: Vec<u64> = table.iter().map(|(h, _)| h).collect();
        assert_eq!(order, vec![0x10, 0x02]);
    }

    #[test]
    fn native_hash_parsing() {
        assert_eq!(parse_native_hash("0x43A66C31C68491C0").unwrap(), 0x43A66C31C68491C0);
        assert_eq!(parse_native_hash("0Xff").unwrap(), 0xff);
        assert!(parse_native_hash("0xZZ").is_err());
    }
}
