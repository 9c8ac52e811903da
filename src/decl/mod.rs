//! Annotated C function declarations.
//!
//! A native document carries its signature as a C prototype written against
//! the type vocabulary, optionally decorated with annotations:
//!
//! ```c
//! cs_type(Any*) BOOL GET_GROUND_Z(float x, float y, float z, float* groundZ) since(1.0);
//! ```

pub mod lexer;
pub mod parser;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::annotate::{AnnotationError, AnnotationSet};

pub use parser::{parse_declaration, parse_declarations};

/// A type as written in a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// Base type name; multi-word builtins are joined by one space.
    pub name: String,
    pub is_const: bool,
    pub pointer_depth: u8,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_const: false, pointer_depth: 0 }
    }

    pub fn pointer(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_const: false, pointer_depth: 1 }
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer_depth > 0
    }

    /// `const char*`, `Vector3*`, `int`.
    pub fn spelling(&self) -> String {
        let mut out = String::new();
        if self.is_const {
            out.push_str("const ");
        }
        out.push_str(&self.name);
        for _ in 0..self.pointer_depth {
            out.push('*');
        }
        out
    }

    /// Spelling used for parameter types in native records. A by-value builtin
    /// is named by its kind (`unsigned int` → `uint`) and loses `const`;
    /// typedef'd names and pointers keep [`TypeRef::spelling`].
    pub fn param_spelling(&self) -> String {
        if !self.is_pointer() {
            if let Some(kind) = builtin_kind_name(&self.name) {
                return kind.to_string();
            }
        }
        self.spelling()
    }
}

/// Kind name of a C builtin type (`long long` → `longlong`, `unsigned char` →
/// `uchar_t`). `None` for anything that is not spelled with builtin keywords
/// only, such as handles, `Vector3` or the `<stdint.h>` typedefs.
pub fn builtin_kind_name(name: &str) -> Option<&'static str> {
    let mut base = None;
    let (mut unsigned, mut signed, mut short, mut longs) = (false, false, false, 0u8);
    for word in name.split_whitespace() {
        match word {
            "unsigned" => unsigned = true,
            "signed" => signed = true,
            "short" => short = true,
            "long" => longs += 1,
            "void" | "bool" | "char" | "int" | "float" | "double" if base.is_none() => base = Some(word),
            _ => return None,
        }
    }
    if unsigned && signed {
        return None;
    }

    let kind = match (base, unsigned, signed, short, longs) {
        (Some("void"), false, false, false, 0) => "void",
        (Some("bool"), false, false, false, 0) => "bool",
        (Some("float"), false, false, false, 0) => "float",
        (Some("double"), false, false, false, 0) => "double",
        (Some("double"), false, false, false, 1) => "longdouble",
        (Some("char"), false, false, false, 0) => "char",
        (Some("char"), false, true, false, 0) => "SChar",
        (Some("char"), true, false, false, 0) => "uchar_t",
        (None, false, false, false, 0) => return None,
        (None | Some("int"), u, _, true, 0) => if u { "ushort" } else { "short" },
        (None | Some("int"), u, _, false, 0) => if u { "uint" } else { "int" },
        (None | Some("int"), u, _, false, 1) => if u { "ulong" } else { "long" },
        (None | Some("int"), u, _, false, 2) => if u { "ulonglong" } else { "longlong" },
        _ => return None,
    };
    Some(kind)
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.spelling())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    /// Empty when the prototype leaves the parameter unnamed.
    pub name: String,
    pub ty: TypeRef,
    pub annotations: AnnotationSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: TypeRef,
    pub params: Vec<ParamDecl>,
    pub annotations: AnnotationSet,
}

impl FunctionDecl {
    pub fn param(&self, name: &str) -> Option<&ParamDecl> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn param_mut(&mut self, name: &str) -> Option<&mut ParamDecl> {
        self.params.iter_mut().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("unterminated block comment starting at offset {offset}")]
    UnterminatedComment { offset: usize },
    #[error("expected {expected}, found '{found}' at offset {offset}")]
    UnexpectedToken { expected: &'static str, found: String, offset: usize },
    #[error("expected {expected}, found end of input")]
    UnexpectedEof { expected: &'static str },
    #[error("unknown type '{name}' at offset {offset}")]
    UnknownType { name: String, offset: usize },
    #[error("{source} at offset {offset}")]
    Annotation { source: AnnotationError, offset: usize },
    #[error("C code snippet contained wrong amount of functions.")]
    FunctionCount(usize),
}
