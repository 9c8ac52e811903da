//! Native document compiler.
//!
//! Turns one Markdown native document into a [`NativeDefinition`]:
//!
//! - front matter → namespace, api set, aliases and any extra keys
//! - the ```` ```c ```` block → name, return type, parameters, annotations
//! - `// 0x<hash> [0x<jhash>]` in that block → manual hash, otherwise the name hash
//! - Parameters / Return value / Examples sections → descriptions and examples

pub mod hash;
pub mod markdown;

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::annotate::AnnotationTable;
use crate::decl::{self, DeclError, FunctionDecl};
use crate::domain::{Frontmatter, NativeDefinition, NativeExample, NativeParam, TypeVocabulary};

use markdown::{Block, Document};

static HASH_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)//\s+0x([0-9A-F]{1,16})(?:\s+0x([0-9A-F]{1,8}))?").expect("valid regex")
});

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Invalid front matter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
    #[error("No C code definition.")]
    NoCode,
    #[error("C code snippet contained wrong amount of functions.")]
    FunctionCount(usize),
    #[error("Invalid C code definition: {0}")]
    Declaration(DeclError),
    #[error("No parameter list in \"Parameters\" heading.")]
    NoParameterList,
    #[error("A parameter can only have one paragraph.")]
    ParameterParagraphs,
    #[error("A parameter must have a name.")]
    UnnamedParameter,
    #[error("A parameter definition was found for a parameter that does not exist. Parameter name: {0}")]
    UnknownParameter(String),
    #[error("No native hash was specified.")]
    NoHash,
}

impl From<DeclError> for CompileError {
    fn from(err: DeclError) -> Self {
        match err {
            DeclError::FunctionCount(found) => CompileError::FunctionCount(found),
            other => CompileError::Declaration(other),
        }
    }
}

/// A compiled document: the output record plus the declaration it came from.
#[derive(Debug, Clone)]
pub struct CompiledNative {
    pub definition: NativeDefinition,
    pub declaration: FunctionDecl,
}

impl CompiledNative {
    pub fn annotations(&self) -> AnnotationTable {
        AnnotationTable::from_declaration(&self.declaration)
    }
}

/// Compile one native document.
pub fn compile_native(source: &str, vocab: &TypeVocabulary) -> Result<CompiledNative, CompileError> {
    let doc = Document::parse(source);

    let mut meta = match doc.frontmatter.as_deref() {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str::<Frontmatter>(yaml)?,
        _ => Frontmatter::default(),
    };
    for key in meta.strip_reserved() {
        tracing::warn!(key = %key, "ignoring front matter key that shadows a native field");
    }

    // The last `c` block wins if a document has several.
    let code = doc
        .code_blocks()
        .filter(|(lang, _)| *lang == Some("c"))
        .map(|(_, code)| code)
        .last()
        .ok_or(CompileError::NoCode)?;

    let declaration = decl::parse_declaration(code, vocab)?;

    let mut definition = NativeDefinition {
        name: Some(declaration.name.clone()),
        params: declaration
            .params
            .iter()
            .map(|p| NativeParam {
                name: p.name.clone(),
                ty: p.ty.param_spelling(),
                description: None,
                annotations: p.annotations.clone(),
            })
            .collect(),
        results: declaration.return_type.spelling(),
        description: String::new(),
        examples: Vec::new(),
        hash: hash::format_hash(u64::from(hash::native_name_hash(&declaration.name))),
        jhash: None,
        manual_hash: false,
        results_description: None,
        annotations: declaration.annotations.clone(),
        meta,
    };

    if let Some(caps) = HASH_COMMENT.captures(code) {
        definition.hash = format!("0x{}", &caps[1]);
        definition.jhash = caps.get(2).map(|m| format!("0x{}", m.as_str()));
        definition.manual_hash = true;
    }

    if let Some(section) = doc.section("parameters") {
        apply_parameter_docs(&mut definition, section)?;
    }

    if let Some(section) = doc.section("return value") {
        let text = markdown::render_blocks(section);
        definition.results_description = Some(text).filter(|t| !t.is_empty());
    }

    if let Some(section) = doc.section(&declaration.name) {
        definition.description = markdown::render_blocks(
            section
                .iter()
                .filter(|b| !matches!(b, Block::Code { lang: Some(lang), .. } if lang == "c")),
        );
    }

    if let Some(section) = doc.section("examples") {
        definition.examples = markdown::code_blocks(section)
            .map(|(lang, code)| NativeExample { lang: lang.map(str::to_string), code: code.to_string() })
            .collect();
    }

    if declaration.name.starts_with("_0x") {
        definition.name = None;
    }

    Ok(CompiledNative { definition, declaration })
}

fn apply_parameter_docs(definition: &mut NativeDefinition, section: &[Block]) -> Result<(), CompileError> {
    let items = section
        .iter()
        .find_map(|b| match b {
            Block::List(items) => Some(items),
            _ => None,
        })
        .ok_or(CompileError::NoParameterList)?;

    for item in items {
        let [para] = item.paragraphs.as_slice() else {
            return Err(CompileError::ParameterParagraphs);
        };
        let (name, rest) = markdown::split_strong(para).ok_or(CompileError::UnnamedParameter)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CompileError::UnnamedParameter);
        }

        let description = rest.strip_prefix(": ").unwrap_or(rest).trim();
        let param = definition
            .params
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| CompileError::UnknownParameter(name.to_string()))?;
        if !description.is_empty() {
            param.description = Some(description.to_string());
        }
    }

    Ok(())
}
