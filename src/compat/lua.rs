//! Read and write the Lua compatibility file.
//!
//! The reader is deliberately line-based and only understands the layout the
//! writer produces; the file header says as much to anyone editing it by hand.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::compat::version::{CompatVersion, parse_version_line};
use crate::compat::{CompatError, CompatTable, Signature};

static LINE_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*([\[{}]|\w+)").expect("valid regex"));
static TYPE_STRING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[,{]\s*"([^"]*)""#).expect("valid regex"));
static HEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"0[xX][0-9a-fA-F]+").expect("valid regex"));

const HEADER: &str = "-- Auto-generated file --\n\
-- Follow the below syntax explicitly if manually editing, as we use a simplified Lua parser that expects this syntax.\n\n";

/// Contents of a previously generated compatibility file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompatFile {
    pub table: CompatTable,
    pub version: CompatVersion,
    /// Signature lines read.
    pub signatures: usize,
}

pub fn parse_compat_lua(text: &str) -> Result<CompatFile, CompatError> {
    let mut file = CompatFile::default();
    let mut current: Option<u64> = None;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let Some(caps) = LINE_START.captures(line) else {
            continue;
        };

        match &caps[1] {
            "{" => {
                let Some(hash) = current else {
                    return Err(CompatError::OrphanSignature { line: line_no, text: line.to_string() });
                };
                let types: Vec<String> = TYPE_STRING.captures_iter(line).map(|c| c[1].to_string()).collect();
                if types.is_empty() {
                    return Err(CompatError::BadSignature { line: line_no, text: line.to_string() });
                }
                file.table.insert(hash, Signature::new(types));
                file.signatures += 1;
            }
            "[" => {
                let m = HEX
                    .find(line)
                    .ok_or_else(|| CompatError::BadHash { line: line_no, text: line.to_string() })?;
                let digits = &m.as_str()[2..];
                let hash = u64::from_str_radix(digits, 16)
                    .map_err(|_| CompatError::BadHash { line: line_no, text: line.to_string() })?;
                file.table.reset(hash);
                current = Some(hash);
            }
            "}" => current = None,
            "version" => file.version = parse_version_line(line),
            _ => {}
        }
    }

    Ok(file)
}

pub fn render_compat_lua(table: &CompatTable, version: CompatVersion) -> String {
    let mut out = String::from(HEADER);
    let _ = writeln!(out, "version = {{ {version} }}");
    out.push_str("compatibility = {\n");
    for (hash, signatures) in table.iter() {
        let _ = writeln!(out, "[0x{hash:x}] = {{");
        for signature in signatures {
            let _ = writeln!(out, "\t{signature},");
        }
        out.push_str("},\n");
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_table() -> CompatTable {
        let mut table = CompatTable::new();
        table.insert(0x43A66C31C68491C0, Signature::new(vec!["ulong".into(), "ulong".into()]));
        table.insert(0x43A66C31C68491C0, Signature::new(vec!["void".into(), "Vector3*".into()]));
        table.insert(0x1, Signature::new(vec!["string".into()]));
        table
    }

    #[test]
    fn rendered_layout() {
        let text = render_compat_lua(&sample_table(), CompatVersion([2, 0, 12, 0]));
        let expected = format!(
            "{HEADER}version = {{ 2, 0, 12, 0 }}\ncompatibility = {{\n\
[0x43a66c31c68491c0] = {{\n\t{{ \"ulong\", \"ulong\" }},\n\t{{ \"void\", \"Vector3*\" }},\n}},\n\
[0x1] = {{\n\t{{ \"string\" }},\n}},\n}}\n"
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn write_then_read_recovers_table() {
        let table = sample_table();
        let text = render_compat_lua(&table, CompatVersion([2, 0, 7, 3]));
        let file = parse_compat_lua(&text).unwrap();
        assert_eq!(file.table, table);
        assert_eq!(file.version, CompatVersion([2, 0, 7, 3]));
        assert_eq!(file.signatures, 3);
    }

    #[test]
    fn signature_outside_group_fails() {
        let err = parse_compat_lua("compatibility = {\n}\n\t{ \"void\" },\n").unwrap_err();
        assert_eq!(err, CompatError::OrphanSignature { line: 3, text: "\t{ \"void\" },".into() });
    }

    #[test]
    fn bad_hash_and_bad_signature_fail() {
        assert!(matches!(
            parse_compat_lua("[nothex] = {\n").unwrap_err(),
            CompatError::BadHash { line: 1, .. }
        ));
        assert!(matches!(
            parse_compat_lua("[0x1] = {\n\t{ void },\n").unwrap_err(),
            CompatError::BadSignature { line: 2, .. }
        ));
    }
}
