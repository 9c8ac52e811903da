//! JSON exports of compiled natives.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{NativeDatabase, NativeDefinition};
use crate::error::AppError;

/// Write the natives database. Compact unless `pretty` is set.
pub fn write_database_json(path: &Path, database: &NativeDatabase, pretty: bool) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create natives JSON '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    let result = if pretty {
        serde_json::to_writer_pretty(&mut writer, database)
    } else {
        serde_json::to_writer(&mut writer, database)
    };
    result.map_err(|e| AppError::new(2, format!("Failed to write natives JSON: {e}")))?;

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write natives JSON: {e}")))?;
    Ok(())
}

/// Read a natives database written by [`write_database_json`].
pub fn read_database_json(path: &Path) -> Result<NativeDatabase, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open natives JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid natives JSON: {e}")))
}

/// Pretty JSON of a single native, as printed by `natives verify`.
pub fn native_to_pretty_json(native: &NativeDefinition) -> Result<String, AppError> {
    serde_json::to_string_pretty(native).map_err(|e| AppError::new(2, format!("Failed to serialize native: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::AnnotationSet;
    use crate::domain::Frontmatter;
    use pretty_assertions::assert_eq;

    fn native(name: &str, hash: &str) -> NativeDefinition {
        NativeDefinition {
            name: Some(name.into()),
            params: Vec::new(),
            results: "void".into(),
            description: "desc".into(),
            examples: Vec::new(),
            hash: hash.into(),
            jhash: None,
            manual_hash: true,
            results_description: None,
            annotations: AnnotationSet::new(),
            meta: Frontmatter { ns: Some("CFX".into()), ..Frontmatter::default() },
        }
    }

    #[test]
    fn database_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("natives.json");
        let mut db = NativeDatabase::new();
        db.insert("CFX", native("A", "0x1"));
        db.insert("CFX", native("B", "0x2"));

        write_database_json(&path, &db, false).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\"CFX\":{\"0x1\":{"));
        assert_eq!(read_database_json(&path).unwrap(), db);
    }

    #[test]
    fn compiled_document_with_colliding_front_matter_round_trips() {
        let src = "---\nns: CFX\nhash: custom\ndescription: shadow\nextra_flag: true\n---\n## A\n```c\n// 0xABC\nvoid A(unsigned int x);\n```\n";
        let compiled = crate::compile::compile_native(src, &crate::domain::TypeVocabulary::standard()).unwrap();
        let definition = compiled.definition;
        assert_eq!(definition.hash, "0xABC");
        assert_eq!(definition.description, "");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("natives.json");
        let mut db = NativeDatabase::new();
        db.insert("CFX", definition.clone());
        write_database_json(&path, &db, true).unwrap();

        let back = read_database_json(&path).unwrap();
        assert_eq!(back, db);
        assert_eq!(back.get("CFX", "0xABC"), Some(&definition));
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let err = write_database_json(Path::new("/definitely/not/here/n.json"), &NativeDatabase::new(), true)
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
