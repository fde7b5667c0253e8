use std::path::Path;

use super::types::LayoutData;
use crate::error::AppError;

pub fn read_layout(path: &Path) -> Result<LayoutData, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::LayoutError(format!("Failed to read {}: {}", path.display(), e)))?;
    let data: LayoutData = toml::from_str(&content)
        .map_err(|e| AppError::LayoutError(format!("Failed to parse {}: {}", path.display(), e)))?;

    Ok(data)
}

/// Read the layout at `path`; a missing or broken file yields an empty layout.
pub fn read_layout_or_default(path: &Path) -> LayoutData {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no layout file, using automatic placement");
        return LayoutData::default();
    }
    match read_layout(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring layout file");
            LayoutData::default()
        }
    }
}

pub fn write_layout(path: &Path, data: &LayoutData) -> Result<(), AppError> {
    let content = toml::to_string_pretty(data)
        .map_err(|e| AppError::LayoutError(format!("Failed to serialize layout data: {}", e)))?;
    std::fs::write(path, content)
        .map_err(|e| AppError::LayoutError(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{LayoutMeta, RelationEntry, TableCoords};
    use tempfile::NamedTempFile;

    #[test]
    fn test_layout_file_roundtrip() {
        let mut data = LayoutData {
            meta: LayoutMeta {
                version: 1,
                source: "shop.dbml".into(),
            },
            ..LayoutData::default()
        };
        data.tables
            .insert("public.users".into(), TableCoords { x: 100.0, y: 200.0 });
        data.relations.push(RelationEntry {
            table: "posts".into(),
            field: "author".into(),
            foreign_table: "users".into(),
            foreign_field: "name".into(),
        });

        let tmp = NamedTempFile::new().unwrap();
        write_layout(tmp.path(), &data).unwrap();
        let read = read_layout(tmp.path()).unwrap();

        assert_eq!(read.meta.source, "shop.dbml");
        let users = read.tables.get("public.users").unwrap();
        assert!((users.x - 100.0).abs() < f64::EPSILON);
        assert!((users.y - 200.0).abs() < f64::EPSILON);
        assert_eq!(read.relations, data.relations);
    }

    #[test]
    fn test_layout_without_meta() {
        let tmp = NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[tables.\"public.users\"]\nx = 1.0\ny = 2.0\n").unwrap();
        let read = read_layout(tmp.path()).unwrap();
        assert_eq!(read.meta.version, 1);
        assert_eq!(read.tables.len(), 1);
        assert!(read.relations.is_empty());
    }

    #[test]
    fn test_invalid_layout_is_error() {
        let tmp = NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "tables = 3").unwrap();
        assert!(matches!(read_layout(tmp.path()), Err(AppError::LayoutError(_))));
        assert!(read_layout_or_default(tmp.path()).tables.is_empty());
    }

    #[test]
    fn test_missing_layout_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let data = read_layout_or_default(&dir.path().join("layout.toml"));
        assert!(data.tables.is_empty());
        assert_eq!(data.meta.version, 1);
    }
}
