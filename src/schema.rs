//! Property schema for database creation.
//!
//! The `create` subcommand takes a JSON object mapping column names to type
//! names, e.g. `{"User": "title", "Timestamp": "date", "Duration": "number"}`,
//! supplied either inline or as a path to a JSON file.
use anyhow::{anyhow, Context, Result};
use serde_json::{json, Map, Value};
use std::path::Path;
use tracing::warn;

/// Column types supported for new databases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Title,
    Number,
    Date,
    RichText,
}

impl PropertyKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "title" => Some(Self::Title),
            "number" => Some(Self::Number),
            "date" => Some(Self::Date),
            "rich_text" => Some(Self::RichText),
            _ => None,
        }
    }

    /// The Notion property object for a database schema.
    fn to_value(self) -> Value {
        match self {
            Self::Title => json!({ "title": {} }),
            Self::Number => json!({ "number": { "format": "number" } }),
            Self::Date => json!({ "date": {} }),
            Self::RichText => json!({ "rich_text": {} }),
        }
    }
}

/// Parsed column schema for a new database.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertySchema {
    pub columns: Vec<(String, PropertyKind)>,
}

impl PropertySchema {
    /// Parse a `{"Name": "type"}` JSON object. Columns with an unrecognized
    /// type are skipped with a warning rather than failing the whole request.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(raw).context("invalid JSON for properties")?;
        let map = value
            .as_object()
            .ok_or_else(|| anyhow!("properties must be a JSON object of name -> type pairs"))?;

        let mut columns = Vec::with_capacity(map.len());
        for (name, type_value) in map {
            let type_name = type_value
                .as_str()
                .ok_or_else(|| anyhow!("property type for column '{}' must be a string", name))?;
            match PropertyKind::parse(type_name) {
                Some(kind) => columns.push((name.clone(), kind)),
                None => {
                    warn!(
                        "unknown property type '{}' for column '{}', skipping",
                        type_name, name
                    );
                }
            }
        }
        Ok(Self { columns })
    }

    /// Build the `properties` member of a create-database request.
    pub fn to_notion_properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        for (name, kind) in &self.columns {
            props.insert(name.clone(), kind.to_value());
        }
        props
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Resolve the `create` properties argument: a path to an existing file means
/// the file's contents are used verbatim, anything else is treated as a
/// literal JSON string.
pub fn resolve_properties_arg(arg: &str) -> Result<String> {
    let path = Path::new(arg);
    if path.is_file() {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read properties file {}", path.display()))
    } else {
        Ok(arg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn parses_supported_types() {
        let schema = PropertySchema::from_json(
            r#"{"User": "title", "Timestamp": "date", "Duration": "number", "Beans": "rich_text"}"#,
        )
        .unwrap();
        assert_eq!(schema.columns.len(), 4);
        assert!(schema
            .columns
            .iter()
            .any(|(n, k)| n == "User" && *k == PropertyKind::Title));
        assert!(schema
            .columns
            .iter()
            .any(|(n, k)| n == "Duration" && *k == PropertyKind::Number));
    }

    #[test]
    fn unknown_types_are_skipped() {
        let schema =
            PropertySchema::from_json(r#"{"User": "title", "Avatar": "files"}"#).unwrap();
        assert_eq!(schema.columns.len(), 1);
        assert_eq!(schema.columns[0].0, "User");
    }

    #[test]
    fn rejects_non_object_json() {
        assert!(PropertySchema::from_json(r#"["title"]"#).is_err());
        assert!(PropertySchema::from_json("not json").is_err());
    }

    #[test]
    fn rejects_non_string_type() {
        assert!(PropertySchema::from_json(r#"{"User": 1}"#).is_err());
    }

    #[test]
    fn notion_properties_shapes() {
        let schema =
            PropertySchema::from_json(r#"{"User": "title", "Duration": "number"}"#).unwrap();
        let props = schema.to_notion_properties();
        assert_eq!(props["User"], json!({ "title": {} }));
        assert_eq!(props["Duration"], json!({ "number": { "format": "number" } }));
    }

    #[test]
    fn existing_file_wins_over_literal() {
        let td = tempdir().unwrap();
        let path = td.path().join("props.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, r#"{{"User": "title"}}"#).unwrap();
        drop(f);
        let raw = resolve_properties_arg(path.to_str().unwrap()).unwrap();
        assert_eq!(raw, r#"{"User": "title"}"#);
    }

    #[test]
    fn missing_file_is_treated_as_literal() {
        let raw = resolve_properties_arg(r#"{"Score": "number"}"#).unwrap();
        assert_eq!(raw, r#"{"Score": "number"}"#);
    }
}
