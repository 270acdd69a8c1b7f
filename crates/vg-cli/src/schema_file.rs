use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use vg_formula::{FieldDef, FieldSchema, FieldType};

// ---------------------------------------------------------------------------
// Schema file: [[field]] entries in TOML
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default, rename = "field")]
    fields: Vec<FieldEntry>,
}

#[derive(Debug, Deserialize)]
struct FieldEntry {
    name: String,
    #[serde(rename = "type")]
    field_type: FieldTypeName,
    #[serde(default = "default_aggregatable")]
    aggregatable: bool,
}

fn default_aggregatable() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum FieldTypeName {
    Number,
    Keyword,
    Date,
    Text,
}

impl From<FieldTypeName> for FieldType {
    fn from(t: FieldTypeName) -> Self {
        match t {
            FieldTypeName::Number => FieldType::Number,
            FieldTypeName::Keyword => FieldType::Keyword,
            FieldTypeName::Date => FieldType::Date,
            FieldTypeName::Text => FieldType::Text,
        }
    }
}

/// Load a field schema from a TOML file of `[[field]]` entries.
pub fn load_schema(path: &Path) -> Result<FieldSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let file: SchemaFile = toml::from_str(&content)?;
    Ok(FieldSchema::new(
        file.fields
            .into_iter()
            .map(|f| FieldDef {
                name: f.name,
                field_type: f.field_type.into(),
                aggregatable: f.aggregatable,
            })
            .collect(),
    ))
}
