// ---------------------------------------------------------------------------
// Index field schema
// ---------------------------------------------------------------------------

/// Field data types as reported by the index mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Number,
    Keyword,
    Date,
    Text,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Number => "number",
            FieldType::Keyword => "keyword",
            FieldType::Date => "date",
            FieldType::Text => "text",
        }
    }
}

/// A single field definition within the index schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
    pub aggregatable: bool,
}

/// The field schema the editor is currently working against. Owned by the
/// caller and refreshed on demand; the checker and compiler only ever hold
/// a shared reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSchema {
    fields: Vec<FieldDef>,
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldDef>) -> Self {
        Self { fields }
    }

    /// An empty schema. Every field reference then checks as a warning.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn find(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
