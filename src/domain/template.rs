//! Compiled, reference-free generation templates.
//!
//! A [`Template`] is what the schema compiler produces from a [`SchemaNode`]:
//! every `$ref` is expanded and every position is tagged as a scalar leaf, an
//! array or a nested object. Templates are immutable once built and can be
//! instantiated any number of times.
//!
//! [`SchemaNode`]: crate::domain::document::SchemaNode

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Type and format of a scalar leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalarSpec {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
}

impl ScalarSpec {
    pub fn new(type_name: impl Into<String>, format: Option<String>) -> Self {
        Self {
            type_name: type_name.into(),
            format,
            enum_values: None,
        }
    }

    pub fn with_enum(mut self, enum_values: Option<Vec<Value>>) -> Self {
        self.enum_values = enum_values;
        self
    }
}

/// What an array field holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementDescriptor {
    Scalar(ScalarSpec),
    Composite { template: Template },
    /// The schema gave no item information; always generates `[]`
    Empty,
}

/// One compiled field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum TemplateField {
    Scalar(ScalarSpec),
    Array(ElementDescriptor),
    Object(Template),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Template {
    fields: IndexMap<String, TemplateField>,
    /// Set when the source schema was itself a scalar or an array. The
    /// template then holds exactly one synthetic field whose value is the
    /// whole payload.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    root_wrapper: bool,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field template standing in for a scalar or array root.
    pub fn wrapping(name: impl Into<String>, field: TemplateField) -> Self {
        let mut fields = IndexMap::with_capacity(1);
        fields.insert(name.into(), field);
        Self {
            fields,
            root_wrapper: true,
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, field: TemplateField) {
        self.fields.insert(name.into(), field);
    }

    pub fn get(&self, name: &str) -> Option<&TemplateField> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &TemplateField)> {
        self.fields.iter()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn is_root_wrapper(&self) -> bool {
        self.root_wrapper
    }

    /// The single wrapped field of a root-wrapper template.
    pub fn wrapped_field(&self) -> Option<(&String, &TemplateField)> {
        if self.root_wrapper && self.fields.len() == 1 {
            self.fields.first()
        } else {
            None
        }
    }
}
