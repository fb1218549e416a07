//! Schema compilation.
//!
//! Walks a [`SchemaNode`] graph and produces a reference-free [`Template`].
//! Every `$ref` into the definitions table is expanded in place, so a schema
//! graph containing a reference cycle has no finite template and is rejected
//! with [`MockError::CircularReference`].
//!
//! A compiler can be handed the templates already built for the definitions
//! table; references to those names are then copied rather than re-expanded.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::domain::{
    ElementDescriptor, MockError, MockResult, ScalarSpec, SchemaNode, Template, TemplateField,
};

pub const DEFINITIONS_PREFIX: &str = "#/definitions/";
pub const RESPONSES_PREFIX: &str = "#/responses/";

/// True for the four JSON scalar type names.
pub fn is_simple_type(type_name: &str) -> bool {
    matches!(type_name, "number" | "string" | "integer" | "boolean")
}

/// Strip a pointer prefix such as `#/definitions/`, leaving the table key.
pub fn reference_name<'a>(reference: &'a str, prefix: &str) -> &'a str {
    reference.strip_prefix(prefix).unwrap_or(reference)
}

fn scalar_spec(node: &SchemaNode) -> ScalarSpec {
    ScalarSpec::new(node.type_name().unwrap_or_default(), node.format.clone())
        .with_enum(node.enum_values.clone())
}

pub struct SchemaCompiler<'a> {
    definitions: &'a IndexMap<String, SchemaNode>,
    compiled: Option<&'a IndexMap<String, Template>>,
}

impl<'a> SchemaCompiler<'a> {
    pub fn new(definitions: &'a IndexMap<String, SchemaNode>) -> Self {
        Self {
            definitions,
            compiled: None,
        }
    }

    /// Resolve references from `templates` before falling back to expansion.
    pub fn with_templates(mut self, templates: &'a IndexMap<String, Template>) -> Self {
        self.compiled = Some(templates);
        self
    }

    /// Compile `schema` into a template. `name` labels the synthetic field
    /// when the schema is itself a scalar or an array.
    pub fn compile(&self, schema: &SchemaNode, name: &str) -> MockResult<Template> {
        if name.trim().is_empty() {
            return Err(MockError::InvalidArgument {
                parameter: "name".to_string(),
                reason: "must be a non-empty string".to_string(),
            });
        }

        let mut expanding = Vec::new();
        match &schema.reference {
            Some(reference) if schema.schema_type.is_none() => {
                self.expand_reference(reference, &mut expanding)
            }
            _ => self.compile_node(schema, name, &mut expanding),
        }
    }

    /// Compile the named entry of the definitions table.
    pub fn compile_definition(&self, name: &str) -> MockResult<Template> {
        let schema = self
            .definitions
            .get(name)
            .ok_or_else(|| MockError::UnresolvedReference {
                reference: format!("{}{}", DEFINITIONS_PREFIX, name),
                name: name.to_string(),
                table: "definitions".to_string(),
            })?;

        let mut expanding = vec![name.to_string()];
        self.compile_node(schema, name, &mut expanding)
    }

    fn compile_node(
        &self,
        schema: &SchemaNode,
        name: &str,
        expanding: &mut Vec<String>,
    ) -> MockResult<Template> {
        match schema.type_name() {
            Some("array") => {
                let element = self.compile_items(schema.items.as_deref(), name, expanding)?;
                Ok(Template::wrapping(name, TemplateField::Array(element)))
            }
            Some(type_name) if is_simple_type(type_name) => {
                Ok(Template::wrapping(name, TemplateField::Scalar(scalar_spec(schema))))
            }
            _ => {
                let mut template = Template::new();
                for (property, node) in &schema.properties {
                    let field = self.compile_property(property, node, expanding)?;
                    template.insert(property.as_str(), field);
                }
                Ok(template)
            }
        }
    }

    fn compile_property(
        &self,
        property: &str,
        node: &SchemaNode,
        expanding: &mut Vec<String>,
    ) -> MockResult<TemplateField> {
        if node.schema_type.is_none() {
            if let Some(reference) = &node.reference {
                let nested = self.expand_reference(reference, expanding)?;
                return Ok(TemplateField::Object(nested));
            }
        }

        match node.type_name() {
            Some("array") => Ok(TemplateField::Array(self.compile_items(
                node.items.as_deref(),
                property,
                expanding,
            )?)),
            Some("object") | None => Ok(TemplateField::Object(
                self.compile_node(node, property, expanding)?,
            )),
            Some(type_name) => {
                if !is_simple_type(type_name) {
                    debug!(property, type_name, "Keeping unrecognised property type as a leaf");
                }
                Ok(TemplateField::Scalar(scalar_spec(node)))
            }
        }
    }

    fn compile_items(
        &self,
        items: Option<&SchemaNode>,
        property: &str,
        expanding: &mut Vec<String>,
    ) -> MockResult<ElementDescriptor> {
        let items = match items {
            Some(items) if !items.is_empty() => items,
            _ => {
                warn!(
                    property,
                    "Array has no item type, it will always be generated empty"
                );
                return Ok(ElementDescriptor::Empty);
            }
        };

        match (items.type_name(), items.reference.as_deref()) {
            (Some("object"), _) => Ok(ElementDescriptor::Composite {
                template: self.compile_node(items, property, expanding)?,
            }),
            (Some(type_name), _) if is_simple_type(type_name) => {
                Ok(ElementDescriptor::Scalar(scalar_spec(items)))
            }
            (None, Some(reference)) => Ok(ElementDescriptor::Composite {
                template: self.expand_reference(reference, expanding)?,
            }),
            _ => Err(MockError::MalformedArrayItems {
                property: property.to_string(),
                fragment: serde_json::to_string(items).unwrap_or_else(|_| format!("{:?}", items)),
            }),
        }
    }

    fn expand_reference(
        &self,
        reference: &str,
        expanding: &mut Vec<String>,
    ) -> MockResult<Template> {
        let name = reference_name(reference, DEFINITIONS_PREFIX);

        if let Some(start) = expanding.iter().position(|seen| seen == name) {
            let mut chain = expanding[start..].to_vec();
            chain.push(name.to_string());
            return Err(MockError::CircularReference {
                chain: chain.join(" -> "),
            });
        }

        if let Some(template) = self.compiled.and_then(|compiled| compiled.get(name)) {
            debug!(name, "Reusing compiled definition template");
            return Ok(template.clone());
        }

        let target = self
            .definitions
            .get(name)
            .ok_or_else(|| MockError::UnresolvedReference {
                reference: reference.to_string(),
                name: name.to_string(),
                table: "definitions".to_string(),
            })?;

        expanding.push(name.to_string());
        let compiled = self.compile_node(target, name, expanding);
        expanding.pop();
        compiled
    }
}
