use indexmap::IndexMap;
use tracing::info;

use crate::adapters::schema_compiler::{reference_name, SchemaCompiler, DEFINITIONS_PREFIX};
use crate::domain::{MockError, MockResult, SchemaNode, Template};

/// One compiled template per named definition. Built once per generation
/// pass and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: IndexMap<String, Template>,
}

impl TemplateRegistry {
    /// Compile every definition. The first failure aborts the whole pass.
    pub fn compile_all(definitions: &IndexMap<String, SchemaNode>) -> MockResult<Self> {
        let compiler = SchemaCompiler::new(definitions);
        let mut templates = IndexMap::with_capacity(definitions.len());

        for name in definitions.keys() {
            templates.insert(name.clone(), compiler.compile_definition(name)?);
        }

        info!(definitions = templates.len(), "Compiled definition templates");
        Ok(Self { templates })
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// Look up the template behind a `#/definitions/<name>` pointer.
    pub fn resolve(&self, reference: &str) -> MockResult<&Template> {
        let name = reference_name(reference, DEFINITIONS_PREFIX);
        self.templates
            .get(name)
            .ok_or_else(|| MockError::UnresolvedReference {
                reference: reference.to_string(),
                name: name.to_string(),
                table: "definitions".to_string(),
            })
    }

    pub fn templates(&self) -> &IndexMap<String, Template> {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions(yaml: &str) -> IndexMap<String, SchemaNode> {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_compile_all_keeps_definition_order() {
        let defs = definitions(
            r#"
zone:
  type: object
  properties:
    label: { type: string }
area:
  type: object
  properties:
    zone: { $ref: '#/definitions/zone' }
"#,
        );
        let registry = TemplateRegistry::compile_all(&defs).unwrap();
        let names: Vec<&str> = registry.templates().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zone", "area"]);
        assert!(registry.resolve("#/definitions/area").is_ok());
        assert!(registry.get("area").unwrap().get("zone").is_some());
    }

    #[test]
    fn test_compile_all_fails_on_first_broken_definition() {
        let defs = definitions(
            r#"
fine:
  type: object
  properties:
    id: { type: integer }
broken:
  type: object
  properties:
    missing: { $ref: '#/definitions/nowhere' }
"#,
        );
        let err = TemplateRegistry::compile_all(&defs).unwrap_err();
        assert!(matches!(err, MockError::UnresolvedReference { ref name, .. } if name == "nowhere"));
    }

    #[test]
    fn test_compile_all_is_repeatable() {
        let defs = definitions(
            r#"
trail:
  type: object
  properties:
    length: { type: number }
    surface: { type: string, enum: [dirt, gravel] }
area:
  type: object
  properties:
    name: { type: string }
    trails:
      type: array
      items: { $ref: '#/definitions/trail' }
    warden: { $ref: '#/definitions/trail' }
"#,
        );
        let first = TemplateRegistry::compile_all(&defs).unwrap();
        let second = TemplateRegistry::compile_all(&defs).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first.templates(), second.templates());
        assert_eq!(
            serde_json::to_string(first.templates()).unwrap(),
            serde_json::to_string(second.templates()).unwrap()
        );
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = TemplateRegistry::default();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.resolve("#/definitions/ghost"),
            Err(MockError::UnresolvedReference { .. })
        ));
    }
}
