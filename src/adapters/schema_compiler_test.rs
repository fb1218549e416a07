use super::schema_compiler::SchemaCompiler;
use super::template_registry::TemplateRegistry;
use crate::domain::{ElementDescriptor, MockError, ScalarSpec, SchemaNode, Template, TemplateField};
use indexmap::IndexMap;
use serde_json::json;

const HIKING_DEFINITIONS: &str = r#"
area:
  type: object
  properties:
    name:
      type: string
    id:
      type: string
      format: uuid
    elevation:
      type: integer
    open:
      type: boolean
    difficulty:
      type: string
      enum: [easy, moderate, hard]
    location:
      type: object
      properties:
        lat:
          type: number
        lng:
          type: number
    ranger:
      $ref: '#/definitions/ranger'
    trails:
      type: array
      items:
        $ref: '#/definitions/trail'
    tags:
      type: array
      items:
        type: string
        format: hostname
    photos:
      type: array
    permit:
      type: file
ranger:
  type: object
  properties:
    email:
      type: string
      format: email
trail:
  type: object
  properties:
    length:
      type: number
"#;

fn definitions(yaml: &str) -> IndexMap<String, SchemaNode> {
    serde_yaml::from_str(yaml).unwrap()
}

fn schema(value: serde_json::Value) -> SchemaNode {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_compile_scalar_fields() {
    let defs = definitions(HIKING_DEFINITIONS);
    let template = SchemaCompiler::new(&defs).compile_definition("area").unwrap();

    assert!(!template.is_root_wrapper());
    match template.get("id").unwrap() {
        TemplateField::Scalar(spec) => {
            assert_eq!(spec.type_name, "string");
            assert_eq!(spec.format.as_deref(), Some("uuid"));
        }
        other => panic!("expected scalar, got {:?}", other),
    }
    assert!(matches!(
        template.get("elevation"),
        Some(TemplateField::Scalar(spec)) if spec.type_name == "integer" && spec.format.is_none()
    ));
}

#[test]
fn test_field_order_follows_properties() {
    let defs = definitions(HIKING_DEFINITIONS);
    let template = SchemaCompiler::new(&defs).compile_definition("area").unwrap();
    let names: Vec<&str> = template.field_names().collect();
    assert_eq!(
        names,
        vec![
            "name", "id", "elevation", "open", "difficulty", "location", "ranger", "trails",
            "tags", "photos", "permit"
        ]
    );
}

#[test]
fn test_enum_is_carried_into_leaf() {
    let defs = definitions(HIKING_DEFINITIONS);
    let template = SchemaCompiler::new(&defs).compile_definition("area").unwrap();
    match template.get("difficulty").unwrap() {
        TemplateField::Scalar(spec) => assert_eq!(
            spec.enum_values,
            Some(vec![json!("easy"), json!("moderate"), json!("hard")])
        ),
        other => panic!("expected scalar, got {:?}", other),
    }
}

#[test]
fn test_nested_object_and_reference() {
    let defs = definitions(HIKING_DEFINITIONS);
    let template = SchemaCompiler::new(&defs).compile_definition("area").unwrap();

    match template.get("location").unwrap() {
        TemplateField::Object(nested) => {
            assert_eq!(nested.field_names().collect::<Vec<_>>(), vec!["lat", "lng"]);
        }
        other => panic!("expected object, got {:?}", other),
    }

    match template.get("ranger").unwrap() {
        TemplateField::Object(nested) => match nested.get("email").unwrap() {
            TemplateField::Scalar(spec) => assert_eq!(spec.format.as_deref(), Some("email")),
            other => panic!("expected scalar, got {:?}", other),
        },
        other => panic!("expected object, got {:?}", other),
    }
}

#[test]
fn test_array_element_descriptors() {
    let defs = definitions(HIKING_DEFINITIONS);
    let template = SchemaCompiler::new(&defs).compile_definition("area").unwrap();

    match template.get("trails").unwrap() {
        TemplateField::Array(ElementDescriptor::Composite { template }) => {
            assert!(template.get("length").is_some());
        }
        other => panic!("expected composite array, got {:?}", other),
    }

    match template.get("tags").unwrap() {
        TemplateField::Array(ElementDescriptor::Scalar(spec)) => {
            assert_eq!(spec.type_name, "string");
            assert_eq!(spec.format.as_deref(), Some("hostname"));
        }
        other => panic!("expected scalar array, got {:?}", other),
    }

    assert_eq!(
        template.get("photos"),
        Some(&TemplateField::Array(ElementDescriptor::Empty))
    );
}

#[test]
fn test_unknown_type_stays_a_leaf() {
    let defs = definitions(HIKING_DEFINITIONS);
    let template = SchemaCompiler::new(&defs).compile_definition("area").unwrap();
    assert!(matches!(
        template.get("permit"),
        Some(TemplateField::Scalar(spec)) if spec.type_name == "file"
    ));
}

#[test]
fn test_compiled_template_has_no_references() {
    let defs = definitions(HIKING_DEFINITIONS);
    let compiler = SchemaCompiler::new(&defs);
    for name in defs.keys() {
        let template = compiler.compile_definition(name).unwrap();
        let serialized = serde_json::to_string(&template).unwrap();
        assert!(!serialized.contains("$ref"), "{} still has a reference", name);
        assert!(!serialized.contains("#/definitions/"));
    }
}

#[test]
fn test_top_level_scalar_is_wrapped() {
    let defs = IndexMap::new();
    let template = SchemaCompiler::new(&defs)
        .compile(&schema(json!({"type": "string", "format": "uuid"})), "property")
        .unwrap();

    assert!(template.is_root_wrapper());
    let (name, field) = template.wrapped_field().unwrap();
    assert_eq!(name, "property");
    assert!(matches!(field, TemplateField::Scalar(spec) if spec.format.as_deref() == Some("uuid")));
}

#[test]
fn test_top_level_array_is_wrapped() {
    let defs = definitions(HIKING_DEFINITIONS);
    let template = SchemaCompiler::new(&defs)
        .compile(
            &schema(json!({"type": "array", "items": {"$ref": "#/definitions/trail"}})),
            "property",
        )
        .unwrap();

    assert!(template.is_root_wrapper());
    assert!(matches!(
        template.wrapped_field(),
        Some((_, TemplateField::Array(ElementDescriptor::Composite { .. })))
    ));
}

#[test]
fn test_top_level_reference_expands_target() {
    let defs = definitions(HIKING_DEFINITIONS);
    let template = SchemaCompiler::new(&defs)
        .compile(&schema(json!({"$ref": "#/definitions/ranger"})), "property")
        .unwrap();
    assert_eq!(template.field_names().collect::<Vec<_>>(), vec!["email"]);
}

#[test]
fn test_missing_type_with_properties_is_an_object() {
    let defs = IndexMap::new();
    let template = SchemaCompiler::new(&defs)
        .compile(
            &schema(json!({"properties": {"meta": {"properties": {"count": {"type": "integer"}}}}})),
            "property",
        )
        .unwrap();
    match template.get("meta").unwrap() {
        TemplateField::Object(nested) => assert!(nested.get("count").is_some()),
        other => panic!("expected object, got {:?}", other),
    }
}

#[test]
fn test_empty_name_is_rejected() {
    let defs = IndexMap::new();
    let compiler = SchemaCompiler::new(&defs);
    let node = schema(json!({"type": "object"}));

    for name in ["", "   "] {
        let err = compiler.compile(&node, name).unwrap_err();
        assert!(matches!(err, MockError::InvalidArgument { ref parameter, .. } if parameter == "name"));
    }
}

#[test]
fn test_unresolved_reference() {
    let defs = definitions(
        r#"
area:
  type: object
  properties:
    warden:
      $ref: '#/definitions/warden'
"#,
    );
    let err = SchemaCompiler::new(&defs).compile_definition("area").unwrap_err();
    match err {
        MockError::UnresolvedReference { name, table, .. } => {
            assert_eq!(name, "warden");
            assert_eq!(table, "definitions");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_malformed_array_items() {
    let defs = definitions(
        r#"
area:
  type: object
  properties:
    mixed:
      type: array
      items:
        properties:
          a: { type: string }
"#,
    );
    let err = SchemaCompiler::new(&defs).compile_definition("area").unwrap_err();
    assert!(matches!(err, MockError::MalformedArrayItems { ref property, .. } if property == "mixed"));
    assert!(err.is_broken_schema_graph());
}

#[test]
fn test_mutual_reference_cycle() {
    let defs = definitions(
        r#"
a:
  type: object
  properties:
    b: { $ref: '#/definitions/b' }
b:
  type: object
  properties:
    a: { $ref: '#/definitions/a' }
"#,
    );
    let err = SchemaCompiler::new(&defs).compile_definition("a").unwrap_err();
    match err {
        MockError::CircularReference { chain } => assert_eq!(chain, "a -> b -> a"),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_self_reference_through_array_items() {
    let defs = definitions(
        r#"
node:
  type: object
  properties:
    children:
      type: array
      items:
        $ref: '#/definitions/node'
"#,
    );
    let compiler = SchemaCompiler::new(&defs);
    assert!(matches!(
        compiler.compile_definition("node"),
        Err(MockError::CircularReference { .. })
    ));
    assert!(matches!(
        compiler.compile(&schema(json!({"$ref": "#/definitions/node"})), "property"),
        Err(MockError::CircularReference { .. })
    ));
}

#[test]
fn test_shared_reference_is_not_a_cycle() {
    let defs = definitions(
        r#"
point:
  type: object
  properties:
    x: { type: number }
segment:
  type: object
  properties:
    start: { $ref: '#/definitions/point' }
    end: { $ref: '#/definitions/point' }
"#,
    );
    let template = SchemaCompiler::new(&defs).compile_definition("segment").unwrap();
    assert_eq!(template.len(), 2);
}

#[test]
fn test_inline_compile_is_repeatable() {
    let defs = definitions(HIKING_DEFINITIONS);
    let compiler = SchemaCompiler::new(&defs);
    let inline = schema(json!({
        "type": "object",
        "properties": {
            "home": {"$ref": "#/definitions/area"},
            "visited": {"type": "array", "items": {"$ref": "#/definitions/trail"}}
        }
    }));

    let first = compiler.compile(&inline, "property").unwrap();
    let second = compiler.compile(&inline, "property").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_compiled_templates_are_reused_for_references() {
    let defs = definitions(HIKING_DEFINITIONS);
    let mut compiled = IndexMap::new();
    let mut marker = Template::new();
    marker.insert("stamp", TemplateField::Scalar(ScalarSpec::new("boolean", None)));
    compiled.insert("ranger".to_string(), marker.clone());

    let compiler = SchemaCompiler::new(&defs).with_templates(&compiled);
    let template = compiler
        .compile(
            &schema(json!({"properties": {"lead": {"$ref": "#/definitions/ranger"}}})),
            "property",
        )
        .unwrap();
    assert_eq!(template.get("lead"), Some(&TemplateField::Object(marker)));

    // Names missing from the compiled set still expand from definitions.
    let template = compiler
        .compile(&schema(json!({"$ref": "#/definitions/trail"})), "property")
        .unwrap();
    assert_eq!(template.field_names().collect::<Vec<_>>(), vec!["length"]);
}

#[test]
fn test_inline_schema_matches_registry_template() {
    let defs = definitions(HIKING_DEFINITIONS);
    let registry = TemplateRegistry::compile_all(&defs).unwrap();
    let compiler = SchemaCompiler::new(&defs).with_templates(registry.templates());

    let template = compiler
        .compile(
            &schema(json!({"properties": {"home": {"$ref": "#/definitions/area"}}})),
            "property",
        )
        .unwrap();
    assert_eq!(
        template.get("home"),
        Some(&TemplateField::Object(registry.get("area").unwrap().clone()))
    );
}
