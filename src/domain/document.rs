//! Interface document model.
//!
//! These types mirror the parts of a Swagger 2.0 style interface document that
//! mock generation reads. The document arrives already validated and with
//! external references resolved; internal `$ref` pointers into `definitions`
//! and `responses` are kept and resolved by the compiler.
//!
//! Maps are [`IndexMap`]s so that property, path, verb and status order from
//! the source file survives deserialization.
//!
//! ```yaml
//! basePath: /v1
//! produces:
//!   - application/json
//! paths:
//!   /areas/{area_id}:
//!     get:
//!       parameters:
//!         - name: area_id
//!           in: path
//!           type: string
//!       responses:
//!         200:
//!           schema:
//!             $ref: '#/definitions/area'
//! definitions:
//!   area:
//!     type: object
//!     properties:
//!       name:
//!         type: string
//! ```

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use super::error::{MockError, MockResult};

pub const DEFAULT_BASE_PATH: &str = "/";
pub const DEFAULT_PRODUCES: &str = "application/json";

/// One node of the schema graph.
///
/// A well-formed node carries either a `type` or a `$ref`, never both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl SchemaNode {
    /// A node with no type, reference, items or properties.
    pub fn is_empty(&self) -> bool {
        self.schema_type.is_none()
            && self.reference.is_none()
            && self.items.is_none()
            && self.properties.is_empty()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.schema_type.as_deref()
    }
}

/// A parameter declared on an operation or a path item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    pub fn is_path(&self) -> bool {
        self.location == "path"
    }
}

/// A response entry: either defined in place or a `$ref` into the global
/// `responses` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
    /// Literal example payloads keyed by content type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<IndexMap<String, Value>>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    /// Status code (or `default`) to response
    #[serde(default, deserialize_with = "status_keyed")]
    pub responses: IndexMap<String, ResponseObject>,
}

/// YAML writes status codes as bare integers; accept them alongside strings.
fn status_keyed<'de, D>(deserializer: D) -> Result<IndexMap<String, ResponseObject>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StatusKey(String);

    impl<'de> Deserialize<'de> for StatusKey {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            struct KeyVisitor;

            impl Visitor<'_> for KeyVisitor {
                type Value = StatusKey;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a status code or 'default'")
                }

                fn visit_str<E: de::Error>(self, v: &str) -> Result<StatusKey, E> {
                    Ok(StatusKey(v.to_string()))
                }

                fn visit_u64<E: de::Error>(self, v: u64) -> Result<StatusKey, E> {
                    Ok(StatusKey(v.to_string()))
                }

                fn visit_i64<E: de::Error>(self, v: i64) -> Result<StatusKey, E> {
                    Ok(StatusKey(v.to_string()))
                }
            }

            deserializer.deserialize_any(KeyVisitor)
        }
    }

    struct ResponsesVisitor;

    impl<'de> Visitor<'de> for ResponsesVisitor {
        type Value = IndexMap<String, ResponseObject>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of status codes to responses")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut responses = IndexMap::new();
            while let Some((status, response)) = map.next_entry::<StatusKey, ResponseObject>()? {
                responses.insert(status.0, response);
            }
            Ok(responses)
        }
    }

    deserializer.deserialize_map(ResponsesVisitor)
}

/// Keys of a path item that hold an operation.
pub const HTTP_VERBS: [&str; 7] = ["get", "put", "post", "delete", "options", "head", "patch"];

/// Operations of a single path, keyed by lowercase verb.
///
/// Only [`HTTP_VERBS`] become operations; vendor extensions (`x-*`) and any
/// other path-level keys are skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathItem {
    /// Parameters shared by every operation of the path
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(flatten)]
    pub operations: IndexMap<String, Operation>,
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PathItemVisitor;

        impl<'de> Visitor<'de> for PathItemVisitor {
            type Value = PathItem;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a path item")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PathItem, A::Error> {
                let mut item = PathItem::default();
                while let Some(key) = map.next_key::<String>()? {
                    if key == "parameters" {
                        item.parameters = map.next_value()?;
                    } else if HTTP_VERBS.contains(&key.as_str()) {
                        let operation = map.next_value::<Operation>()?;
                        item.operations.insert(key, operation);
                    } else {
                        map.next_value::<de::IgnoredAny>()?;
                    }
                }
                Ok(item)
            }
        }

        deserializer.deserialize_map(PathItemVisitor)
    }
}

/// `produces` may be a single media type or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Produces {
    One(String),
    Many(Vec<String>),
}

impl Produces {
    fn primary(&self) -> Option<&str> {
        match self {
            Produces::One(media_type) => Some(media_type.as_str()),
            Produces::Many(media_types) => media_types.first().map(String::as_str),
        }
    }
}

/// The validated interface document handed over by the loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDocument {
    #[serde(rename = "basePath", default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produces: Option<Produces>,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<IndexMap<String, SchemaNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<IndexMap<String, ResponseObject>>,
}

impl InterfaceDocument {
    /// The `definitions` table. Its absence is fatal for route building.
    pub fn definitions(&self) -> MockResult<&IndexMap<String, SchemaNode>> {
        self.definitions.as_ref().ok_or(MockError::MissingDefinitions)
    }

    pub fn global_responses(&self) -> Option<&IndexMap<String, ResponseObject>> {
        self.responses.as_ref()
    }

    pub fn base_path(&self) -> &str {
        self.base_path
            .as_deref()
            .filter(|base| !base.is_empty())
            .unwrap_or(DEFAULT_BASE_PATH)
    }

    pub fn produces_type(&self) -> &str {
        self.produces
            .as_ref()
            .and_then(Produces::primary)
            .unwrap_or(DEFAULT_PRODUCES)
    }

    /// Parameters that apply to one operation: path-level parameters first,
    /// then the operation's own.
    pub fn parameters_for(&self, path: &str, verb: &str) -> MockResult<Vec<Parameter>> {
        let unknown = || MockError::UnknownOperation {
            path: path.to_string(),
            verb: verb.to_string(),
        };
        let item = self.paths.get(path).ok_or_else(unknown)?;
        let operation = item.operations.get(verb).ok_or_else(unknown)?;

        Ok(item
            .parameters
            .iter()
            .chain(operation.parameters.iter())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA_DOC: &str = r#"
basePath: /v1
produces:
  - application/json
paths:
  /areas/{area_id}:
    parameters:
      - name: area_id
        in: path
        type: string
        required: true
    get:
      parameters:
        - name: verbose
          in: query
          type: boolean
      responses:
        200:
          schema:
            $ref: '#/definitions/area'
definitions:
  area:
    type: object
    properties:
      zeta:
        type: string
      alpha:
        type: integer
"#;

    #[test]
    fn test_deserialize_preserves_order_and_refs() {
        let doc: InterfaceDocument = serde_yaml::from_str(AREA_DOC).unwrap();
        let area = &doc.definitions().unwrap()["area"];
        let names: Vec<&str> = area.properties.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);

        let op = &doc.paths["/areas/{area_id}"].operations["get"];
        let schema = op.responses["200"].schema.as_ref().unwrap();
        assert_eq!(schema.reference.as_deref(), Some("#/definitions/area"));
        assert!(schema.schema_type.is_none());
    }

    #[test]
    fn test_defaults_when_missing() {
        let doc = InterfaceDocument::default();
        assert_eq!(doc.base_path(), "/");
        assert_eq!(doc.produces_type(), "application/json");
        assert!(matches!(doc.definitions(), Err(MockError::MissingDefinitions)));
    }

    #[test]
    fn test_produces_single_string() {
        let doc: InterfaceDocument =
            serde_yaml::from_str("produces: text/plain\ndefinitions: {}\n").unwrap();
        assert_eq!(doc.produces_type(), "text/plain");
    }

    #[test]
    fn test_parameters_for_merges_path_level() {
        let doc: InterfaceDocument = serde_yaml::from_str(AREA_DOC).unwrap();
        let params = doc.parameters_for("/areas/{area_id}", "get").unwrap();
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["area_id", "verbose"]);
        assert!(params[0].is_path());
        assert!(!params[1].is_path());
    }

    #[test]
    fn test_parameters_for_unknown_operation() {
        let doc: InterfaceDocument = serde_yaml::from_str(AREA_DOC).unwrap();

        let err = doc.parameters_for("/areas/{area_idd}", "get").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not find an operation for uri: /areas/{area_idd} verb: get"
        );

        let err = doc.parameters_for("/areas/{area_id}", "ddelete").unwrap_err();
        assert!(matches!(err, MockError::UnknownOperation { .. }));
    }

    #[test]
    fn test_path_item_skips_extensions() {
        let doc: InterfaceDocument = serde_yaml::from_str(
            r#"
paths:
  /areas:
    x-owner: trails-team
    x-rate-limit:
      burst: 10
    parameters:
      - name: region
        in: query
        type: string
    get:
      responses:
        200:
          schema:
            type: boolean
    x-after-verbs: true
    post:
      responses:
        201:
          description: created
definitions: {}
"#,
        )
        .unwrap();

        let item = &doc.paths["/areas"];
        let verbs: Vec<&str> = item.operations.keys().map(String::as_str).collect();
        assert_eq!(verbs, vec!["get", "post"]);
        assert_eq!(item.parameters.len(), 1);
        assert!(item.operations["get"].responses.contains_key("200"));
    }

    #[test]
    fn test_path_item_extensions_from_json() {
        let doc: InterfaceDocument = serde_json::from_str(
            r#"{"paths": {"/areas": {"x-internal": {"owner": 1}, "delete": {"responses": {"200": {}}}}}}"#,
        )
        .unwrap();
        let item = &doc.paths["/areas"];
        assert_eq!(item.operations.len(), 1);
        assert!(item.operations.contains_key("delete"));
    }

    #[test]
    fn test_empty_node() {
        assert!(SchemaNode::default().is_empty());
        let node: SchemaNode = serde_json::from_str(r#"{"type": "string"}"#).unwrap();
        assert!(!node.is_empty());
        assert_eq!(node.type_name(), Some("string"));
    }
}
