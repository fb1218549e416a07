use std::borrow::Cow;

use tracing::{debug, info};

use crate::adapters::format_generator::FormatGenerator;
use crate::adapters::instantiator::Instantiator;
use crate::adapters::schema_compiler::{
    reference_name, SchemaCompiler, DEFINITIONS_PREFIX, RESPONSES_PREFIX,
};
use crate::adapters::template_registry::TemplateRegistry;
use crate::adapters::url_pattern::{compile_route_pattern, join_base_path, regexify_url};
use crate::domain::{
    GenerationPolicy, InterfaceDocument, MockError, MockResult, ResponseObject, RouteDescriptor,
    SchemaNode, Template,
};

/// Field name for schemas that are compiled in place rather than looked up.
pub const INLINE_SCHEMA_KEY: &str = "property";
pub const DEFAULT_STATUS_CODE: u16 = 200;

/// Status code for an emitted response key; `None` for keys that are skipped.
pub fn emitted_status(status: &str) -> Option<u16> {
    match status {
        "200" => Some(200),
        "201" => Some(201),
        "default" => Some(DEFAULT_STATUS_CODE),
        _ => None,
    }
}

/// Walks every path, verb and status of a document and emits one route per
/// surviving response.
pub struct RouteCompiler<'a> {
    document: &'a InterfaceDocument,
    generator: &'a FormatGenerator,
}

impl<'a> RouteCompiler<'a> {
    pub fn new(document: &'a InterfaceDocument, generator: &'a FormatGenerator) -> Self {
        Self {
            document,
            generator,
        }
    }

    pub fn build_routes(&self, policy: GenerationPolicy) -> MockResult<Vec<RouteDescriptor>> {
        let document = self.document;
        let definitions = document.definitions()?;
        let registry = match policy {
            GenerationPolicy::Example => None,
            _ => Some(TemplateRegistry::compile_all(definitions)?),
        };
        let compiler = match &registry {
            Some(registry) => SchemaCompiler::new(definitions).with_templates(registry.templates()),
            None => SchemaCompiler::new(definitions),
        };
        let instantiator = Instantiator::new(self.generator, policy);
        let base_path = document.base_path();

        let mut routes = Vec::new();
        for (path, item) in &document.paths {
            for (verb, operation) in &item.operations {
                let parameters = document.parameters_for(path, verb)?;
                let uri = join_base_path(base_path, &regexify_url(path, &parameters));
                compile_route_pattern(&uri)?;

                for (status, response) in &operation.responses {
                    let Some(status_code) = emitted_status(status) else {
                        debug!(%path, %verb, %status, "Skipping response status");
                        continue;
                    };

                    let response = self.resolve_response(response)?;
                    let Some(schema) = &response.schema else {
                        debug!(%path, %verb, %status, "Skipping response without a schema");
                        continue;
                    };

                    let body = match &registry {
                        Some(registry) => {
                            let template = self.template_for(schema, registry, &compiler)?;
                            serde_json::to_string(&instantiator.payload(&template)?)?
                        }
                        None => self.example_body(response, path, verb, status)?,
                    };

                    debug!(%uri, %verb, status_code, "Compiled route");
                    routes.push(RouteDescriptor::new(uri.clone(), verb, status_code, body));
                }
            }
        }

        info!(routes = routes.len(), %policy, "Compiled mock routes");
        Ok(routes)
    }

    fn resolve_response(&self, response: &'a ResponseObject) -> MockResult<&'a ResponseObject> {
        let Some(reference) = &response.reference else {
            return Ok(response);
        };

        let name = reference_name(reference, RESPONSES_PREFIX);
        self.document
            .global_responses()
            .and_then(|responses| responses.get(name))
            .ok_or_else(|| MockError::UnresolvedReference {
                reference: reference.clone(),
                name: name.to_string(),
                table: "responses".to_string(),
            })
    }

    fn template_for<'r>(
        &self,
        schema: &SchemaNode,
        registry: &'r TemplateRegistry,
        compiler: &SchemaCompiler<'_>,
    ) -> MockResult<Cow<'r, Template>> {
        match (&schema.reference, schema.schema_type.is_none()) {
            (Some(reference), true) => {
                debug!(
                    name = reference_name(reference, DEFINITIONS_PREFIX),
                    "Using registered template"
                );
                Ok(Cow::Borrowed(registry.resolve(reference)?))
            }
            _ => Ok(Cow::Owned(compiler.compile(schema, INLINE_SCHEMA_KEY)?)),
        }
    }

    fn example_body(
        &self,
        response: &ResponseObject,
        path: &str,
        verb: &str,
        status: &str,
    ) -> MockResult<String> {
        let content_type = self.document.produces_type();
        let example = response
            .examples
            .as_ref()
            .and_then(|examples| examples.get(content_type))
            .ok_or_else(|| MockError::MissingExample {
                path: path.to_string(),
                verb: verb.to_string(),
                status: status.to_string(),
                content_type: content_type.to_string(),
            })?;
        Ok(serde_json::to_string(example)?)
    }
}
