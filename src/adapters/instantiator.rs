use serde_json::{Map, Value};

use crate::adapters::format_generator::FormatGenerator;
use crate::domain::{ElementDescriptor, GenerationPolicy, MockResult, Template, TemplateField};

/// Turns compiled templates into JSON values under a fixed policy.
pub struct Instantiator<'a> {
    generator: &'a FormatGenerator,
    policy: GenerationPolicy,
}

impl<'a> Instantiator<'a> {
    pub fn new(generator: &'a FormatGenerator, policy: GenerationPolicy) -> Self {
        Self { generator, policy }
    }

    pub fn policy(&self) -> GenerationPolicy {
        self.policy
    }

    /// Build an object with one entry per template field, in template order.
    pub fn instantiate(&self, template: &Template) -> MockResult<Value> {
        let mut object = Map::with_capacity(template.len());
        for (name, field) in template.fields() {
            object.insert(name.clone(), self.instantiate_field(field)?);
        }
        Ok(Value::Object(object))
    }

    /// Like [`Instantiator::instantiate`], but a template standing in for a
    /// scalar or array root yields the bare value instead of `{name: value}`.
    pub fn payload(&self, template: &Template) -> MockResult<Value> {
        match template.wrapped_field() {
            Some((_, field)) => self.instantiate_field(field),
            None => self.instantiate(template),
        }
    }

    fn instantiate_field(&self, field: &TemplateField) -> MockResult<Value> {
        match field {
            TemplateField::Scalar(spec) => self.generator.generate(spec, self.policy),
            TemplateField::Object(nested) => self.instantiate(nested),
            TemplateField::Array(element) => self.instantiate_array(element),
        }
    }

    fn instantiate_array(&self, element: &ElementDescriptor) -> MockResult<Value> {
        let length = self.generator.options().random_array_length;
        let items = match element {
            ElementDescriptor::Empty => Vec::new(),
            ElementDescriptor::Scalar(spec) => (0..length)
                .map(|_| self.generator.generate(spec, self.policy))
                .collect::<MockResult<Vec<_>>>()?,
            ElementDescriptor::Composite { template } => (0..length)
                .map(|_| self.instantiate(template))
                .collect::<MockResult<Vec<_>>>()?,
        };
        Ok(Value::Array(items))
    }
}
