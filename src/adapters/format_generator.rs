use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{Local, SecondsFormat};
use fake::faker::internet::en::{DomainSuffix, IPv4, Username};
use fake::Fake;
use rand::Rng;
use serde_json::{json, Map, Value};
use tracing::warn;
use uuid::Uuid;

use crate::config::{GenerationOptions, StaticValues};
use crate::domain::{GenerationPolicy, MockError, MockResult, ScalarSpec};

pub const EMAIL_DOMAIN: &str = "example.com";
pub const PASSWORD_PREFIX: &str = "password_";
const SHORT_WORD_LENGTH: usize = 5;

/// String formats that have a built-in random generator and a static value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFormat {
    Uuid,
    Email,
    DateTime,
    Date,
    Password,
    Byte,
    Binary,
    Uri,
    Ipv4,
    Hostname,
}

impl BuiltinFormat {
    pub const ALL: [BuiltinFormat; 10] = [
        BuiltinFormat::Uuid,
        BuiltinFormat::Email,
        BuiltinFormat::DateTime,
        BuiltinFormat::Date,
        BuiltinFormat::Password,
        BuiltinFormat::Byte,
        BuiltinFormat::Binary,
        BuiltinFormat::Uri,
        BuiltinFormat::Ipv4,
        BuiltinFormat::Hostname,
    ];

    pub fn parse(format: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|builtin| builtin.name() == format)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinFormat::Uuid => "uuid",
            BuiltinFormat::Email => "email",
            BuiltinFormat::DateTime => "date-time",
            BuiltinFormat::Date => "date",
            BuiltinFormat::Password => "password",
            BuiltinFormat::Byte => "byte",
            BuiltinFormat::Binary => "binary",
            BuiltinFormat::Uri => "uri",
            BuiltinFormat::Ipv4 => "ipv4",
            BuiltinFormat::Hostname => "hostname",
        }
    }

    pub fn static_value<'a>(&self, values: &'a StaticValues) -> &'a str {
        match self {
            BuiltinFormat::Uuid => &values.uuid,
            BuiltinFormat::Email => &values.email,
            BuiltinFormat::DateTime => &values.date_time,
            BuiltinFormat::Date => &values.date,
            BuiltinFormat::Password => &values.password,
            BuiltinFormat::Byte => &values.byte,
            BuiltinFormat::Binary => &values.binary,
            BuiltinFormat::Uri => &values.uri,
            BuiltinFormat::Ipv4 => &values.ipv4,
            BuiltinFormat::Hostname => &values.hostname,
        }
    }

    pub fn random_value(&self) -> String {
        let mut rng = rand::thread_rng();
        match self {
            BuiltinFormat::Uuid => Uuid::new_v4().to_string(),
            BuiltinFormat::Email => format!(
                "{}@{}",
                Username().fake::<String>().to_lowercase(),
                EMAIL_DOMAIN
            ),
            BuiltinFormat::DateTime => Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            BuiltinFormat::Date => Local::now().format("%Y-%m-%d").to_string(),
            BuiltinFormat::Password => {
                format!("{}{}", PASSWORD_PREFIX, random_word(SHORT_WORD_LENGTH))
            }
            BuiltinFormat::Byte => STANDARD.encode(random_word(SHORT_WORD_LENGTH)),
            BuiltinFormat::Binary => {
                let octets = rng.gen_range(1..=4);
                (0..octets * 8)
                    .map(|_| if rng.gen_bool(0.5) { '1' } else { '0' })
                    .collect()
            }
            BuiltinFormat::Uri => format!(
                "http://www.{}.{}/{}",
                random_word(8),
                DomainSuffix().fake::<String>(),
                random_word(6)
            ),
            BuiltinFormat::Ipv4 => IPv4().fake::<String>(),
            BuiltinFormat::Hostname => {
                format!("{}.{}", random_word(8), DomainSuffix().fake::<String>())
            }
        }
    }
}

/// Lowercase ASCII word of exactly `length` characters.
pub fn random_word(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect()
}

/// Produces one scalar value for a (type, format, enum) triple under a policy.
#[derive(Debug, Clone, Default)]
pub struct FormatGenerator {
    options: GenerationOptions,
}

impl FormatGenerator {
    pub fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    pub fn generate(&self, spec: &ScalarSpec, policy: GenerationPolicy) -> MockResult<Value> {
        match spec.type_name.as_str() {
            "boolean" => Ok(self.generate_boolean(policy)),
            "number" | "integer" => self.generate_number(policy),
            "string" => self.generate_string(
                spec.format.as_deref(),
                spec.enum_values.as_deref(),
                policy,
            ),
            "object" => Ok(Value::Object(Map::new())),
            "array" => Ok(Value::Array(Vec::new())),
            other => {
                warn!(
                    property_type = other,
                    "Encountered a property type that cannot be generated, returning the type name"
                );
                Ok(json!(other))
            }
        }
    }

    fn generate_boolean(&self, policy: GenerationPolicy) -> Value {
        match policy {
            GenerationPolicy::Static => json!(self.options.static_values.boolean_default),
            _ => json!(rand::thread_rng().gen_bool(0.5)),
        }
    }

    fn generate_number(&self, policy: GenerationPolicy) -> MockResult<Value> {
        if policy == GenerationPolicy::Static {
            return Ok(json!(self.options.static_values.number_default));
        }

        let (min, max) = (self.options.min_number, self.options.max_number);
        if min > max {
            return Err(MockError::InvalidArgument {
                parameter: "min_number".to_string(),
                reason: format!("min_number ({}) must not exceed max_number ({})", min, max),
            });
        }
        let value: i64 = rand::thread_rng().gen_range(min..=max);
        Ok(json!(value))
    }

    fn generate_string(
        &self,
        format: Option<&str>,
        enum_values: Option<&[Value]>,
        policy: GenerationPolicy,
    ) -> MockResult<Value> {
        // Enums only constrain random output; static stays fixed.
        if policy == GenerationPolicy::Random {
            if let Some(values) = enum_values.filter(|values| !values.is_empty()) {
                let idx = rand::thread_rng().gen_range(0..values.len());
                return Ok(values[idx].clone());
            }
        }

        let statics = &self.options.static_values;
        let Some(format) = format else {
            return Ok(match policy {
                GenerationPolicy::Static => json!(statics.string_default),
                _ => json!(random_word(self.options.random_string_length)),
            });
        };

        match BuiltinFormat::parse(format) {
            Some(builtin) if policy == GenerationPolicy::Static => {
                Ok(json!(builtin.static_value(statics)))
            }
            Some(builtin) => Ok(json!(builtin.random_value())),
            None => self
                .options
                .custom_format(format)
                .cloned()
                .ok_or_else(|| MockError::UnconfiguredFormat(format.to_string())),
        }
    }
}
