use thiserror::Error;

use crate::adapters::format_generator::BuiltinFormat;
use crate::config::{GenerationOptions, ImposterSettings, Settings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_generation(&settings.generation.options) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_imposter(&settings.imposter) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_generation(options: &GenerationOptions) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if options.min_number > options.max_number {
            errors.push(ValidationError::InvalidValue {
                field: "generation.options.min_number".to_string(),
                reason: format!(
                    "min_number ({}) must not exceed max_number ({})",
                    options.min_number, options.max_number
                ),
            });
        }

        if options.random_string_length == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "generation.options.random_string_length".to_string(),
                reason: "Random strings must be at least one character long".to_string(),
            });
        }

        for name in options.custom_formats.keys() {
            if name.trim().is_empty() {
                errors.push(ValidationError::MissingField(
                    "generation.options.custom_formats.<name>".to_string(),
                ));
            } else if BuiltinFormat::parse(name).is_some() {
                errors.push(ValidationError::Duplicate(format!(
                    "Custom format '{}' shadows a built-in format; set generation.options.static_values instead",
                    name
                )));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_imposter(imposter: &ImposterSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if imposter.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "imposter.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if imposter.protocol.is_empty() {
            errors.push(ValidationError::MissingField("imposter.protocol".to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
