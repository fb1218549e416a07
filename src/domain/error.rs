//! Error types for template compilation, value generation and route building

use thiserror::Error;

/// Errors raised while turning an interface document into mock routes.
///
/// Every variant is fatal for the pass that raised it. Nothing here is
/// transient, so callers decide whether to abort or report; nothing is
/// retried internally.
#[derive(Debug, Error)]
pub enum MockError {
    /// A caller passed an argument that breaks an entry-point contract
    #[error("Invalid argument '{parameter}': {reason}")]
    InvalidArgument { parameter: String, reason: String },

    /// A `$ref` points at a name missing from its lookup table
    #[error("Unresolved reference '{reference}': no entry named '{name}' in '{table}'")]
    UnresolvedReference {
        reference: String,
        name: String,
        table: String,
    },

    /// A reference appears in its own expansion path
    #[error("Circular schema reference: {chain}")]
    CircularReference { chain: String },

    /// Array items with a shape the compiler cannot classify
    #[error("Malformed array items for '{property}' (arrays of mixed or unknown shapes are not supported): {fragment}")]
    MalformedArrayItems { property: String, fragment: String },

    /// A custom format with no configured fallback value
    #[error("No value found for GenerationOptions[{0}]. Please specify a value for {0} even if you wish to use random generation")]
    UnconfiguredFormat(String),

    /// Example policy requested but the response carries no usable example
    #[error("Example generation was requested but the response for {path} {verb} {status} did not contain an example for '{content_type}'")]
    MissingExample {
        path: String,
        verb: String,
        status: String,
        content_type: String,
    },

    /// The document has no `definitions` section
    #[error("Please provide any object references inside a 'definitions' section of the interface document")]
    MissingDefinitions,

    /// Lookup of a path/verb pair that the document does not declare
    #[error("Could not find an operation for uri: {path} verb: {verb}")]
    UnknownOperation { path: String, verb: String },

    /// A translated path does not compile as a regular expression
    #[error("Invalid route pattern '{pattern}': {source}")]
    InvalidRoutePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The interface document could not be read or parsed
    #[error("Document error: {0}")]
    Document(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MockError {
    /// True when the schema graph itself is broken, as opposed to a
    /// configuration or input problem.
    pub fn is_broken_schema_graph(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedReference { .. }
                | Self::CircularReference { .. }
                | Self::MalformedArrayItems { .. }
        )
    }
}

/// Result type alias for mock generation
pub type MockResult<T> = Result<T, MockError>;
