use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod document;
pub mod error;
pub mod template;

pub use document::{InterfaceDocument, Parameter, ResponseObject, SchemaNode};
pub use error::{MockError, MockResult};
pub use template::{ElementDescriptor, ScalarSpec, Template, TemplateField};

/// How scalar leaves are populated during one generation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationPolicy {
    /// Fixed configured values; identical output on every pass
    Static,
    /// Sampled values within the configured bounds
    #[default]
    Random,
    /// Literal examples lifted from the interface document
    Example,
}

impl GenerationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationPolicy::Static => "static",
            GenerationPolicy::Random => "random",
            GenerationPolicy::Example => "example",
        }
    }
}

impl fmt::Display for GenerationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" => Ok(GenerationPolicy::Static),
            "random" => Ok(GenerationPolicy::Random),
            "example" => Ok(GenerationPolicy::Example),
            other => Err(format!(
                "unknown generation policy '{}' (expected static, random or example)",
                other
            )),
        }
    }
}

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const ALLOW_ORIGIN_HEADER: &str = "Access-Control-Allow-Origin";

/// Headers attached to every mocked response.
pub fn default_response_headers() -> IndexMap<String, String> {
    let mut headers = IndexMap::with_capacity(2);
    headers.insert(CONTENT_TYPE_HEADER.to_string(), "application/json".to_string());
    headers.insert(ALLOW_ORIGIN_HEADER.to_string(), "*".to_string());
    headers
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub status_code: u16,
    pub response_headers: IndexMap<String, String>,
    /// Serialized JSON payload
    pub response_body: String,
}

/// One compiled mock route, ready to register with a mock server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Regex matching the request path
    #[serde(rename = "uri")]
    pub uri_pattern: String,
    /// Uppercase HTTP method
    pub verb: String,
    #[serde(rename = "res")]
    pub response: RouteResponse,
}

impl RouteDescriptor {
    pub fn new(uri_pattern: String, verb: &str, status_code: u16, response_body: String) -> Self {
        Self {
            uri_pattern,
            verb: verb.to_uppercase(),
            response: RouteResponse {
                status_code,
                response_headers: default_response_headers(),
                response_body,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathMatch {
    pub method: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub matches: PathMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CannedResponse {
    pub status_code: u16,
    pub headers: IndexMap<String, String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StubResponse {
    pub is: CannedResponse,
}

/// All responses registered for one (path pattern, method) pair. A mock
/// server cycles through `responses` round-robin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stub {
    pub predicates: Vec<Predicate>,
    pub responses: Vec<StubResponse>,
}

/// Mountebank-style imposter definition built from route descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Imposter {
    pub port: u16,
    pub protocol: String,
    pub stubs: Vec<Stub>,
}

impl Imposter {
    /// Group routes into stubs by (uri pattern, verb), keeping discovery order.
    pub fn from_routes(port: u16, protocol: &str, routes: &[RouteDescriptor]) -> Self {
        let mut grouped: IndexMap<(String, String), Vec<StubResponse>> = IndexMap::new();
        for route in routes {
            grouped
                .entry((route.uri_pattern.clone(), route.verb.clone()))
                .or_default()
                .push(StubResponse {
                    is: CannedResponse {
                        status_code: route.response.status_code,
                        headers: route.response.response_headers.clone(),
                        body: route.response.response_body.clone(),
                    },
                });
        }

        let stubs = grouped
            .into_iter()
            .map(|((path, method), responses)| Stub {
                predicates: vec![Predicate {
                    matches: PathMatch { method, path },
                }],
                responses,
            })
            .collect();

        Self {
            port,
            protocol: protocol.to_string(),
            stubs,
        }
    }

    pub fn response_count(&self) -> usize {
        self.stubs.iter().map(|stub| stub.responses.len()).sum()
    }
}

/// The mock-server collaborator that receives a finished imposter.
#[async_trait]
pub trait RouteSink: Send + Sync {
    async fn publish(&self, imposter: &Imposter) -> anyhow::Result<()>;
}
