use tracing::info;

use crate::adapters::format_generator::FormatGenerator;
use crate::adapters::route_compiler::RouteCompiler;
use crate::config::Settings;
use crate::domain::{
    GenerationPolicy, Imposter, InterfaceDocument, MockResult, RouteDescriptor, RouteSink,
};

/// Entry point tying settings, generation and publishing together.
pub struct MockBank {
    settings: Settings,
    generator: FormatGenerator,
}

impl MockBank {
    pub fn new(settings: Settings) -> Self {
        let generator = FormatGenerator::new(settings.generation.options.clone());
        Self {
            settings,
            generator,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn policy(&self) -> GenerationPolicy {
        self.settings.generation.policy
    }

    /// Compile the document into route descriptors under the configured policy.
    pub fn build_routes(&self, document: &InterfaceDocument) -> MockResult<Vec<RouteDescriptor>> {
        info!(
            "Using {} property generation when creating responses",
            self.policy().as_str().to_uppercase()
        );
        RouteCompiler::new(document, &self.generator).build_routes(self.policy())
    }

    pub fn build_imposter(&self, document: &InterfaceDocument) -> MockResult<Imposter> {
        let routes = self.build_routes(document)?;
        let imposter = &self.settings.imposter;
        Ok(Imposter::from_routes(imposter.port, &imposter.protocol, &routes))
    }

    /// Build the imposter and hand it to `sink`.
    pub async fn publish(
        &self,
        document: &InterfaceDocument,
        sink: &dyn RouteSink,
    ) -> anyhow::Result<Imposter> {
        let imposter = self.build_imposter(document)?;
        sink.publish(&imposter).await?;

        info!(
            port = imposter.port,
            stubs = imposter.stubs.len(),
            responses = imposter.response_count(),
            "Published imposter"
        );
        Ok(imposter)
    }
}
