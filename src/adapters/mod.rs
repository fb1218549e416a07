pub mod document_loader;
pub mod format_generator;
pub mod instantiator;
pub mod mock_bank;
pub mod route_compiler;
pub mod route_sink;
pub mod schema_compiler;
pub mod template_registry;
pub mod url_pattern;

#[cfg(test)]
mod schema_compiler_test;
