//! # Mockbank - Mock Responses From Interface Documents
//!
//! Mockbank reads a Swagger 2.0 style interface document and turns every
//! operation into canned mock-server routes with JSON bodies generated from
//! the response schemas.
//!
//! ## Features
//!
//! - **3 Generation Policies**: Static, Random, Example
//! - **Reference Expansion**: `$ref` into `definitions` and `responses`, with cycle detection
//! - **Route Patterns**: path templates become anchored regexes (`/areas/\w+/trails/\d+$`)
//! - **Imposters**: routes grouped into Mountebank-style stubs
//! - **Validation**: generation options are checked before any route is built
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mockbank::adapters::document_loader::DocumentLoader;
//! use mockbank::adapters::mock_bank::MockBank;
//! use mockbank::config::Settings;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::from_file(Path::new("mockbank.toml"))?;
//!     let document = DocumentLoader::load("api.yaml").await?;
//!
//!     let routes = MockBank::new(settings).build_routes(&document)?;
//!     println!("{} routes", routes.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Mockbank follows Hexagonal Architecture:
//! - **Domain**: document model, templates, route descriptors and the sink port
//! - **Adapters**: schema compiler, generators, route compiler and sinks
//! - **Config**: Configuration management

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
