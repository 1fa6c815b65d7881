pub mod config;
pub mod error;
pub mod generator;
pub mod mapper;
pub mod resolver;
pub mod schema_parser;
pub mod writer;

pub use config::*;
pub use error::*;
pub use generator::*;
pub use mapper::*;
pub use resolver::*;
pub use schema_parser::*;
pub use writer::{IdlWriter, Indent};

use protoforge_core::SchemaRegistry;

/// Generate the protocol definition for `reference` from a JSON schema document
pub fn generate_proto(schema_json: &str, reference: &str, config: GeneratorConfig) -> Result<String> {
    let registry = parse_schema(schema_json)?;
    generate_from_registry(&registry, reference, config)
}

pub fn generate_from_registry(
    registry: &SchemaRegistry,
    reference: &str,
    config: GeneratorConfig,
) -> Result<String> {
    ProtoGenerator::new(registry, reference, config)?.generate()
}
