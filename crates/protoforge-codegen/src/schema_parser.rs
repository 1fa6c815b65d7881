use crate::Result;
use protoforge_core::{
    FieldDescriptor, Multiplicity, RecordSchema, RelationDescriptor, ScalarKind, SchemaDocument,
    SchemaRegistry,
};
use std::path::Path;
use tracing::info;

/// Parse a JSON schema document into a fresh registry
pub fn parse_schema(schema_json: &str) -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    registry.load_json(schema_json)?;
    Ok(registry)
}

/// Load schema documents from disk into one registry
pub fn load_schema_files<P: AsRef<Path>>(paths: &[P]) -> Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    for path in paths {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        registry.load_json(&json)?;
        info!("Loaded schema document {}", path.display());
    }
    Ok(registry)
}

/// Example schema document for a small blog
pub fn example_blog_schema() -> String {
    let document = SchemaDocument {
        module: "blog".to_string(),
        records: vec![
            RecordSchema::new("User", FieldDescriptor::new("id", ScalarKind::Auto))
                .with_field(FieldDescriptor::new("username", ScalarKind::Char))
                .with_field(FieldDescriptor::new("email", ScalarKind::Email))
                .with_relation(
                    RelationDescriptor::new("posts", "Post", Multiplicity::Many).reversed(),
                ),
            RecordSchema::new(
                "Profile",
                FieldDescriptor::new("user", ScalarKind::Other).linked_to("User"),
            )
            .with_field(FieldDescriptor::new("bio", ScalarKind::Text))
            .with_field(FieldDescriptor::new("joined", ScalarKind::DateTime)),
            RecordSchema::new("Post", FieldDescriptor::new("id", ScalarKind::Auto))
                .with_field(FieldDescriptor::new("title", ScalarKind::Char))
                .with_field(FieldDescriptor::new("content", ScalarKind::Text))
                .with_field(FieldDescriptor::new("published", ScalarKind::Boolean))
                .with_relation(RelationDescriptor::new("author", "User", Multiplicity::One)),
            RecordSchema::new("Tag", FieldDescriptor::new("id", ScalarKind::Auto))
                .with_field(FieldDescriptor::new("label", ScalarKind::Slug))
                .with_relation(RelationDescriptor::new("posts", "Post", Multiplicity::Many)),
            RecordSchema::new("Timestamped", FieldDescriptor::new("id", ScalarKind::Auto))
                .with_field(FieldDescriptor::new("created", ScalarKind::DateTime))
                .abstract_base(),
        ],
    };
    serde_json::to_string_pretty(&document).unwrap_or_default()
}
