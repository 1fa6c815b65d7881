use crate::{CodegenError, Result, ScalarTypeMapper};
use protoforge_core::{RecordSchema, SchemaRegistry};
use std::fmt;
use tracing::trace;

/// IDL type of a field, possibly multi-valued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub scalar: String,
    pub repeated: bool,
}

impl ResolvedType {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            scalar: name.into(),
            repeated: false,
        }
    }

    pub fn into_repeated(mut self) -> Self {
        self.repeated = true;
        self
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repeated {
            write!(f, "repeated {}", self.scalar)
        } else {
            write!(f, "{}", self.scalar)
        }
    }
}

/// Resolves field names to IDL types, following relations through the registry
#[derive(Debug, Clone, Copy)]
pub struct RelationResolver<'a> {
    registry: &'a SchemaRegistry,
    mapper: &'a ScalarTypeMapper,
    max_depth: usize,
}

impl<'a> RelationResolver<'a> {
    /// `max_depth` is the number of relation hops followed before giving up
    pub fn new(registry: &'a SchemaRegistry, mapper: &'a ScalarTypeMapper, max_depth: usize) -> Self {
        Self {
            registry,
            mapper,
            max_depth,
        }
    }

    pub fn resolve(&self, field_name: &str, schema: &RecordSchema) -> Result<ResolvedType> {
        let mut path = Vec::new();
        self.resolve_hop(field_name, schema, &mut path)
    }

    fn resolve_hop(
        &self,
        field_name: &str,
        schema: &RecordSchema,
        path: &mut Vec<String>,
    ) -> Result<ResolvedType> {
        let canonical = if schema.is_primary_key(field_name) {
            schema.pk_name()
        } else {
            field_name
        };
        let hop = format!("{}.{}", schema.qualified_name(), canonical);
        if path.contains(&hop) || path.len() > self.max_depth {
            path.push(hop);
            return Err(CodegenError::CyclicRelation {
                path: path.join(" -> "),
            });
        }
        trace!("Resolving {}", hop);
        path.push(hop);

        if let Some(field) = schema.field(field_name) {
            if let (true, Some(parent)) = (schema.is_primary_key(field_name), &field.one_to_one) {
                let related = self.registry.related(schema, parent)?;
                return self.resolve_hop(related.pk_name(), related, path);
            }
            return Ok(ResolvedType::scalar(self.mapper.map(field.kind)));
        }

        if let Some(relation) = schema.relation(field_name) {
            let related = self.registry.related(schema, &relation.related)?;
            let target = match (&relation.to_field, relation.reverse) {
                (Some(to_field), false) => to_field.as_str(),
                _ => related.pk_name(),
            };
            let resolved = self.resolve_hop(target, related, path)?;
            return Ok(if relation.is_many() {
                resolved.into_repeated()
            } else {
                resolved
            });
        }

        Err(CodegenError::InvalidField {
            field: field_name.to_string(),
            schema: schema.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protoforge_core::{FieldDescriptor, Multiplicity, RelationDescriptor, ScalarKind};

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                RecordSchema::new("User", FieldDescriptor::new("id", ScalarKind::Auto))
                    .in_module("blog")
                    .with_field(FieldDescriptor::new("username", ScalarKind::Slug)),
            )
            .unwrap();
        registry
            .register(
                RecordSchema::new("Profile", FieldDescriptor::new("user", ScalarKind::Other).linked_to("User"))
                    .in_module("blog")
                    .with_field(FieldDescriptor::new("bio", ScalarKind::Text)),
            )
            .unwrap();
        registry
            .register(
                RecordSchema::new("Post", FieldDescriptor::new("id", ScalarKind::BigInteger))
                    .in_module("blog")
                    .with_field(FieldDescriptor::new("title", ScalarKind::Char))
                    .with_relation(RelationDescriptor::new("author", "User", Multiplicity::One))
                    .with_relation(
                        RelationDescriptor::new("author_name", "User", Multiplicity::One).to_field("username"),
                    )
                    .with_relation(RelationDescriptor::new("profile", "Profile", Multiplicity::One)),
            )
            .unwrap();
        registry
            .register(
                RecordSchema::new("Tag", FieldDescriptor::new("id", ScalarKind::Auto))
                    .in_module("blog")
                    .with_relation(RelationDescriptor::new("posts", "Post", Multiplicity::Many))
                    .with_relation(
                        RelationDescriptor::new("slugs", "User", Multiplicity::Many)
                            .to_field("username")
                            .reversed(),
                    ),
            )
            .unwrap();
        registry
    }

    fn resolve(registry: &SchemaRegistry, record: &str, field: &str) -> Result<ResolvedType> {
        let mapper = ScalarTypeMapper::new();
        let resolver = RelationResolver::new(registry, &mapper, 16);
        resolver.resolve(field, registry.lookup(record).unwrap())
    }

    #[test]
    fn test_plain_fields() {
        let registry = registry();
        assert_eq!(resolve(&registry, "blog.Post", "id").unwrap().to_string(), "int64");
        assert_eq!(resolve(&registry, "blog.Post", "pk").unwrap().to_string(), "int64");
        assert_eq!(resolve(&registry, "blog.Post", "title").unwrap().to_string(), "string");
    }

    #[test]
    fn test_relations() {
        let registry = registry();
        assert_eq!(resolve(&registry, "blog.Post", "author").unwrap().to_string(), "int32");
        assert_eq!(resolve(&registry, "blog.Post", "author_name").unwrap().to_string(), "string");
        assert_eq!(resolve(&registry, "blog.Tag", "posts").unwrap().to_string(), "repeated int64");
        // reverse relations ignore to_field and join on the pk
        assert_eq!(resolve(&registry, "blog.Tag", "slugs").unwrap().to_string(), "repeated int32");
    }

    #[test]
    fn test_inherited_primary_key() {
        let registry = registry();
        assert_eq!(resolve(&registry, "blog.Profile", "user").unwrap(), ResolvedType::scalar("int32"));
        assert_eq!(resolve(&registry, "blog.Post", "profile").unwrap(), ResolvedType::scalar("int32"));
    }

    #[test]
    fn test_invalid_field() {
        let registry = registry();
        let err = resolve(&registry, "blog.Post", "nope").unwrap_err();
        assert!(matches!(
            err,
            CodegenError::InvalidField { ref field, ref schema } if field == "nope" && schema == "Post"
        ));
    }

    #[test]
    fn test_missing_related_schema() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                RecordSchema::new("Orphan", FieldDescriptor::new("id", ScalarKind::Auto))
                    .with_relation(RelationDescriptor::new("parent", "Ghost", Multiplicity::One)),
            )
            .unwrap();
        let err = resolve(&registry, "Orphan", "parent").unwrap_err();
        assert!(matches!(err, CodegenError::Schema(_)));
    }

    #[test]
    fn test_cyclic_primary_key_chain() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(RecordSchema::new("A", FieldDescriptor::new("b", ScalarKind::Other).linked_to("B")))
            .unwrap();
        registry
            .register(RecordSchema::new("B", FieldDescriptor::new("a", ScalarKind::Other).linked_to("A")))
            .unwrap();
        let err = resolve(&registry, "A", "b").unwrap_err();
        match err {
            CodegenError::CyclicRelation { path } => assert_eq!(path, "A.b -> B.a -> A.b"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_depth_limit() {
        let registry = registry();
        let mapper = ScalarTypeMapper::new();
        let shallow = RelationResolver::new(&registry, &mapper, 0);
        let post = registry.lookup("blog.Post").unwrap();
        assert!(shallow.resolve("title", post).is_ok());
        assert!(matches!(
            shallow.resolve("author", post),
            Err(CodegenError::CyclicRelation { .. })
        ));
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let registry = registry();
        let first = resolve(&registry, "blog.Post", "profile").unwrap();
        let second = resolve(&registry, "blog.Post", "profile").unwrap();
        assert_eq!(first, second);
    }
}
