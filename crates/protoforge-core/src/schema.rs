use crate::{ForgeError, Multiplicity, Result, ScalarKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Alias accepted wherever a primary key field name is expected
pub const PK_ALIAS: &str = "pk";

/// Plain (non-relational) field of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: ScalarKind,
    /// Set when the field is a one-to-one link to another record. Only
    /// meaningful on a primary key, where the identity is inherited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_to_one: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            name: name.into(),
            kind,
            one_to_one: None,
        }
    }

    pub fn linked_to(mut self, reference: impl Into<String>) -> Self {
        self.one_to_one = Some(reference.into());
        self
    }
}

/// Relation from one record to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    pub name: String,
    pub related: String,
    #[serde(default)]
    pub multiplicity: Multiplicity,
    /// True when the relation was inferred from the other side
    #[serde(default)]
    pub reverse: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_field: Option<String>,
}

impl RelationDescriptor {
    pub fn new(name: impl Into<String>, related: impl Into<String>, multiplicity: Multiplicity) -> Self {
        Self {
            name: name.into(),
            related: related.into(),
            multiplicity,
            reverse: false,
            to_field: None,
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    pub fn to_field(mut self, field: impl Into<String>) -> Self {
        self.to_field = Some(field.into());
        self
    }

    pub fn is_many(&self) -> bool {
        self.multiplicity == Multiplicity::Many
    }
}

/// Description of a record type: identity, plain fields and relations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub name: String,
    #[serde(default)]
    pub module: String,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    pub primary_key: FieldDescriptor,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub relations: Vec<RelationDescriptor>,
}

impl RecordSchema {
    pub fn new(name: impl Into<String>, primary_key: FieldDescriptor) -> Self {
        Self {
            name: name.into(),
            module: String::new(),
            is_abstract: false,
            primary_key,
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_relation(mut self, relation: RelationDescriptor) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn abstract_base(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// `module.Name`, or just `Name` outside any module
    pub fn qualified_name(&self) -> String {
        if self.module.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.module, self.name)
        }
    }

    /// Lowercase record name used in routes, bodies and packages
    pub fn lower_name(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn plural_alias(&self) -> String {
        format!("{}s", self.lower_name())
    }

    pub fn pk_name(&self) -> &str {
        &self.primary_key.name
    }

    pub fn is_primary_key(&self, name: &str) -> bool {
        name == PK_ALIAS || name == self.primary_key.name
    }

    /// Primary key or plain field by name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        if self.is_primary_key(name) {
            return Some(&self.primary_key);
        }
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&RelationDescriptor> {
        self.relations.iter().find(|r| r.name == name)
    }

    pub fn forward_relations(&self) -> impl Iterator<Item = &RelationDescriptor> {
        self.relations.iter().filter(|r| !r.reverse)
    }

    /// Primary key, then plain fields, then forward relations
    pub fn default_field_names(&self) -> Vec<String> {
        std::iter::once(self.primary_key.name.clone())
            .chain(self.fields.iter().map(|f| f.name.clone()))
            .chain(self.forward_relations().map(|r| r.name.clone()))
            .collect()
    }
}

/// A JSON file declaring the records of one module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub module: String,
    pub records: Vec<RecordSchema>,
}

impl SchemaDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Registry of record schemas keyed by qualified name
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, RecordSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: RecordSchema) -> Result<()> {
        let reference = schema.qualified_name();
        if self.schemas.contains_key(&reference) {
            return Err(ForgeError::DuplicateSchema { reference });
        }
        debug!(
            "Registered schema {} ({} fields, {} relations)",
            reference,
            schema.fields.len(),
            schema.relations.len()
        );
        self.schemas.insert(reference, schema);
        Ok(())
    }

    /// Register every record of a document, defaulting their module to the document's
    pub fn load_document(&mut self, document: SchemaDocument) -> Result<()> {
        for mut record in document.records {
            if record.module.is_empty() {
                record.module = document.module.clone();
            }
            self.register(record)?;
        }
        Ok(())
    }

    pub fn load_json(&mut self, json: &str) -> Result<()> {
        self.load_document(SchemaDocument::from_json(json)?)
    }

    pub fn get(&self, reference: &str) -> Option<&RecordSchema> {
        self.schemas.get(reference)
    }

    pub fn lookup(&self, reference: &str) -> Result<&RecordSchema> {
        self.get(reference).ok_or_else(|| ForgeError::UnknownSchema {
            reference: reference.to_string(),
        })
    }

    /// Resolve a reference made from inside `owner`; bare names are
    /// looked up in the owner's module
    pub fn related(&self, owner: &RecordSchema, reference: &str) -> Result<&RecordSchema> {
        if reference.contains('.') || owner.module.is_empty() {
            self.lookup(reference)
        } else {
            self.lookup(&format!("{}.{}", owner.module, reference))
        }
    }

    pub fn references(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
