use crate::{CodegenError, Result};
use protoforge_core::ScalarKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_MAX_RELATION_DEPTH: usize = 16;

/// Which slice of the CRUD surface a generated file covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    #[default]
    Full,
    List,
    Create,
    Retrieve,
    Update,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Full,
        Operation::List,
        Operation::Create,
        Operation::Retrieve,
        Operation::Update,
        Operation::Delete,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Operation::Full => "",
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Retrieve => "retrieve",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// `{prefix}_{base}` without dangling underscores
    pub fn file_stem(self, base: &str) -> String {
        prefixed(self.prefix(), base)
    }

    /// `{prefix}_{package}` without dangling underscores
    pub fn package(self, package: &str) -> String {
        prefixed(self.prefix(), package)
    }

    pub fn includes(self, other: Operation) -> bool {
        self == Operation::Full || self == other
    }
}

/// Whether `name` can be used as a package declaration
pub fn is_package_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

fn prefixed(prefix: &str, name: &str) -> String {
    format!("{}_{}", prefix, name).trim_matches('_').to_string()
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Full => write!(f, "full"),
            other => write!(f, "{}", other.prefix()),
        }
    }
}

/// Options for one generation run. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct GeneratorConfig {
    /// Package declaration; defaults to the record's plural alias
    pub package: Option<String>,
    /// Fields to emit, in order; defaults to pk, fields, forward relations
    pub field_names: Option<Vec<String>>,
    pub operation: Operation,
    pub max_relation_depth: usize,
    pub scalar_overrides: BTreeMap<ScalarKind, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package: None,
            field_names: None,
            operation: Operation::Full,
            max_relation_depth: DEFAULT_MAX_RELATION_DEPTH,
            scalar_overrides: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: GeneratorConfig =
            serde_json::from_str(json).map_err(|e| CodegenError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_names = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    pub fn with_max_relation_depth(mut self, depth: usize) -> Self {
        self.max_relation_depth = depth;
        self
    }

    pub fn with_scalar_override(mut self, kind: ScalarKind, name: impl Into<String>) -> Self {
        self.scalar_overrides.insert(kind, name.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_relation_depth == 0 {
            return Err(CodegenError::Config(
                "max_relation_depth must be at least 1".to_string(),
            ));
        }
        if let Some(package) = &self.package {
            if !is_package_name(package) {
                return Err(CodegenError::Config(format!(
                    "invalid package name: {:?}",
                    package
                )));
            }
        }
        if let Some(fields) = &self.field_names {
            if fields.iter().any(|f| f.trim().is_empty()) {
                return Err(CodegenError::Config("empty field name".to_string()));
            }
        }
        for (kind, name) in &self.scalar_overrides {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(CodegenError::Config(format!(
                    "invalid scalar override for {:?}: {:?}",
                    kind, name
                )));
            }
        }
        Ok(())
    }
}
