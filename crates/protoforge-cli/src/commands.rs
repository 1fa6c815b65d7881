use anyhow::Context;
use protoforge_codegen::{
    is_package_name, load_schema_files, GeneratorConfig, Operation, ProtoGenerator,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::output::{compile_command, ensure_directory, output_paths};

#[derive(Serialize)]
struct FieldEntry {
    name: String,
    #[serde(rename = "type")]
    idl_type: String,
}

fn split_fields(fields: &str) -> Vec<String> {
    fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

fn load_config(path: Option<&Path>, fields: Option<&str>) -> anyhow::Result<GeneratorConfig> {
    let mut config = match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            GeneratorConfig::from_json(&json)?
        }
        None => GeneratorConfig::new(),
    };
    let fields = fields.map(split_fields).unwrap_or_default();
    if !fields.is_empty() {
        config = config.with_fields(fields);
    }
    Ok(config)
}

pub fn generate(
    dir: Option<&str>,
    schema: &[PathBuf],
    model: &str,
    fields: Option<&str>,
    filename: Option<&str>,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let registry = load_schema_files(schema)?;
    let config = load_config(config, fields)?;
    let record = registry.lookup(model)?;

    let base = filename
        .map(str::to_string)
        .unwrap_or_else(|| record.lower_name());
    let package = match &config.package {
        Some(package) => package.clone(),
        None if is_package_name(&base) => format!("{}s", base),
        None => {
            warn!("'{}' is not a valid package name, using the record name", base);
            record.plural_alias()
        }
    };

    let mut variants = Vec::with_capacity(Operation::ALL.len());
    for operation in Operation::ALL {
        let variant = config
            .clone()
            .with_operation(operation)
            .with_package(operation.package(&package));
        let proto = ProtoGenerator::new(&registry, model, variant)?.generate()?;
        debug!("Generated {} variant of {} ({} bytes)", operation, model, proto.len());
        variants.push((operation.file_stem(&base), proto));
    }

    let (protos, generated) = output_paths(dir);
    ensure_directory(&protos)?;
    ensure_directory(&generated)?;

    for (stem, proto) in variants {
        let path = format!("{}/{}.proto", protos, stem);
        fs::write(&path, proto).with_context(|| format!("failed to write {}", path))?;
        info!("Wrote {}", path);
        println!("{}", compile_command(&protos, &generated, &stem));
    }

    Ok(())
}

pub fn fields(
    schema: &[PathBuf],
    model: &str,
    fields: Option<&str>,
    config: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let registry = load_schema_files(schema)?;
    let config = load_config(config, fields)?;
    let generator = ProtoGenerator::new(&registry, model, config)?;
    let resolved = generator.fields()?;

    if json {
        let entries: Vec<_> = resolved
            .into_iter()
            .map(|(name, ty)| FieldEntry {
                name,
                idl_type: ty.to_string(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("{} ({} fields):", generator.schema().qualified_name(), resolved.len());
        for (name, ty) in resolved {
            println!("  {}: {}", name, ty);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fields_skips_empty_entries() {
        assert_eq!(split_fields("id, title,,author,"), vec!["id", "title", "author"]);
        assert!(split_fields(",").is_empty());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"package": "blog.v1", "field_names": ["id"]}"#).unwrap();

        let config = load_config(Some(&path), Some("title,author")).unwrap();
        assert_eq!(config.package.as_deref(), Some("blog.v1"));
        assert_eq!(
            config.field_names,
            Some(vec!["title".to_string(), "author".to_string()])
        );
    }
}
