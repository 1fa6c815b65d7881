use crate::writer::IdlWriter;
use crate::{
    CodegenError, GeneratorConfig, Operation, RelationResolver, ResolvedType, Result,
    ScalarTypeMapper,
};
use protoforge_core::{RecordSchema, SchemaRegistry};
use tracing::{debug, info};

const IMPORTS: [&str; 6] = [
    "google/api/annotations.proto",
    "google/api/client.proto",
    "google/api/field_behavior.proto",
    "google/api/field_mask.proto",
    "google/api/resource.proto",
    "google/protobuf/empty.proto",
];

/// Names derived from the record that recur throughout the document
struct Names<'s> {
    /// Display name, e.g. `Post`
    record: &'s str,
    /// Lowercase name, e.g. `post`
    lower: String,
    /// Route collection, e.g. `posts`
    plural: String,
    pk: &'s str,
}

impl<'s> Names<'s> {
    fn new(schema: &'s RecordSchema) -> Self {
        Self {
            record: &schema.name,
            lower: schema.lower_name(),
            plural: schema.plural_alias(),
            pk: schema.pk_name(),
        }
    }
}

/// Generates the service and message definitions for one record
pub struct ProtoGenerator<'a> {
    registry: &'a SchemaRegistry,
    schema: &'a RecordSchema,
    config: GeneratorConfig,
    mapper: ScalarTypeMapper,
}

impl<'a> ProtoGenerator<'a> {
    pub fn new(
        registry: &'a SchemaRegistry,
        reference: &str,
        config: GeneratorConfig,
    ) -> Result<Self> {
        config.validate()?;
        let schema = registry.lookup(reference)?;
        let mapper = ScalarTypeMapper::with_overrides(config.scalar_overrides.clone());
        Ok(Self {
            registry,
            schema,
            config,
            mapper,
        })
    }

    pub fn schema(&self) -> &RecordSchema {
        self.schema
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn package(&self) -> String {
        self.config
            .package
            .clone()
            .unwrap_or_else(|| self.schema.plural_alias())
    }

    /// Requested field names with duplicates removed, first occurrence kept.
    /// An empty request falls back to the record's default list.
    pub fn field_names(&self) -> Vec<String> {
        let requested = match &self.config.field_names {
            Some(names) if !names.is_empty() => names.clone(),
            _ => self.schema.default_field_names(),
        };
        let mut seen = Vec::with_capacity(requested.len());
        for name in requested {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        seen
    }

    /// The effective field list with each field's IDL type
    pub fn fields(&self) -> Result<Vec<(String, ResolvedType)>> {
        self.ensure_concrete()?;
        let resolver = self.resolver();
        self.field_names()
            .into_iter()
            .map(|name| {
                let resolved = resolver.resolve(&name, self.schema)?;
                debug!("{}.{} -> {}", self.schema.name, name, resolved);
                Ok((name, resolved))
            })
            .collect()
    }

    pub fn generate(&self) -> Result<String> {
        self.ensure_concrete()?;
        let names = Names::new(self.schema);
        let operation = self.config.operation;
        let mut writer = IdlWriter::new();

        self.write_header(&mut writer);
        self.write_service(&mut writer, &names);
        writer.blank_line();
        self.write_record_message(&mut writer, &names)?;

        let pk_type = self.resolver().resolve(names.pk, self.schema)?;
        if operation.includes(Operation::List) {
            writer.blank_line();
            write_list_response(&mut writer, &names);
            writer.blank_line();
            write_list_request(&mut writer, &names);
        }
        if operation.includes(Operation::Create) {
            writer.blank_line();
            write_create_request(&mut writer, &names);
        }
        if operation.includes(Operation::Update) {
            writer.blank_line();
            write_update_request(&mut writer, &names);
        }
        if operation.includes(Operation::Delete) {
            writer.blank_line();
            write_delete_request(&mut writer, &names, &pk_type);
        }
        if operation.includes(Operation::Retrieve) {
            writer.blank_line();
            write_get_request(&mut writer, &names, &pk_type);
        }

        info!(
            "Generated {} proto for {} (package {})",
            operation,
            self.schema.qualified_name(),
            self.package()
        );
        Ok(writer.into_code())
    }

    fn resolver(&self) -> RelationResolver<'_> {
        RelationResolver::new(self.registry, &self.mapper, self.config.max_relation_depth)
    }

    fn ensure_concrete(&self) -> Result<()> {
        if self.schema.is_abstract {
            return Err(CodegenError::AbstractSchema {
                schema: self.schema.name.clone(),
            });
        }
        Ok(())
    }

    fn write_header(&self, writer: &mut IdlWriter) {
        writer.write_line("syntax = \"proto3\";");
        writer.blank_line();
        writer.write_line(&format!("package {};", self.package()));
        writer.blank_line();
        for import in IMPORTS {
            writer.write_line(&format!("import \"{}\";", import));
        }
        writer.blank_line();
    }

    fn write_service(&self, writer: &mut IdlWriter, names: &Names<'_>) {
        let operation = self.config.operation;
        let record = names.record;
        let collection = format!("/{}", names.plural);
        let member = format!("/{}/{}", names.plural, names.pk);

        writer.block(&format!("service {}Controller", record), |w| {
            if operation.includes(Operation::List) {
                write_rpc(
                    w,
                    &format!("rpc List(List{r}sRequest) returns (List{r}sResponse)", r = record),
                    &[format!("get: \"{}\"", collection)],
                    None,
                );
            }
            if operation.includes(Operation::Create) {
                write_rpc(
                    w,
                    &format!("rpc Create(Create{r}Request) returns ({r})", r = record),
                    &[
                        format!("post: \"{}\"", collection),
                        format!("body: \"{}\"", names.lower),
                    ],
                    Some(names.lower.as_str()),
                );
            }
            if operation.includes(Operation::Retrieve) {
                write_rpc(
                    w,
                    &format!("rpc Retrieve(Get{r}Request) returns ({r})", r = record),
                    &[format!("get: \"{}\"", member)],
                    Some(names.pk),
                );
            }
            if operation.includes(Operation::Update) {
                write_rpc(
                    w,
                    &format!("rpc Update(Update{r}Request) returns ({r})", r = record),
                    &[
                        format!("patch: \"{}\"", member),
                        format!("body: \"{}\"", names.lower),
                    ],
                    Some(format!("{},update_mask", names.lower).as_str()),
                );
            }
            if operation.includes(Operation::Delete) {
                write_rpc(
                    w,
                    &format!(
                        "rpc Destroy(Delete{}Request) returns (google.protobuf.Empty)",
                        record
                    ),
                    &[format!("delete: \"{}\"", member)],
                    Some(names.pk),
                );
            }
        });
    }

    fn write_record_message(&self, writer: &mut IdlWriter, names: &Names<'_>) -> Result<()> {
        let resolver = self.resolver();
        let field_names = self.field_names();
        writer.try_block(&format!("message {}", names.record), |w| -> Result<()> {
            for (number, name) in field_names.iter().enumerate() {
                let resolved = resolver.resolve(name, self.schema)?;
                debug!("{}.{} -> {}", names.record, name, resolved);
                w.write_line(&format!("{} {} = {};", resolved, name, number + 1));
            }
            Ok(())
        })
    }
}

fn write_rpc(writer: &mut IdlWriter, signature: &str, http: &[String], method_signature: Option<&str>) {
    writer.block(signature, |w| {
        w.block("option (google.api.http) =", |w| {
            for line in http {
                w.write_line(line);
            }
        });
        if let Some(fields) = method_signature {
            w.write_line(&format!(
                "option (google.api.method_signature) = \"{}\";",
                fields
            ));
        }
    });
}

fn write_list_response(writer: &mut IdlWriter, names: &Names<'_>) {
    writer.block(&format!("message List{}sResponse", names.record), |w| {
        w.write_line(&format!("// The {}.", names.plural));
        w.write_line(&format!("repeated {} {} = 1;", names.record, names.plural));
        w.blank_line();
        w.write_line("// A token, which can be sent as `page_token` to retrieve the next page.");
        w.write_line("// If this field is omitted, there are no subsequent pages.");
        w.write_line("string next_page_token = 2;");
    });
}

fn write_list_request(writer: &mut IdlWriter, names: &Names<'_>) {
    writer.block(&format!("message List{}sRequest", names.record), |w| {
        w.write_line(&format!("// The maximum number of {} to return.", names.plural));
        w.write_line("// The service may return fewer than this value.");
        w.write_line(&format!(
            "// If unspecified, at most 50 {} will be returned.",
            names.plural
        ));
        w.write_line("// The maximum value is 1000; values above 1000 will be coerced to 1000.");
        w.write_line("int32 page_size = 1;");
        w.blank_line();
        w.write_line("// A page token, received from a previous `List` call.");
        w.write_line("// Provide this to retrieve the subsequent page.");
        w.write_line("// When paginating, all other parameters provided to `List` must match");
        w.write_line("// the call that provided the page token.");
        w.write_line("string page_token = 2;");
        w.blank_line();
        w.write_line("int32 skip = 3;");
        w.blank_line();
        w.write_line("string order_by = 4;");
        w.blank_line();
        w.write_line("string filter = 5;");
        w.blank_line();
        w.write_line("bool show_deleted = 6;");
    });
}

fn write_create_request(writer: &mut IdlWriter, names: &Names<'_>) {
    writer.block(&format!("message Create{}Request", names.record), |w| {
        w.write_line(&format!("// The {} to create.", names.lower));
        w.write_line(&format!(
            "{} {} = 1 [(google.api.field_behavior) = REQUIRED];",
            names.record, names.lower
        ));
    });
}

fn write_update_request(writer: &mut IdlWriter, names: &Names<'_>) {
    writer.block(&format!("message Update{}Request", names.record), |w| {
        w.write_line(&format!("// The {} to update.", names.lower));
        w.write_line(&format!(
            "{} {} = 1 [(google.api.field_behavior) = REQUIRED];",
            names.record, names.lower
        ));
        w.blank_line();
        w.write_line("// The list of fields to update.");
        w.write_line("google.protobuf.FieldMask update_mask = 2;");
    });
}

fn write_delete_request(writer: &mut IdlWriter, names: &Names<'_>, pk_type: &ResolvedType) {
    writer.block(&format!("message Delete{}Request", names.record), |w| {
        w.write_line(&format!("// The {} to delete.", names.lower));
        w.write_line(&format!("{} {} = 1 [", pk_type, names.pk));
        {
            let mut options = w.indent();
            options.write_line("(google.api.field_behavior) = REQUIRED,");
            options.write_line("(google.api.resource_reference) = {");
            options.indent().write_line(&format!("type: \"{}\"", names.record));
            options.write_line("}];");
        }
    });
}

fn write_get_request(writer: &mut IdlWriter, names: &Names<'_>, pk_type: &ResolvedType) {
    writer.block(&format!("message Get{}Request", names.record), |w| {
        w.write_line(&format!("{} {} = 1;", pk_type, names.pk));
    });
}
