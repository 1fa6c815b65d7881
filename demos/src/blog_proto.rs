use protoforge_codegen::{example_blog_schema, parse_schema, GeneratorConfig, Operation, ProtoGenerator};
use tracing::info;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let registry = parse_schema(&example_blog_schema())?;
    info!("Loaded {} record schemas", registry.len());

    for reference in ["blog.Post", "blog.Tag", "blog.Profile"] {
        let generator = ProtoGenerator::new(&registry, reference, GeneratorConfig::new())?;
        println!("// {}", reference);
        for (name, ty) in generator.fields()? {
            println!("//   {}: {}", name, ty);
        }
        println!("{}", generator.generate()?);
    }

    // Only the RPC and messages needed to fetch one post
    let config = GeneratorConfig::new()
        .with_operation(Operation::Retrieve)
        .with_package(Operation::Retrieve.package("posts"))
        .with_fields(["id", "title", "author"]);
    let proto = ProtoGenerator::new(&registry, "blog.Post", config)?.generate()?;
    println!("{}", proto);

    Ok(())
}
