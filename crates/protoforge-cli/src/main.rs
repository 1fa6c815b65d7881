use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "protoforge")]
#[command(about = "Generate CRUD protocol definitions from record schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the full and per-operation .proto files for a record
    Generate {
        /// Output root; `protos/` and `generated/` are created beneath it
        dir: Option<String>,

        /// Schema document(s) to load
        #[arg(long, required = true)]
        schema: Vec<PathBuf>,

        /// Dotted reference to the record, e.g. blog.Post
        #[arg(long)]
        model: String,

        /// Fields to include, comma-separated
        #[arg(long)]
        fields: Option<String>,

        /// Base name of the generated files (default: lowercase record name).
        /// Names that are not valid package identifiers only affect file names.
        #[arg(long)]
        filename: Option<String>,

        /// Generator config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the resolved field list of a record
    Fields {
        #[arg(long, required = true)]
        schema: Vec<PathBuf>,

        #[arg(long)]
        model: String,

        #[arg(long)]
        fields: Option<String>,

        /// Generator config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(&cli.log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate {
            dir,
            schema,
            model,
            fields,
            filename,
            config,
        } => {
            commands::generate(
                dir.as_deref(),
                &schema,
                &model,
                fields.as_deref(),
                filename.as_deref(),
                config.as_deref(),
            )?;
        }
        Commands::Fields {
            schema,
            model,
            fields,
            config,
            json,
        } => {
            commands::fields(&schema, &model, fields.as_deref(), config.as_deref(), json)?;
        }
    }

    Ok(())
}
