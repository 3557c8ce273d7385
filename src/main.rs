use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use prost::Message;
use protoc_gen_mongoose::config::Target;
use protoc_gen_mongoose::error::Result;
use protoc_gen_mongoose::{codegen, descriptor, schema};
use tracing_subscriber::filter::EnvFilter;

/// Generate Mongoose schemas from Protocol Buffer messages.
///
/// Run without a subcommand, this is a protoc plugin: it reads a
/// CodeGeneratorRequest from stdin and writes a CodeGeneratorResponse to
/// stdout. The subcommands work on a descriptor set produced by
/// `protoc --include_imports -o set.pb`.
#[derive(Parser)]
#[command(name = "protoc-gen-mongoose", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate schema files from a serialized FileDescriptorSet.
    Generate {
        /// Path to the descriptor set.
        #[arg(long)]
        descriptor_set: PathBuf,

        /// Output directory for generated schema files.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Output language.
        #[arg(long, value_enum, default_value_t = Target::TypeScript)]
        target: Target,

        /// Only generate for these .proto files (repeatable).
        /// Every file in the set is generated when omitted.
        #[arg(long = "file")]
        files: Vec<String>,

        /// Suppress non-error output.
        #[arg(long, short)]
        quiet: bool,
    },

    /// Print the resolved message model as JSON.
    Inspect {
        /// Path to the descriptor set.
        #[arg(long)]
        descriptor_set: PathBuf,

        /// Only include these .proto files (repeatable).
        #[arg(long = "file")]
        files: Vec<String>,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");

        // Print cause chain.
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = std::error::Error::source(cause);
        }

        process::exit(1);
    }
}

/// Diagnostics go to stderr; stdout belongs to the plugin response.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: could not install logger: {e}");
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => run_plugin(),

        Some(Commands::Generate {
            descriptor_set,
            output_dir,
            target,
            files,
            quiet,
        }) => {
            if !quiet {
                eprintln!("Loading descriptor set from {}", descriptor_set.display());
            }
            let pool = descriptor::load_descriptor_set(&descriptor_set)?;
            let ingested = schema::ingest(&pool, &files)?;
            let (artifacts, stats) = codegen::generate(&ingested, target);
            codegen::write_artifacts(&output_dir, &artifacts)?;

            if !quiet {
                eprintln!(
                    "Generated {} schemas from {} files into {}",
                    stats.schemas_generated,
                    stats.files_processed,
                    output_dir.display()
                );
                if stats.files_skipped > 0 {
                    eprintln!(
                        "Skipped {} files (no messages or options declarations)",
                        stats.files_skipped
                    );
                }
                eprintln!("Done.");
            }
            Ok(())
        }

        Some(Commands::Inspect {
            descriptor_set,
            files,
        }) => {
            let pool = descriptor::load_descriptor_set(&descriptor_set)?;
            let ingested = schema::ingest(&pool, &files)?;
            println!("{}", serde_json::to_string_pretty(&ingested.files)?);
            Ok(())
        }
    }
}

/// protoc plugin protocol: request on stdin, response on stdout.
///
/// A fatal error is reported both in the response, so protoc can show it,
/// and through the exit status.
fn run_plugin() -> Result<()> {
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    let (response, outcome) = match protoc_gen_mongoose::generate_from_bytes(&input) {
        Ok(response) => (response, Ok(())),
        Err(e) => (codegen::error_response(&e), Err(e)),
    };
    tracing::debug!(files = response.file.len(), "writing response");

    let mut stdout = io::stdout().lock();
    stdout.write_all(&response.encode_to_vec())?;
    stdout.flush()?;
    outcome
}
