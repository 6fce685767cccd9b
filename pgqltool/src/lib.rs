#![forbid(unsafe_code)]

use std::{
    fs::File,
    io::{BufReader, Write, stdout},
    path::{Path, PathBuf},
};

use clap::{Args, Parser, Subcommand};
use pgql_compiler::{
    CompileConfig, CompileError, MetadataSnapshot,
    config::DEFAULT_SCHEMA_NAME,
    metadata::{COLUMNS_QUERY, FOREIGN_KEYS_QUERY},
};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// This environment variable is used to control logs.
const LOG_ENV_VAR: &str = "LOG";

/// pgqltool – PostgreSQL metadata to GraphQL schema tool
#[derive(Parser)]
#[command(version, about, arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that a metadata snapshot compiles
    Check(Source),
    /// Generate a GraphQL schema from a metadata snapshot
    Generate(Generate),
    /// Print the queries that produce a metadata snapshot
    IntrospectionSql,
}

#[derive(Args)]
#[command(arg_required_else_help(true))]
pub struct Source {
    /// Metadata snapshot file: {"columns": [...], "foreign_keys": [...]}
    pub metadata: PathBuf,

    /// Database schema the tables live in
    #[arg(short('s'), long, default_value = DEFAULT_SCHEMA_NAME)]
    pub schema_name: String,

    /// Table to leave out of the schema, may be repeated
    #[arg(short('x'), long = "exclude-table")]
    pub exclude_tables: Vec<String>,
}

impl Source {
    fn config(&self) -> CompileConfig {
        CompileConfig {
            schema_name: self.schema_name.clone(),
            exclude_tables: self.exclude_tables.clone(),
        }
    }
}

#[derive(Args)]
#[command(arg_required_else_help(true))]
pub struct Generate {
    #[command(flatten)]
    pub source: Source,

    /// Schema output file, stdout if not given
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum PgqlToolError {
    #[error("{0}")]
    Compile(#[from] CompileError),
    #[error("{0:?}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("{0}")]
    IO(#[from] std::io::Error),
}

pub fn run() -> Result<(), PgqlToolError> {
    let cli = Cli::parse();

    init_tracing();

    if let Some(command) = cli.command {
        run_command(command, &mut stdout().lock())
    } else {
        Ok(())
    }
}

pub fn run_command(command: Command, out: &mut impl Write) -> Result<(), PgqlToolError> {
    match command {
        Command::Check(source) => {
            compile(&source)?;
            writeln!(out, "No errors found.")?;
        }
        Command::Generate(args) => {
            let artifact = compile(&args.source)?;

            match args.output {
                Some(path) => {
                    write_file(&path, &artifact)?;
                    info!("schema written to {}", path.display());
                }
                None => out.write_all(artifact.as_bytes())?,
            }
        }
        Command::IntrospectionSql => {
            writeln!(out, "-- columns\n{COLUMNS_QUERY}")?;
            writeln!(out, "-- foreign keys\n{FOREIGN_KEYS_QUERY}")?;
        }
    }

    Ok(())
}

fn compile(source: &Source) -> Result<String, PgqlToolError> {
    let config = source.config();
    let snapshot: MetadataSnapshot =
        serde_json::from_reader(BufReader::new(File::open(&source.metadata)?))?;

    info!(
        "{}: {} columns, {} foreign keys",
        source.metadata.display(),
        snapshot.columns.len(),
        snapshot.foreign_keys.len()
    );

    let catalog = snapshot.into_catalog(&config);
    Ok(pgql_compiler::generate(&catalog, &config)?)
}

/// Replace `path` in one step, an interrupted write never leaves a partial schema.
fn write_file(path: &Path, contents: &str) -> Result<(), PgqlToolError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.persist(path).map_err(|err| err.error)?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var(LOG_ENV_VAR)
                .from_env_lossy(),
        )
        .init();
}
