use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::sql::SqlDialect;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Infer database schemas from JSON/CSV samples",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze a JSON/CSV file and show the recommended database structure
    Analyze(AnalyzeArgs),
    /// Generate a Laravel migration from a JSON/CSV file or saved schema
    Migration(MigrationArgs),
    /// Generate an Eloquent model from a JSON/CSV file or saved schema
    Model(ModelArgs),
    /// Print a CREATE TABLE statement for one SQL dialect
    Sql(SqlArgs),
    /// Generate the migration, per-dialect SQL files, and the model together
    Generate(GenerateArgs),
    /// Convert between Azure App Settings JSON and .env files
    EnvConvert(EnvConvertArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// JSON, CSV, or TSV sample file to analyze
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

/// Where a generator takes its schema from: a sample file to analyze, or a
/// schema previously saved by `analyze --output`.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// JSON, CSV, or TSV sample file to analyze
    #[arg(
        short = 'i',
        long = "input",
        required_unless_present = "schema",
        conflicts_with = "schema"
    )]
    pub input: Option<PathBuf>,
    /// Saved schema file (.yml/.yaml or .json) to use instead of analyzing a sample
    #[arg(long)]
    pub schema: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

impl SourceArgs {
    /// The file the schema comes from, whichever flag supplied it.
    pub fn path(&self) -> Option<&Path> {
        self.input.as_deref().or(self.schema.as_deref())
    }
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Save the inferred schema (.yml/.yaml or .json)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct MigrationArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Table name
    #[arg(short = 't', long = "table")]
    pub table: String,
    /// Migration class name (defaults to Create<Table>Table)
    #[arg(long = "class")]
    pub class_name: Option<String>,
    /// Directory holding migrations/ and raw/
    #[arg(long = "database-dir", default_value = "database")]
    pub database_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct ModelArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Model class name
    #[arg(short = 'n', long = "name")]
    pub name: String,
    /// Table name (defaults to the lower-cased model name plus 's')
    #[arg(short = 't', long = "table")]
    pub table: Option<String>,
    /// Directory for generated model classes
    #[arg(long = "models-dir", default_value = "app/Models")]
    pub models_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct SqlArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Table name
    #[arg(short = 't', long = "table")]
    pub table: String,
    /// Target SQL dialect
    #[arg(long, value_enum, default_value = "mysql")]
    pub dialect: SqlDialect,
    /// Output .sql file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Table name (defaults to the snake_case file name)
    #[arg(short = 't', long = "table")]
    pub table: Option<String>,
    /// Model name (defaults to the PascalCase table name)
    #[arg(short = 'n', long = "model")]
    pub model: Option<String>,
    /// Directory holding migrations/ and raw/
    #[arg(long = "database-dir", default_value = "database")]
    pub database_dir: PathBuf,
    /// Directory for generated model classes
    #[arg(long = "models-dir", default_value = "app/Models")]
    pub models_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
#[value(rename_all = "kebab-case")]
pub enum ConvertDirection {
    AzureToEnv,
    EnvToAzure,
}

#[derive(Debug, Args)]
pub struct EnvConvertArgs {
    /// Conversion direction
    #[arg(value_enum)]
    pub direction: ConvertDirection,
    /// Azure App Settings JSON file
    #[arg(long = "azure-file", default_value = "azure-settings.json")]
    pub azure_file: PathBuf,
    /// Environment file
    #[arg(long = "env-file", default_value = ".env")]
    pub env_file: PathBuf,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
