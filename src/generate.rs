//! Artifact-writing commands: migration, model, SQL, and the combined
//! `generate` run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use heck::{ToSnakeCase, ToUpperCamelCase};
use log::info;

use crate::{
    analyze::resolve_schema,
    cli::{GenerateArgs, MigrationArgs, ModelArgs, SqlArgs},
    io_utils, migration, model,
    schema::Schema,
    sql::{self, SqlDialect},
};

pub const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

pub fn execute_migration(args: &MigrationArgs) -> Result<()> {
    let schema = resolve_schema(&args.source)?;
    let path = write_migration(
        &args.database_dir,
        &timestamp(),
        &args.table,
        &schema,
        args.class_name.as_deref(),
    )?;
    info!("Migration created: {}", path.display());
    Ok(())
}

pub fn execute_model(args: &ModelArgs) -> Result<()> {
    let schema = resolve_schema(&args.source)?;
    let path = write_model(&args.models_dir, &args.name, &schema, args.table.as_deref())?;
    info!("Model created: {}", path.display());
    Ok(())
}

pub fn execute_sql(args: &SqlArgs) -> Result<()> {
    let schema = resolve_schema(&args.source)?;
    let statement = sql::create_table(args.dialect, &args.table, &schema);
    match &args.output {
        Some(path) => {
            io_utils::write_text(path, &statement)?;
            info!(
                "{} SQL written to {}",
                args.dialect.file_suffix(),
                path.display()
            );
        }
        None => println!("{statement}"),
    }
    Ok(())
}

pub fn execute(args: &GenerateArgs) -> Result<()> {
    let source_path = args
        .source
        .path()
        .ok_or_else(|| anyhow!("Either --input or --schema is required"))?;
    let table = match &args.table {
        Some(table) => table.clone(),
        None => {
            let table = default_table_name(source_path)?;
            info!("Using table name: {table}");
            table
        }
    };
    let model_name = match &args.model {
        Some(model) => model.clone(),
        None => {
            let model = default_model_name(&table);
            info!("Using model name: {model}");
            model
        }
    };

    let schema = resolve_schema(&args.source)?;
    let stamp = timestamp();

    let migration_path =
        write_migration(&args.database_dir, &stamp, &table, &schema, None)?;
    info!("Migration created: {}", migration_path.display());

    for dialect in SqlDialect::all() {
        let path = sql_path(&args.database_dir, &stamp, &table, dialect);
        io_utils::write_text(&path, &sql::create_table(dialect, &table, &schema))?;
        info!("SQL file created: {}", path.display());
    }

    let model_path = write_model(&args.models_dir, &model_name, &schema, Some(&table))?;
    info!("Model created: {}", model_path.display());
    Ok(())
}

/// Table name derived from a sample file name, e.g. `Order-Items.json`
/// becomes `order_items`.
pub fn default_table_name(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| anyhow!("Cannot derive a table name from {path:?}"))?;
    let table = stem.to_snake_case();
    if table.is_empty() {
        return Err(anyhow!("Cannot derive a table name from {path:?}"));
    }
    Ok(table)
}

pub fn default_model_name(table: &str) -> String {
    table.to_upper_camel_case()
}

pub fn sql_path(database_dir: &Path, stamp: &str, table: &str, dialect: SqlDialect) -> PathBuf {
    database_dir.join("raw").join(format!(
        "{stamp}_create_{table}_table_{}.sql",
        dialect.file_suffix()
    ))
}

fn write_migration(
    database_dir: &Path,
    stamp: &str,
    table: &str,
    schema: &Schema,
    class_name: Option<&str>,
) -> Result<PathBuf> {
    let path = database_dir
        .join("migrations")
        .join(migration::file_name(stamp, table));
    io_utils::write_text(&path, &migration::render(table, schema, class_name))
        .with_context(|| format!("Writing migration for table '{table}'"))?;
    Ok(path)
}

fn write_model(
    models_dir: &Path,
    name: &str,
    schema: &Schema,
    table: Option<&str>,
) -> Result<PathBuf> {
    let path = models_dir.join(format!("{name}.php"));
    io_utils::write_text(&path, &model::render(name, schema, table))
        .with_context(|| format!("Writing model '{name}'"))?;
    Ok(path)
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
