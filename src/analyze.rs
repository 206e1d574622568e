use anyhow::{Context, Result, anyhow};
use log::info;

use crate::{
    cli::{AnalyzeArgs, InputArgs, SourceArgs},
    infer,
    input::{self, LoadOptions},
    io_utils,
    schema::Schema,
    table,
};

const REPORT_HEADERS: [&str; 5] = ["Column", "Type", "Length", "Precision", "SQL Definition"];

pub fn execute(args: &AnalyzeArgs) -> Result<()> {
    let schema = infer_from_input(&args.input)?;

    println!("Analysis of {}:", args.input.input.display());
    println!();
    table::print_table(&REPORT_HEADERS, &report_rows(&schema));

    if let Some(output) = &args.output {
        schema
            .save(output)
            .with_context(|| format!("Writing schema to {output:?}"))?;
        info!(
            "Inferred schema for {} column(s) written to {:?}",
            schema.len(),
            output
        );
    }
    Ok(())
}

pub fn report_rows(schema: &Schema) -> Vec<Vec<String>> {
    let or_na = |value: Option<u32>| value.map_or_else(|| "N/A".to_string(), |v| v.to_string());
    schema
        .columns
        .iter()
        .map(|column| {
            vec![
                column.name.clone(),
                column.column_type.to_string(),
                or_na(column.length),
                or_na(column.precision),
                column.sql_definition(),
            ]
        })
        .collect()
}

pub fn infer_from_input(args: &InputArgs) -> Result<Schema> {
    infer_from_path(
        &args.input,
        args.delimiter,
        args.input_encoding.as_deref(),
    )
}

/// Loads the schema a generator works from: either a saved schema file or a
/// freshly inferred one.
pub fn resolve_schema(source: &SourceArgs) -> Result<Schema> {
    if let Some(path) = &source.schema {
        let schema =
            Schema::load(path).with_context(|| format!("Loading schema from {path:?}"))?;
        info!("Loaded {} column(s) from {:?}", schema.len(), path);
        return Ok(schema);
    }
    let input = source
        .input
        .as_deref()
        .ok_or_else(|| anyhow!("Either --input or --schema is required"))?;
    infer_from_path(input, source.delimiter, source.input_encoding.as_deref())
}

fn infer_from_path(
    path: &std::path::Path,
    delimiter: Option<u8>,
    encoding: Option<&str>,
) -> Result<Schema> {
    let options = LoadOptions {
        delimiter,
        encoding: io_utils::resolve_encoding(encoding)?,
    };
    info!("Analyzing {path:?}");
    let dataset = input::load_dataset(path, &options)
        .with_context(|| format!("Reading sample data from {path:?}"))?;
    let schema = infer::analyze(&dataset);
    info!(
        "Inferred {} column(s) from {} row(s)",
        schema.len(),
        dataset.row_count()
    );
    Ok(schema)
}
