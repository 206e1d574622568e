//! Eloquent model generation.

use crate::{
    migration::php_string,
    schema::{ColumnType, Schema},
};

/// Table name used when a model is generated without one: the lower-cased
/// model name with a trailing `s`.
pub fn default_table_name(model: &str) -> String {
    format!("{}s", model.to_lowercase())
}

/// Attribute cast for a column, if Eloquent needs one.
pub fn eloquent_cast(column_type: ColumnType, precision: Option<u32>) -> Option<String> {
    match column_type {
        ColumnType::Int => Some("integer".to_string()),
        ColumnType::Float | ColumnType::Decimal => {
            Some(format!("decimal:{}", precision.unwrap_or(2)))
        }
        ColumnType::Date => Some("date".to_string()),
        ColumnType::Json => Some("array".to_string()),
        ColumnType::Varchar | ColumnType::Text => None,
    }
}

pub fn php_type(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Int => "int",
        ColumnType::Float | ColumnType::Decimal => "float",
        ColumnType::Json => "array",
        ColumnType::Date | ColumnType::Varchar | ColumnType::Text => "string",
    }
}

pub fn render(model: &str, schema: &Schema, table: Option<&str>) -> String {
    let table = table
        .map(str::to_string)
        .unwrap_or_else(|| default_table_name(model));

    let properties = schema
        .columns
        .iter()
        .map(|column| format!(" * @property {} ${}\n", php_type(column.column_type), column.name))
        .collect::<String>();
    let class_doc = if properties.is_empty() {
        String::new()
    } else {
        format!(" *\n{properties} *\n")
    };

    let fillable = schema
        .columns
        .iter()
        .map(|column| format!("        {},\n", php_string(&column.name)))
        .collect::<String>();

    let casts = schema
        .columns
        .iter()
        .filter_map(|column| {
            eloquent_cast(column.column_type, column.precision).map(|cast| {
                format!("        {} => {},\n", php_string(&column.name), php_string(&cast))
            })
        })
        .collect::<String>();

    let table_literal = php_string(&table);
    format!(
        r#"<?php

namespace App\Models;

use Illuminate\Database\Eloquent\Model;

/**
 * {model} model.
{class_doc} */
class {model} extends Model
{{
    /**
     * The table associated with the model.
     *
     * @var string
     */
    protected $table = {table_literal};

    /**
     * The attributes that are mass assignable.
     *
     * @var array<int, string>
     */
    protected $fillable = [
{fillable}    ];

    /**
     * The attributes that should be cast.
     *
     * @var array<string, string>
     */
    protected $casts = [
{casts}    ];
}}
"#
    )
}
