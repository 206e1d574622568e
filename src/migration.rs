//! Laravel migration generation.

use heck::ToUpperCamelCase;

use crate::schema::{ColumnDescriptor, ColumnType, Schema};

pub fn default_class_name(table: &str) -> String {
    format!("Create{}Table", table.to_upper_camel_case())
}

/// File name for a migration created at `timestamp` (`%Y_%m_%d_%H%M%S`).
pub fn file_name(timestamp: &str, table: &str) -> String {
    format!("{timestamp}_create_{table}_table.php")
}

/// Blueprint call (without the `$table->` receiver) for one column.
pub fn blueprint_call(column: &ColumnDescriptor) -> String {
    let name = php_string(&column.name);
    match column.column_type {
        ColumnType::Varchar => match column.length {
            Some(length) => format!("string({name}, {length})"),
            None => format!("string({name})"),
        },
        ColumnType::Text => format!("text({name})"),
        ColumnType::Int => format!("integer({name})"),
        ColumnType::Float => match column.precision {
            Some(precision) => format!("float({name}, 8, {precision})"),
            None => format!("float({name})"),
        },
        ColumnType::Decimal => format!("decimal({name}, 10, {})", column.precision.unwrap_or(2)),
        ColumnType::Date => format!("date({name})"),
        ColumnType::Json => format!("json({name})"),
    }
}

/// Renders an anonymous-class migration that creates `table` and drops it on
/// rollback. `class_name` only labels the generated file's header comment.
pub fn render(table: &str, schema: &Schema, class_name: Option<&str>) -> String {
    let class_name = class_name
        .map(str::to_string)
        .unwrap_or_else(|| default_class_name(table));
    let table_literal = php_string(table);
    let columns = schema
        .columns
        .iter()
        .map(|column| format!("            $table->{};\n", blueprint_call(column)))
        .collect::<String>();

    format!(
        r#"<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

// {class_name}
return new class extends Migration
{{
    /**
     * Run the migrations.
     */
    public function up(): void
    {{
        Schema::create({table_literal}, function (Blueprint $table) {{
{columns}            $table->timestamps();
        }});
    }}

    /**
     * Reverse the migrations.
     */
    public function down(): void
    {{
        Schema::dropIfExists({table_literal});
    }}
}};
"#
    )
}

/// Single-quoted PHP string literal.
pub(crate) fn php_string(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
