//! CREATE TABLE generation for MySQL, SQL Server, and PostgreSQL.
//!
//! Identifiers are quoted per dialect; embedded quote characters are escaped
//! by doubling them. Every table gets nullable `created_at` / `updated_at`
//! columns to match the generated migrations.

use clap::ValueEnum;

use crate::schema::{ColumnDescriptor, ColumnType, Schema};

const DEFAULT_VARCHAR_LENGTH: u32 = 255;
const DEFAULT_PRECISION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lower")]
pub enum SqlDialect {
    #[value(alias = "mariadb")]
    Mysql,
    #[value(alias = "mssql")]
    Sqlserver,
    #[value(alias = "postgres")]
    Postgresql,
}

impl SqlDialect {
    pub fn all() -> [SqlDialect; 3] {
        [SqlDialect::Mysql, SqlDialect::Sqlserver, SqlDialect::Postgresql]
    }

    /// Suffix used when naming generated `.sql` files.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            SqlDialect::Mysql => "mysql",
            SqlDialect::Sqlserver => "sqlserver",
            SqlDialect::Postgresql => "postgresql",
        }
    }

    pub fn quote_identifier(&self, name: &str) -> String {
        match self {
            SqlDialect::Mysql => format!("`{}`", name.replace('`', "``")),
            SqlDialect::Sqlserver => format!("[{}]", name.replace(']', "]]")),
            SqlDialect::Postgresql => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    pub fn column_type(&self, column: &ColumnDescriptor) -> String {
        let length = column.length.unwrap_or(DEFAULT_VARCHAR_LENGTH);
        let precision = column.precision.unwrap_or(DEFAULT_PRECISION);
        match (self, column.column_type) {
            (SqlDialect::Mysql, ColumnType::Varchar) => format!("VARCHAR({length})"),
            (SqlDialect::Mysql, ColumnType::Text) => "TEXT".to_string(),
            (SqlDialect::Mysql, ColumnType::Int) => "INT".to_string(),
            (SqlDialect::Mysql, ColumnType::Float) => format!("FLOAT({precision})"),
            (SqlDialect::Mysql, ColumnType::Json) => "JSON".to_string(),

            (SqlDialect::Sqlserver, ColumnType::Varchar) => format!("NVARCHAR({length})"),
            (SqlDialect::Sqlserver, ColumnType::Text) => "NTEXT".to_string(),
            (SqlDialect::Sqlserver, ColumnType::Int) => "INT".to_string(),
            (SqlDialect::Sqlserver, ColumnType::Float) => format!("FLOAT({precision})"),
            (SqlDialect::Sqlserver, ColumnType::Json) => "NVARCHAR(MAX)".to_string(),

            (SqlDialect::Postgresql, ColumnType::Varchar) => format!("VARCHAR({length})"),
            (SqlDialect::Postgresql, ColumnType::Text) => "TEXT".to_string(),
            (SqlDialect::Postgresql, ColumnType::Int) => "INTEGER".to_string(),
            (SqlDialect::Postgresql, ColumnType::Float) => "REAL".to_string(),
            (SqlDialect::Postgresql, ColumnType::Json) => "JSONB".to_string(),

            (_, ColumnType::Decimal) => format!("DECIMAL(10,{precision})"),
            (_, ColumnType::Date) => "DATE".to_string(),
        }
    }

    fn timestamp_type(&self) -> &'static str {
        match self {
            SqlDialect::Mysql => "TIMESTAMP NULL DEFAULT NULL",
            SqlDialect::Sqlserver => "DATETIME2 NULL",
            SqlDialect::Postgresql => "TIMESTAMP NULL",
        }
    }
}

pub fn create_table(dialect: SqlDialect, table: &str, schema: &Schema) -> String {
    let mut columns = schema
        .columns
        .iter()
        .map(|column| {
            format!(
                "{} {}",
                dialect.quote_identifier(&column.name),
                dialect.column_type(column)
            )
        })
        .collect::<Vec<_>>();
    for stamp in ["created_at", "updated_at"] {
        columns.push(format!(
            "{} {}",
            dialect.quote_identifier(stamp),
            dialect.timestamp_type()
        ));
    }
    format!(
        "CREATE TABLE {} (\n    {}\n);",
        dialect.quote_identifier(table),
        columns.join(",\n    ")
    )
}
