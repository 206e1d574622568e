//! Inferred schema model and persistence.
//!
//! [`ColumnType`] is the closed set of SQL-ish types the inference engine can
//! produce. [`ColumnDescriptor`] carries one column's final decision (type,
//! optional varchar length, optional fractional precision) and [`Schema`] is
//! the ordered collection handed to the generators.
//!
//! Schemas can be saved to and loaded from YAML or JSON. Loading is lenient
//! about type labels: anything outside the closed set degrades to `varchar`.

use std::{
    fmt,
    fs::File,
    io::BufReader,
    path::Path,
    str::FromStr,
};

use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int,
    Float,
    Decimal,
    Date,
    Varchar,
    Text,
    Json,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Decimal => "decimal",
            ColumnType::Date => "date",
            ColumnType::Varchar => "varchar",
            ColumnType::Text => "text",
            ColumnType::Json => "json",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["int", "float", "decimal", "date", "varchar", "text", "json"]
    }

    /// Position in the promotion lattice; a wider type has a higher rank.
    pub fn rank(&self) -> u8 {
        match self {
            ColumnType::Json => 10,
            ColumnType::Text => 9,
            ColumnType::Varchar => 8,
            ColumnType::Date => 7,
            ColumnType::Decimal => 6,
            ColumnType::Float => 5,
            ColumnType::Int => 4,
        }
    }

    /// Parses a type label, degrading anything unrecognised to `varchar`.
    pub fn from_label_lenient(label: &str) -> ColumnType {
        ColumnType::from_str(label).unwrap_or_else(|_| {
            warn!("Unknown column type '{label}', treating it as varchar");
            ColumnType::Varchar
        })
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "int" | "integer" => Ok(ColumnType::Int),
            "float" => Ok(ColumnType::Float),
            "decimal" => Ok(ColumnType::Decimal),
            "date" => Ok(ColumnType::Date),
            "varchar" | "string" => Ok(ColumnType::Varchar),
            "text" => Ok(ColumnType::Text),
            "json" => Ok(ColumnType::Json),
            _ => Err(anyhow!(
                "Unknown column type '{value}'. Supported types: {}",
                ColumnType::variants().join(", ")
            )),
        }
    }
}

impl Serialize for ColumnType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(ColumnType::from_label_lenient(&label))
    }
}

/// Final inferred shape of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl ColumnDescriptor {
    pub fn new(
        name: impl Into<String>,
        column_type: ColumnType,
        length: Option<u32>,
        precision: Option<u32>,
    ) -> Self {
        Self {
            name: name.into(),
            column_type,
            length,
            precision,
        }
    }

    /// Generic (MySQL flavoured) column definition used for reporting.
    pub fn sql_definition(&self) -> String {
        match self.column_type {
            ColumnType::Varchar => format!("VARCHAR({})", self.length.unwrap_or(255)),
            ColumnType::Float => format!("FLOAT({})", self.precision.unwrap_or(2)),
            ColumnType::Decimal => format!("DECIMAL(10,{})", self.precision.unwrap_or(2)),
            ColumnType::Int => "INT".to_string(),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Json => "JSON".to_string(),
            ColumnType::Date => "DATE".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnDescriptor>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating schema file {path:?}"))?;
        if is_json_path(path) {
            serde_json::to_writer_pretty(file, self).context("Writing schema JSON")
        } else {
            serde_yaml::to_writer(file, self).context("Writing schema YAML")
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening schema file {path:?}"))?;
        let reader = BufReader::new(file);
        if is_json_path(path) {
            serde_json::from_reader(reader).context("Parsing schema JSON")
        } else {
            serde_yaml::from_reader(reader).context("Parsing schema YAML")
        }
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing schema to YAML string")
    }
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
