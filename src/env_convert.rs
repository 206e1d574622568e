//! Conversion between Azure App Service settings JSON and `.env` files.

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    cli::{ConvertDirection, EnvConvertArgs},
    io_utils,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSetting {
    pub name: String,
    pub value: Option<String>,
    #[serde(default)]
    pub slot_setting: bool,
}

pub fn execute(args: &EnvConvertArgs) -> Result<()> {
    match args.direction {
        ConvertDirection::AzureToEnv => {
            ensure_exists(&args.azure_file, "Azure settings file")?;
            let source = fs::read_to_string(&args.azure_file)
                .with_context(|| format!("Reading {:?}", args.azure_file))?;
            let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            let (contents, count) = azure_to_env(
                &source,
                &args.azure_file.display().to_string(),
                &generated_at,
            )?;
            io_utils::write_text(&args.env_file, &contents)?;
            info!(
                "Converted {count} setting(s) from {:?} into {:?}",
                args.azure_file, args.env_file
            );
        }
        ConvertDirection::EnvToAzure => {
            ensure_exists(&args.env_file, ".env file")?;
            let source = fs::read_to_string(&args.env_file)
                .with_context(|| format!("Reading {:?}", args.env_file))?;
            let settings = env_to_azure(&source);
            let json = serde_json::to_string_pretty(&settings)
                .context("Serializing Azure settings JSON")?;
            io_utils::write_text(&args.azure_file, &json)?;
            info!(
                "Converted {} setting(s) from {:?} into {:?}",
                settings.len(),
                args.env_file,
                args.azure_file
            );
        }
    }
    Ok(())
}

fn ensure_exists(path: &Path, label: &str) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(anyhow!("{label} not found: {}", path.display()))
    }
}

/// Renders Azure settings as `.env` lines. Returns the file contents and the
/// number of settings written.
pub fn azure_to_env(source: &str, source_label: &str, generated_at: &str) -> Result<(String, usize)> {
    let entries: Vec<Value> = serde_json::from_str(source)
        .map_err(|err| anyhow!("Invalid JSON in {source_label}: {err}"))?;

    let mut output = format!(
        "# Generated from Azure App Settings\n# Generated on: {generated_at}\n# Source file: {source_label}\n\n"
    );
    let mut count = 0usize;
    for entry in &entries {
        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            continue;
        };
        let Some(value) = entry.get("value") else {
            continue;
        };
        output.push_str(name);
        output.push('=');
        output.push_str(&env_value(value));
        output.push('\n');
        count += 1;
    }
    Ok((output, count))
}

fn env_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) if needs_quotes(text) => format!("\"{}\"", text.replace('"', "\\\"")),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn needs_quotes(text: &str) -> bool {
    text.contains([' ', '"', '\'', '#', '\\'])
}

pub fn env_to_azure(source: &str) -> Vec<AppSetting> {
    let mut settings = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            warn!("Skipping line {} without '=': {line}", idx + 1);
            continue;
        };
        let value = unquote(value.trim());
        settings.push(AppSetting {
            name: key.trim().to_string(),
            value: (!value.is_empty()).then_some(value),
            slot_setting: false,
        });
    }
    settings
}

fn unquote(value: &str) -> String {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        value[1..value.len() - 1].replace("\\\"", "\"")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn azure_entries_become_env_lines() {
        let source = r#"[
            {"name": "APP_NAME", "value": "Laravel", "slotSetting": false},
            {"name": "APP_DEBUG", "value": true},
            {"name": "GREETING", "value": "hello \"world\""},
            {"name": "EMPTY", "value": null},
            {"name": "PORT", "value": 8080},
            {"value": "orphan"},
            {"name": "NO_VALUE"}
        ]"#;
        let (env, count) = azure_to_env(source, "azure.json", "2024-01-01 00:00:00").unwrap();
        assert_eq!(count, 5);
        assert!(env.starts_with("# Generated from Azure App Settings\n"));
        assert!(env.contains("# Source file: azure.json\n\n"));
        assert!(env.contains("APP_NAME=Laravel\n"));
        assert!(env.contains("APP_DEBUG=true\n"));
        assert!(env.contains("GREETING=\"hello \\\"world\\\"\"\n"));
        assert!(env.contains("EMPTY=\n"));
        assert!(env.contains("PORT=8080\n"));
        assert!(!env.contains("NO_VALUE"));
    }

    #[test]
    fn invalid_azure_json_is_an_error() {
        let err = azure_to_env("{not json", "bad.json", "now").unwrap_err();
        assert!(err.to_string().contains("Invalid JSON in bad.json"));
    }

    #[test]
    fn env_lines_become_settings() {
        let source = "# comment\n\nAPP_NAME=Laravel\nQUOTED=\"a \\\"b\\\" c\"\nSINGLE='x y'\nEMPTY=\nURL=http://x?a=b\nbroken line\n";
        let settings = env_to_azure(source);
        assert_eq!(settings.len(), 5);
        assert_eq!(settings[0].name, "APP_NAME");
        assert_eq!(settings[0].value.as_deref(), Some("Laravel"));
        assert_eq!(settings[1].value.as_deref(), Some("a \"b\" c"));
        assert_eq!(settings[2].value.as_deref(), Some("x y"));
        assert_eq!(settings[3].value, None);
        assert_eq!(settings[4].value.as_deref(), Some("http://x?a=b"));
        assert!(settings.iter().all(|s| !s.slot_setting));
    }

    #[test]
    fn settings_serialize_with_camel_case() {
        let json = serde_json::to_string(&AppSetting {
            name: "A".to_string(),
            value: None,
            slot_setting: false,
        })
        .unwrap();
        assert_eq!(json, r#"{"name":"A","value":null,"slotSetting":false}"#);
    }
}
