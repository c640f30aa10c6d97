use anyhow::{Context, Result};
use passbook_ingest::ClassifierRule;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{ensure_passbook_home, passbook_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extract: ExtractSection,
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub classifier: ClassifierSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    /// Used when `--document-type` is not given
    pub document_type: String,
    /// Used when `--institution` is not given; "auto" runs the classifier
    pub institution: String,
    /// Pretty-print JSON responses
    pub pretty: bool,
}

impl Default for ExtractSection {
    fn default() -> Self {
        Self {
            document_type: "credit_card".to_string(),
            institution: "auto".to_string(),
            pretty: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// tracing filter directives; RUST_LOG takes precedence
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

/// Extra institution signatures, tried before the built-in ones
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierSection {
    #[serde(default)]
    pub rules: Vec<ClassifierRule>,
}

pub fn config_path() -> Result<PathBuf> {
    Ok(passbook_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = ensure_passbook_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use passbook_core::Institution;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.extract.institution, "auto");
        assert_eq!(cfg.extract.document_type, "credit_card");
        assert!(cfg.extract.pretty);
        assert_eq!(cfg.log.filter, "warn");
        assert!(cfg.classifier.rules.is_empty());
    }

    #[test]
    fn test_partial_sections_and_rules() {
        let cfg = parse_config(
            r#"
[extract]
document_type = "bank_statement"

[[classifier.rules]]
tag = "axis"
all_of = ["flipkart axis bank"]
"#,
        )
        .unwrap();
        assert_eq!(cfg.extract.document_type, "bank_statement");
        assert_eq!(cfg.extract.institution, "auto");
        assert_eq!(cfg.classifier.rules.len(), 1);
        assert_eq!(cfg.classifier.rules[0].tag, Institution::Axis);
    }

    #[test]
    fn test_defaults_survive_serialization() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let cfg = parse_config(&s).unwrap();
        assert_eq!(cfg.extract.institution, "auto");
        assert_eq!(cfg.log.filter, "warn");
    }
}
