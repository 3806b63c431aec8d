// Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format (console, json, junit)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output file for json and junit reports
    #[serde(default)]
    pub path: Option<String>,

    /// Extension of per-feature rendered documents
    #[serde(default = "default_document_extension")]
    pub document_extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
            document_extension: default_document_extension(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Enable colored output
    #[serde(default = "default_color")]
    pub color: bool,

    /// List every step in the console summary
    #[serde(default)]
    pub show_steps: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
            show_steps: false,
        }
    }
}

// Default values
pub fn default_format() -> String {
    String::from("console")
}

pub fn default_document_extension() -> String {
    String::from("html")
}

fn default_color() -> bool {
    true
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Check locations in order:
        // 1. .gherkinreportrc (current directory)
        // 2. ~/.gherkinreportrc (home directory)
        // 3. .gherkinreportrc.toml (current directory)
        // 4. ~/.gherkinreportrc.toml (home directory)

        let cwd = std::env::current_dir().ok()?;
        let home = dirs::home_dir()?;

        let paths = [
            cwd.join(".gherkinreportrc"),
            home.join(".gherkinreportrc"),
            cwd.join(".gherkinreportrc.toml"),
            home.join(".gherkinreportrc.toml"),
        ];

        for path in &paths {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        None
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Generate configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[output]
format = "junit"
path = "reports/junit.xml"
document_extension = "htm"

[display]
color = false
show_steps = true
"#;

        let config = Config::parse(toml).expect("Failed to parse config");
        assert_eq!(config.output.format, "junit");
        assert_eq!(config.output.path, Some("reports/junit.xml".to_string()));
        assert_eq!(config.output.document_extension, "htm");
        assert!(!config.display.color);
        assert!(config.display.show_steps);
    }

    #[test]
    fn test_parse_partial_config_uses_defaults() {
        let config = Config::parse("[display]\nshow_steps = true\n").expect("Failed to parse");
        assert_eq!(config.output.format, "console");
        assert!(config.display.color);
    }

    #[test]
    fn test_to_toml_round_trip() {
        let config = Config::default();
        let parsed = Config::parse(&config.to_toml()).expect("Failed to parse generated TOML");
        assert_eq!(parsed.output.format, config.output.format);
        assert_eq!(parsed.display.color, config.display.color);
    }

    #[test]
    fn test_parse_invalid_config() {
        assert!(Config::parse("[output\nformat = ").is_none());
    }
}
