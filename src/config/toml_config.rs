use crate::core::discovery::{default_ignored, DEFAULT_OUTPUT, DEFAULT_PATTERN, DEFAULT_TEMPLATE};
use crate::core::ConfigProvider;
use crate::domain::model::OutputFormat;
use crate::utils::error::{KmlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_dir")]
    pub dir: String,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default = "default_ignored")]
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output")]
    pub path: String,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

fn default_dir() -> String {
    ".".to_string()
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_output() -> String {
    DEFAULT_OUTPUT.to_string()
}

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_format() -> OutputFormat {
    OutputFormat::Kml
}

fn default_max_attempts() -> usize {
    5
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            pattern: default_pattern(),
            ignore: default_ignored(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output(),
            template: default_template(),
            format: default_format(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(KmlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| KmlError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable, leaving unknown
    /// variables untouched.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn search_dir(&self) -> &str {
        &self.discovery.dir
    }

    fn pattern(&self) -> &str {
        &self.discovery.pattern
    }

    fn ignored_files(&self) -> &[String] {
        &self.discovery.ignore
    }

    fn template_path(&self) -> &str {
        &self.output.template
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_format(&self) -> OutputFormat {
        self.output.format
    }

    fn max_attempts(&self) -> usize {
        self.prompt.max_attempts
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("discovery.dir", &self.discovery.dir)?;
        validation::validate_non_empty_string("discovery.pattern", &self.discovery.pattern)?;
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_path("output.template", &self.output.template)?;
        validation::validate_positive_number("prompt.max_attempts", self.prompt.max_attempts, 1)?;
        Ok(())
    }
}
