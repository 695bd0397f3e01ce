pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::discovery::{DEFAULT_OUTPUT, DEFAULT_PATTERN, DEFAULT_TEMPLATE};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::OutputFormat;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "kml-joiner")]
#[command(about = "Join KML track files into one chronologically ordered file")]
pub struct CliConfig {
    /// Directory searched for track files
    #[arg(long, default_value = ".")]
    pub dir: String,

    /// File name pattern of the track files
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// File names never offered for joining
    #[arg(long, value_delimiter = ',', default_values_t = [DEFAULT_TEMPLATE.to_string(), DEFAULT_OUTPUT.to_string()])]
    pub ignore: Vec<String>,

    /// Template used for KML output, relative to --dir
    #[arg(long, default_value = DEFAULT_TEMPLATE)]
    pub template: String,

    /// Output file, relative to --dir
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Output format: kml, csv or json
    #[arg(long, default_value = "kml")]
    pub format: String,

    /// Files to join ('All' or indices), skips the prompt
    #[arg(short, long)]
    pub select: Option<String>,

    /// Number of prompt attempts before giving up
    #[arg(long, default_value = "5")]
    pub max_attempts: usize,

    /// TOML configuration file, replaces the discovery and output flags
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn search_dir(&self) -> &str {
        &self.dir
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }

    fn ignored_files(&self) -> &[String] {
        &self.ignore
    }

    fn template_path(&self) -> &str {
        &self.template
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn output_format(&self) -> OutputFormat {
        self.format.parse().unwrap_or(OutputFormat::Kml)
    }

    fn max_attempts(&self) -> usize {
        self.max_attempts
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("dir", &self.dir)?;
        validation::validate_non_empty_string("pattern", &self.pattern)?;
        validation::validate_path("template", &self.template)?;
        validation::validate_path("output", &self.output)?;
        validation::validate_output_format("format", &self.format)?;
        validation::validate_positive_number("max_attempts", self.max_attempts, 1)?;
        Ok(())
    }
}
