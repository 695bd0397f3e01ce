pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::{
    discovery::discover_sources,
    engine::JoinEngine,
    merger::{join_sources, render, select_sources, Selection},
    pipeline::JoinPipeline,
    source::KmlSource,
};
pub use crate::domain::model::{Entry, OutputFormat};
pub use crate::utils::error::{KmlError, Result};
