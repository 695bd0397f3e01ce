use crate::core::source::KmlSource;
use crate::domain::model::{Entry, MergeResult, OutputFormat};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    fn exists(&self, path: &str) -> bool;
}

pub trait ConfigProvider {
    fn search_dir(&self) -> &str;
    fn pattern(&self) -> &str;
    fn ignored_files(&self) -> &[String];
    fn template_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_format(&self) -> OutputFormat;
    fn max_attempts(&self) -> usize;
}

/// Turns an ordered list of entries into the text of an output document.
pub trait Renderer {
    fn render(&self, entries: &[Entry]) -> Result<String>;
}

pub trait Pipeline {
    fn extract(&self, sources: &[&KmlSource]) -> Result<Vec<Entry>>;
    fn transform(&self, entries: Vec<Entry>) -> Result<MergeResult>;
    fn load(&self, result: MergeResult) -> Result<String>;
}
