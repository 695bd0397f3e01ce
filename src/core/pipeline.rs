use crate::core::merger::{join_sources, render};
use crate::core::render::renderer_for;
use crate::core::source::KmlSource;
use crate::core::{ConfigProvider, Entry, MergeResult, Pipeline, Storage};
use crate::utils::error::{KmlError, Result};
use std::path::Path;

/// Joins the selected sources, renders them in the configured format and writes the
/// document through `storage`. `load` only confirms the write and reports where the
/// document ended up.
pub struct JoinPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> JoinPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for JoinPipeline<S, C> {
    fn extract(&self, sources: &[&KmlSource]) -> Result<Vec<Entry>> {
        join_sources(sources.iter().copied())
    }

    fn transform(&self, entries: Vec<Entry>) -> Result<MergeResult> {
        let renderer = renderer_for(
            self.config.output_format(),
            &self.storage,
            self.config.template_path(),
        )?;
        let document = render(
            &entries,
            renderer.as_ref(),
            &self.storage,
            self.config.output_path(),
        )?;

        Ok(MergeResult { entries, document })
    }

    fn load(&self, result: MergeResult) -> Result<String> {
        let output_path = self.config.output_path();
        if !self.storage.exists(output_path) {
            return Err(KmlError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} was not written", output_path),
            )));
        }
        tracing::debug!(
            "{} entries ({} bytes) in {}",
            result.entries.len(),
            result.document.len(),
            output_path
        );

        Ok(Path::new(self.config.search_dir())
            .join(output_path)
            .display()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::OutputFormat;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MockStorage {
        files: RefCell<HashMap<String, Vec<u8>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &str) -> Self {
            let storage = Self::default();
            storage
                .files
                .borrow_mut()
                .insert(path.to_string(), data.as_bytes().to_vec());
            storage
        }

        fn get_file(&self, path: &str) -> Option<String> {
            self.files
                .borrow()
                .get(path)
                .map(|data| String::from_utf8_lossy(data).into_owned())
        }
    }

    impl Storage for &MockStorage {
        fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.borrow().get(path).cloned().ok_or_else(|| {
                KmlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .borrow_mut()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }

        fn exists(&self, path: &str) -> bool {
            self.files.borrow().contains_key(path)
        }
    }

    struct MockConfig {
        ignored: Vec<String>,
        format: OutputFormat,
    }

    impl MockConfig {
        fn new(format: OutputFormat) -> Self {
            Self {
                ignored: vec![],
                format,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn search_dir(&self) -> &str {
            "tracks"
        }

        fn pattern(&self) -> &str {
            "*.kml"
        }

        fn ignored_files(&self) -> &[String] {
            &self.ignored
        }

        fn template_path(&self) -> &str {
            "template.kml"
        }

        fn output_path(&self) -> &str {
            "out.kml"
        }

        fn output_format(&self) -> OutputFormat {
            self.format
        }

        fn max_attempts(&self) -> usize {
            5
        }
    }

    fn source(dir: &TempDir, name: &str, whens: &[&str]) -> KmlSource {
        let body: String = whens
            .iter()
            .map(|when| format!("<when>{}</when>\n<gx:coord>0 0 0</gx:coord>\n", when))
            .collect();
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        KmlSource::new(path).unwrap()
    }

    #[test]
    fn test_extract_joins_in_time_order() {
        let dir = TempDir::new().unwrap();
        let sources = vec![
            source(&dir, "late.kml", &["2013-05-01T00:00:00Z"]),
            source(&dir, "early.kml", &["2013-04-01T00:00:00Z", "2013-04-02T00:00:00Z"]),
        ];
        let storage = MockStorage::default();
        let pipeline = JoinPipeline::new(&storage, MockConfig::new(OutputFormat::Kml));

        let selected: Vec<&KmlSource> = sources.iter().collect();
        let entries = pipeline.extract(&selected).unwrap();
        let timestamps: Vec<&str> = entries.iter().map(|e| e.timestamp.as_str()).collect();

        assert_eq!(
            timestamps,
            vec![
                "2013-04-01T00:00:00Z",
                "2013-04-02T00:00:00Z",
                "2013-05-01T00:00:00Z"
            ]
        );
    }

    #[test]
    fn test_transform_uses_template_from_storage() {
        let storage =
            MockStorage::with_file("template.kml", "{% for w, c in data %}{{ w }}\n{% endfor %}");
        let pipeline = JoinPipeline::new(&storage, MockConfig::new(OutputFormat::Kml));

        let result = pipeline
            .transform(vec![Entry::new("2013-04-01T00:00:00Z", "0 0 0")])
            .unwrap();

        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.document, "2013-04-01T00:00:00Z\n");
    }

    #[test]
    fn test_transform_writes_rendered_document() {
        let storage = MockStorage::with_file("out.kml", "stale output");
        let pipeline = JoinPipeline::new(&storage, MockConfig::new(OutputFormat::Csv));

        let result = pipeline
            .transform(vec![Entry::new("2013-04-01T00:00:00Z", "0 0 0")])
            .unwrap();

        assert_eq!(storage.get_file("out.kml").unwrap(), result.document);
        assert_eq!(
            result.document,
            "timestamp,coordinate\n2013-04-01T00:00:00Z,0 0 0\n"
        );
    }

    #[test]
    fn test_transform_reports_broken_template() {
        let storage = MockStorage::with_file("template.kml", "<kml>{% for w, c in data %}</kml>");
        let pipeline = JoinPipeline::new(&storage, MockConfig::new(OutputFormat::Kml));

        assert!(matches!(
            pipeline.transform(vec![]),
            Err(KmlError::TemplateError { .. })
        ));
        assert!(storage.get_file("out.kml").is_none());
    }

    #[test]
    fn test_load_requires_written_output() {
        let storage = MockStorage::default();
        let pipeline = JoinPipeline::new(&storage, MockConfig::new(OutputFormat::Json));
        let result = MergeResult {
            entries: vec![],
            document: "[]\n".to_string(),
        };

        assert!(matches!(pipeline.load(result), Err(KmlError::IoError(_))));
    }

    #[test]
    fn test_load_reports_output_path() {
        let storage = MockStorage::default();
        let pipeline = JoinPipeline::new(&storage, MockConfig::new(OutputFormat::Json));

        let result = pipeline
            .transform(vec![Entry::new("2013-04-01T00:00:00Z", "0 0 0")])
            .unwrap();
        let output_path = pipeline.load(result).unwrap();

        assert_eq!(output_path, Path::new("tracks").join("out.kml").display().to_string());
        assert!(storage
            .get_file("out.kml")
            .unwrap()
            .contains("\"timestamp\": \"2013-04-01T00:00:00Z\""));
    }
}
