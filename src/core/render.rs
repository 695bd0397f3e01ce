use crate::core::template::TemplateRenderer;
use crate::domain::model::{Entry, OutputFormat};
use crate::domain::ports::{Renderer, Storage};
use crate::utils::error::{KmlError, Result};

pub struct CsvRenderer;

impl Renderer for CsvRenderer {
    fn render(&self, entries: &[Entry]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for entry in entries {
            writer.serialize(entry)?;
        }
        if entries.is_empty() {
            writer.write_record(["timestamp", "coordinate"])?;
        }

        let bytes = writer.into_inner().map_err(|e| KmlError::IoError(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| KmlError::TemplateError {
            message: format!("CSV output is not UTF-8: {}", e),
        })
    }
}

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, entries: &[Entry]) -> Result<String> {
        let mut document = serde_json::to_string_pretty(entries)?;
        document.push('\n');
        Ok(document)
    }
}

/// Picks the renderer for `format`. KML output goes through the template at
/// `template_path`, or the builtin one when that file is missing.
pub fn renderer_for<S: Storage>(
    format: OutputFormat,
    storage: &S,
    template_path: &str,
) -> Result<Box<dyn Renderer>> {
    match format {
        OutputFormat::Kml => {
            if !storage.exists(template_path) {
                tracing::warn!(
                    "Template {} not found, using the builtin KML track template",
                    template_path
                );
                return Ok(Box::new(TemplateRenderer::builtin()?));
            }

            let bytes = storage.read_file(template_path)?;
            let text = String::from_utf8_lossy(&bytes);
            tracing::debug!("Loaded template {} ({} bytes)", template_path, bytes.len());
            Ok(Box::new(TemplateRenderer::parse(&text)?))
        }
        OutputFormat::Csv => Ok(Box::new(CsvRenderer)),
        OutputFormat::Json => Ok(Box::new(JsonRenderer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;
    use tempfile::TempDir;

    fn entries() -> Vec<Entry> {
        vec![
            Entry::new("2013-01-01T00:00:00Z", "-122.1 37.4 0"),
            Entry::new("2013-01-01T00:01:00Z", "-122.2 37.5 0"),
        ]
    }

    #[test]
    fn test_csv_output() {
        let csv = CsvRenderer.render(&entries()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "timestamp,coordinate");
        assert_eq!(lines[1], "2013-01-01T00:00:00Z,-122.1 37.4 0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_output_without_entries_has_header() {
        assert_eq!(CsvRenderer.render(&[]).unwrap(), "timestamp,coordinate\n");
    }

    #[test]
    fn test_json_output() {
        let json = JsonRenderer.render(&entries()).unwrap();
        let parsed: Vec<Entry> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, entries());
    }

    #[test]
    fn test_missing_template_falls_back_to_builtin() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());

        let renderer = renderer_for(OutputFormat::Kml, &storage, "kml_template.kml").unwrap();
        let document = renderer.render(&entries()).unwrap();

        assert!(document.contains("<when>2013-01-01T00:01:00Z</when>"));
    }

    #[test]
    fn test_template_is_read_from_storage() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("t.kml"),
            "{% for when, coord in data %}{{ coord }};{% endfor %}",
        )
        .unwrap();
        let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());

        let renderer = renderer_for(OutputFormat::Kml, &storage, "t.kml").unwrap();
        assert_eq!(
            renderer.render(&entries()).unwrap(),
            "-122.1 37.4 0;-122.2 37.5 0;"
        );
    }
}
