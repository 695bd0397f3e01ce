//! Jinja templates for KML output, rendered with `minijinja`.
//!
//! The merged entries are exposed as `data`, a list of `(timestamp, coordinate)`
//! pairs, so the usual track template reads:
//!
//! ```text
//! {% for when, coord in data %}<when>{{ when }}</when>
//! <gx:coord>{{ coord }}</gx:coord>
//! {% endfor %}
//! ```
//!
//! Undefined names are errors rather than empty strings, and the final newline of
//! the template is dropped the way jinja2 does by default.

use crate::domain::model::Entry;
use crate::domain::ports::Renderer;
use crate::utils::error::{KmlError, Result};
use minijinja::{context, Environment, UndefinedBehavior};

pub const BUILTIN_KML_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2" xmlns:gx="http://www.google.com/kml/ext/2.2">
<Document>
<name>Joined track</name>
<Placemark>
<name>{{ data|length }} waypoints</name>
<gx:Track>
{% for when, coord in data %}<when>{{ when }}</when>
<gx:coord>{{ coord }}</gx:coord>
{% endfor %}</gx:Track>
</Placemark>
</Document>
</kml>
"#;

fn template_error(err: minijinja::Error) -> KmlError {
    KmlError::TemplateError {
        message: err.to_string(),
    }
}

const TEMPLATE_NAME: &str = "output";

pub struct TemplateRenderer {
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Compiles `text` once so syntax errors surface before any entries are read.
    pub fn parse(text: &str) -> Result<Self> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_template_owned(TEMPLATE_NAME, text.to_string())
            .map_err(template_error)?;

        Ok(Self { env })
    }

    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_KML_TEMPLATE)
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, entries: &[Entry]) -> Result<String> {
        let data: Vec<(&str, &str)> = entries
            .iter()
            .map(|entry| (entry.timestamp.as_str(), entry.coordinate.as_str()))
            .collect();

        self.env
            .get_template(TEMPLATE_NAME)
            .and_then(|template| template.render(context! { data => data }))
            .map_err(template_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<Entry> {
        vec![
            Entry::new("2013-01-01T00:00:00Z", "1 1 0"),
            Entry::new("2013-01-01T00:01:00Z", "1 2 0"),
        ]
    }

    #[test]
    fn test_pair_loop() {
        let template =
            TemplateRenderer::parse("<a>{% for w, c in data %}[{{ w }}|{{c}}]{% endfor %}</a>").unwrap();

        assert_eq!(
            template.render(&entries()).unwrap(),
            "<a>[2013-01-01T00:00:00Z|1 1 0][2013-01-01T00:01:00Z|1 2 0]</a>"
        );
    }

    #[test]
    fn test_indexed_loop_and_length() {
        let template = TemplateRenderer::parse(
            "n={{ data|length }}\n{% for e in data %}{{ e[0] }},{{ e[1] }}\n{% endfor %}",
        )
        .unwrap();

        assert_eq!(
            template.render(&entries()).unwrap(),
            "n=2\n2013-01-01T00:00:00Z,1 1 0\n2013-01-01T00:01:00Z,1 2 0\n"
        );
    }

    #[test]
    fn test_filters_apply_to_entry_fields() {
        let template =
            TemplateRenderer::parse("{% for e in data %}<c>{{ e[1]|trim }}</c>{% endfor %}")
                .unwrap();
        let padded = vec![Entry::new("2013-01-01T00:00:00Z", " 1 1 0 ")];

        assert_eq!(template.render(&padded).unwrap(), "<c>1 1 0</c>");
    }

    #[test]
    fn test_unresolved_expression_is_an_error() {
        let template =
            TemplateRenderer::parse("{% for e in data %}<when>{{ e.speed }}</when>{% endfor %}")
                .unwrap();

        let err = template.render(&entries()).unwrap_err();
        assert!(matches!(err, KmlError::TemplateError { .. }));

        let template = TemplateRenderer::parse("{% for w, c in data %}{{ speed }}{% endfor %}").unwrap();
        assert!(template.render(&[]).is_ok());
        assert!(matches!(
            template.render(&entries()),
            Err(KmlError::TemplateError { .. })
        ));
    }

    #[test]
    fn test_whitespace_control_tags() {
        let template =
            TemplateRenderer::parse("<a>\n{%- for w, c in data -%}\n{{ w }}\n{%- endfor %}</a>")
                .unwrap();

        assert_eq!(
            template.render(&entries()).unwrap(),
            "<a>2013-01-01T00:00:00Z2013-01-01T00:01:00Z</a>"
        );
    }

    #[test]
    fn test_final_newline_is_dropped() {
        let template = TemplateRenderer::parse("<a>{{ data|length }}</a>\n").unwrap();
        assert_eq!(template.render(&entries()).unwrap(), "<a>2</a>");

        let template = TemplateRenderer::parse("<a>\n\n</a>\n\n").unwrap();
        assert_eq!(template.render(&[]).unwrap(), "<a>\n\n</a>\n");
    }

    #[test]
    fn test_empty_data_keeps_skeleton() {
        let template = TemplateRenderer::parse("<a>{% for w, c in data %}{{ w }}{% endfor %}</a>").unwrap();
        assert_eq!(template.render(&[]).unwrap(), "<a></a>");
    }

    #[test]
    fn test_syntax_errors_are_rejected() {
        assert!(matches!(
            TemplateRenderer::parse("<kml>{% for e in data %}{{ e[0] }}</kml>"),
            Err(KmlError::TemplateError { .. })
        ));
        assert!(matches!(
            TemplateRenderer::parse("<kml>{{ data|length"),
            Err(KmlError::TemplateError { .. })
        ));
    }

    #[test]
    fn test_builtin_template_renders_track_lines() {
        let document = TemplateRenderer::builtin().unwrap().render(&entries()).unwrap();

        assert!(document.contains("<name>2 waypoints</name>"));
        assert!(document.contains("\n<when>2013-01-01T00:00:00Z</when>\n<gx:coord>1 1 0</gx:coord>\n"));
        assert!(document.ends_with("</kml>"));
    }
}
