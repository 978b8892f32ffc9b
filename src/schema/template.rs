//! Template generation for new analysis input files

use chrono::{DateTime, Utc};
use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::schema::InputKind;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("no template for kind '{0}'")]
    NotFound(InputKind),

    #[error("template rendering error: {0}")]
    Render(String),
}

/// Context for template generation
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub title: String,
    pub author: String,
    pub created: DateTime<Utc>,
    /// Seeded into new component records
    pub quality_id: u32,
    /// Seeded into new component records
    pub environment_id: u32,
    /// Seeded into growth and survival inputs
    pub confidence: f64,
}

impl TemplateContext {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            created: Utc::now(),
            quality_id: 1,
            environment_id: 1,
            confidence: 0.90,
        }
    }

    pub fn with_quality_id(mut self, quality_id: u32) -> Self {
        self.quality_id = quality_id;
        self
    }

    pub fn with_environment_id(mut self, environment_id: u32) -> Self {
        self.environment_id = environment_id;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }
}

/// Renders starter input files from the embedded Tera templates
pub struct TemplateGenerator {
    tera: Tera,
}

impl TemplateGenerator {
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::Render(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render the starter file for one input kind
    pub fn generate(&self, kind: InputKind, ctx: &TemplateContext) -> Result<String, TemplateError> {
        let name = format!("{}.yaml.tera", kind.as_str());
        if !self.tera.get_template_names().any(|n| n == name) {
            return Err(TemplateError::NotFound(kind));
        }

        let mut context = tera::Context::new();
        context.insert("title", &ctx.title);
        context.insert("author", &ctx.author);
        context.insert("created", &ctx.created.to_rfc3339());
        context.insert("created_date", &ctx.created.format("%Y-%m-%d").to_string());
        context.insert("quality_id", &ctx.quality_id);
        context.insert("environment_id", &ctx.environment_id);
        context.insert("confidence", &ctx.confidence);

        self.tera
            .render(&name, &context)
            .map_err(|e| TemplateError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_renders_valid_yaml() {
        let generator = TemplateGenerator::new().unwrap();
        let ctx = TemplateContext::new("Starter", "tester").with_confidence(0.95);

        for kind in InputKind::all() {
            let yaml = generator.generate(*kind, &ctx).unwrap();
            let parsed: serde_yml::Value = serde_yml::from_str(&yaml).unwrap();
            assert_eq!(
                parsed.get("kind").and_then(|k| k.as_str()),
                Some(kind.as_str()),
                "template for {kind} must carry its kind"
            );
            assert_eq!(parsed.get("title").and_then(|t| t.as_str()), Some("Starter"));
        }
    }

    #[test]
    fn test_context_defaults_flow_into_components() {
        let generator = TemplateGenerator::new().unwrap();
        let ctx = TemplateContext::new("PSU", "tester")
            .with_quality_id(2)
            .with_environment_id(4);

        let yaml = generator.generate(InputKind::Components, &ctx).unwrap();
        assert!(yaml.contains("quality_id: 2"));
        assert!(yaml.contains("environment_active_id: 4"));
    }
}
