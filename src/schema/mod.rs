//! Schema module - input validation and scaffolding

pub mod registry;
pub mod template;

use std::fmt;
use std::str::FromStr;

pub use registry::SchemaRegistry;
pub use template::{TemplateContext, TemplateError, TemplateGenerator};

/// The four analysis input file kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Components,
    Fmea,
    Growth,
    Survival,
}

impl InputKind {
    pub fn all() -> &'static [InputKind] {
        &[
            InputKind::Components,
            InputKind::Fmea,
            InputKind::Growth,
            InputKind::Survival,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Components => "components",
            InputKind::Fmea => "fmea",
            InputKind::Growth => "growth",
            InputKind::Survival => "survival",
        }
    }

    /// Read the `kind` discriminator out of a parsed input document
    pub fn detect(document: &serde_json::Value) -> Option<InputKind> {
        document
            .get("kind")
            .and_then(|kind| kind.as_str())
            .and_then(|kind| kind.parse().ok())
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "components" | "records" => Ok(InputKind::Components),
            "fmea" => Ok(InputKind::Fmea),
            "growth" => Ok(InputKind::Growth),
            "survival" => Ok(InputKind::Survival),
            _ => Err(format!("Unknown input kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_kind_roundtrip() {
        for kind in InputKind::all() {
            assert_eq!(kind.as_str().parse::<InputKind>().unwrap(), *kind);
        }
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(
            InputKind::detect(&json!({"kind": "growth", "failures": []})),
            Some(InputKind::Growth)
        );
        assert_eq!(InputKind::detect(&json!({"failures": []})), None);
        assert_eq!(InputKind::detect(&json!({"kind": "widget"})), None);
    }
}
