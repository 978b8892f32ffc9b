//! Embedded JSON Schemas for the analysis input files
//!
//! One schema per [`InputKind`], compiled once at startup. Validation
//! reports every violation with its instance path so a user can fix a
//! whole file in one pass.

use std::collections::HashMap;

use jsonschema::Validator;
use rust_embed::Embed;
use thiserror::Error;

use crate::schema::InputKind;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("embedded schema missing for kind '{0}'")]
    Missing(InputKind),

    #[error("embedded schema for kind '{kind}' is invalid: {reason}")]
    Invalid { kind: InputKind, reason: String },
}

/// Compiled validators for every input kind
pub struct SchemaRegistry {
    validators: HashMap<InputKind, Validator>,
}

impl SchemaRegistry {
    /// Compile all embedded schemas
    pub fn new() -> Result<Self, SchemaError> {
        let mut validators = HashMap::new();

        for kind in InputKind::all() {
            let name = format!("{}.schema.json", kind.as_str());
            let file = EmbeddedSchemas::get(&name).ok_or(SchemaError::Missing(*kind))?;
            let value: serde_json::Value =
                serde_json::from_slice(&file.data).map_err(|err| SchemaError::Invalid {
                    kind: *kind,
                    reason: err.to_string(),
                })?;
            let validator =
                jsonschema::validator_for(&value).map_err(|err| SchemaError::Invalid {
                    kind: *kind,
                    reason: err.to_string(),
                })?;
            validators.insert(*kind, validator);
        }

        Ok(Self { validators })
    }

    /// Validate one parsed document, returning every violation
    pub fn validate(&self, kind: InputKind, document: &serde_json::Value) -> Vec<String> {
        let Some(validator) = self.validators.get(&kind) else {
            return vec![format!("no schema registered for kind '{}'", kind)];
        };

        validator
            .iter_errors(document)
            .map(|error| {
                let path = error.instance_path.to_string();
                if path.is_empty() {
                    error.to_string()
                } else {
                    format!("{}: {}", path, error)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_schemas_compile() {
        assert!(SchemaRegistry::new().is_ok());
    }

    #[test]
    fn test_valid_fmea_passes() {
        let registry = SchemaRegistry::new().unwrap();
        let document = json!({
            "kind": "fmea",
            "title": "Pump drive",
            "item_hazard_rate": 3.5,
            "mission_time": 100.0,
            "modes": [{
                "description": "Winding open",
                "mode_ratio": 0.6,
                "effect_probability": 1.0,
                "severity": 7,
                "occurrence": 4,
                "detection": 5
            }]
        });
        assert!(registry.validate(InputKind::Fmea, &document).is_empty());
    }

    #[test]
    fn test_out_of_range_severity_is_reported() {
        let registry = SchemaRegistry::new().unwrap();
        let document = json!({
            "kind": "fmea",
            "title": "Pump drive",
            "item_hazard_rate": 3.5,
            "mission_time": 100.0,
            "modes": [{
                "description": "Winding open",
                "mode_ratio": 0.6,
                "effect_probability": 1.0,
                "severity": 0,
                "occurrence": 4,
                "detection": 5
            }]
        });
        let violations = registry.validate(InputKind::Fmea, &document);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("severity"));
    }

    #[test]
    fn test_missing_kind_is_reported() {
        let registry = SchemaRegistry::new().unwrap();
        let document = json!({"title": "No kind"});
        assert!(!registry.validate(InputKind::Growth, &document).is_empty());
    }
}
