//! Component file wrapper and the family-tagged record enum

use serde::{Deserialize, Serialize};

use crate::records::{CapacitorRecord, InductorRecord, MiscellaneousRecord};

/// A component record tagged by part family
///
/// The `family` key in YAML picks the variant:
///
/// ```text
/// - family: capacitor
///   hardware_id: 1
///   subcategory_id: 12
///   ...
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum ComponentRecord {
    Capacitor(CapacitorRecord),
    Inductor(InductorRecord),
    Miscellaneous(MiscellaneousRecord),
}

impl ComponentRecord {
    pub fn hardware_id(&self) -> u32 {
        match self {
            ComponentRecord::Capacitor(r) => r.hardware_id,
            ComponentRecord::Inductor(r) => r.hardware_id,
            ComponentRecord::Miscellaneous(r) => r.hardware_id,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ComponentRecord::Capacitor(r) => &r.description,
            ComponentRecord::Inductor(r) => &r.description,
            ComponentRecord::Miscellaneous(r) => &r.description,
        }
    }

    pub fn family_name(&self) -> &'static str {
        match self {
            ComponentRecord::Capacitor(_) => "capacitor",
            ComponentRecord::Inductor(_) => "inductor",
            ComponentRecord::Miscellaneous(_) => "miscellaneous",
        }
    }

    pub fn quantity(&self) -> u32 {
        match self {
            ComponentRecord::Capacitor(r) => r.quantity,
            ComponentRecord::Inductor(r) => r.quantity,
            ComponentRecord::Miscellaneous(r) => r.quantity,
        }
    }

    /// Hazard rate written by the last prediction, failures per million hours
    pub fn hazard_rate_active(&self) -> f64 {
        match self {
            ComponentRecord::Capacitor(r) => r.hazard_rate_active,
            ComponentRecord::Inductor(r) => r.hazard_rate_active,
            ComponentRecord::Miscellaneous(r) => r.hazard_rate_active,
        }
    }
}

/// Top-level shape of a `*.lrt.yaml` components file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentFile {
    /// File discriminator, always "components"
    pub kind: String,

    /// Optional free-text description of the assembly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub components: Vec<ComponentRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_record_family_tag() {
        let yaml = r#"
kind: components
components:
  - family: capacitor
    hardware_id: 1
    subcategory_id: 12
    capacitance: 3.3e-6
  - family: miscellaneous
    hardware_id: 2
    subcategory_id: 4
    voltage_rated: 12.0
"#;
        let file: ComponentFile = serde_yml::from_str(yaml).unwrap();

        assert_eq!(file.kind, "components");
        assert_eq!(file.components.len(), 2);
        assert_eq!(file.components[0].family_name(), "capacitor");
        assert_eq!(file.components[1].hardware_id(), 2);
    }

    #[test]
    fn test_component_record_unknown_family_fails() {
        let yaml = "family: resistor\nhardware_id: 1\nsubcategory_id: 1";
        let record: Result<ComponentRecord, _> = serde_yml::from_str(yaml);
        assert!(record.is_err());
    }
}
