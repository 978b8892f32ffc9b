//! Derating checks against environment-dependent stress limits
//!
//! Each component family compares its operating stresses (voltage, current,
//! temperature margin) against limit tables selected by an environment
//! class and a style key derived from the record's subcategory and
//! specification or family IDs. The checks return an overstress flag and a
//! reason string listing every violated limit as a numbered finding:
//!
//! ```text
//! 1. Operating voltage > 60% rated voltage.
//! 2. Operating temperature within 10.0C of maximum rated temperature.
//! ```
//!
//! The limit values follow the Reliability Toolkit: Commercial Practices
//! Edition, Section 6.3.3 derating guidelines.

use std::fmt;

use crate::analysis::{AnalysisError, Result};

/// Derating severity class of an active environment.
///
/// Ground benign and space flight are protected; ground fixed and naval
/// sheltered are normal; every other MIL-HDBK-217F environment is harsh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentClass {
    Protected,
    Normal,
    Harsh,
}

impl EnvironmentClass {
    fn index(self) -> usize {
        match self {
            EnvironmentClass::Protected => 0,
            EnvironmentClass::Normal => 1,
            EnvironmentClass::Harsh => 2,
        }
    }
}

impl fmt::Display for EnvironmentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvironmentClass::Protected => write!(f, "protected"),
            EnvironmentClass::Normal => write!(f, "normal"),
            EnvironmentClass::Harsh => write!(f, "harsh"),
        }
    }
}

/// Classify a MIL-HDBK-217F active environment ID
pub fn get_environment_class(environment_active_id: u32) -> Result<EnvironmentClass> {
    match environment_active_id {
        1 | 11 => Ok(EnvironmentClass::Protected),
        2 | 4 => Ok(EnvironmentClass::Normal),
        3 | 5..=10 | 12..=14 => Ok(EnvironmentClass::Harsh),
        _ => Err(AnalysisError::IndexOutOfBounds {
            function: "get_environment_class",
            detail: format!("environment ID {}", environment_active_id),
        }),
    }
}

/// Stress limits for one capacitor style, indexed by environment class
struct CapacitorLimits {
    voltage: [f64; 3],
    reverse_voltage: Option<[f64; 3]>,
    temperature: [f64; 3],
}

/// Paper, plastic, metallized and mica button styles (subcategories 1-6, 8)
const PAPER_FILM: CapacitorLimits = CapacitorLimits {
    voltage: [0.55, 0.55, 0.55],
    reverse_voltage: None,
    temperature: [10.0, 10.0, 10.0],
};

/// Mica (subcategory 7)
const MICA: CapacitorLimits = CapacitorLimits {
    voltage: [0.7, 0.7, 0.7],
    reverse_voltage: None,
    temperature: [25.0, 25.0, 25.0],
};

/// Glass, fixed ceramic and piston styles (subcategories 9, 10, 17)
const GLASS_CERAMIC: CapacitorLimits = CapacitorLimits {
    voltage: [0.6, 0.6, 0.6],
    reverse_voltage: None,
    temperature: [15.0, 15.0, 15.0],
};

/// Chip ceramic, variable ceramic, trimmer and vacuum styles
/// (subcategories 11, 16, 18, 19)
const CERAMIC_CHIP: CapacitorLimits = CapacitorLimits {
    voltage: [0.6, 0.6, 0.6],
    reverse_voltage: None,
    temperature: [10.0, 10.0, 10.0],
};

/// Solid and wet tantalum styles (subcategories 12, 13)
const TANTALUM: CapacitorLimits = CapacitorLimits {
    voltage: [0.6, 0.6, 0.6],
    reverse_voltage: Some([0.02, 0.02, 0.02]),
    temperature: [10.0, 10.0, 10.0],
};

/// Wet and dry aluminum electrolytic styles (subcategories 14, 15)
const ALUMINUM: CapacitorLimits = CapacitorLimits {
    voltage: [0.7, 0.7, 0.7],
    reverse_voltage: None,
    temperature: [10.0, 10.0, 10.0],
};

/// Stress limits for one inductive device class
struct InductorLimits {
    current: [f64; 3],
    voltage: Option<[f64; 3]>,
    temperature: [f64; 3],
}

/// Power and audio transformers, fixed and variable coils
const LOW_FREQUENCY: InductorLimits = InductorLimits {
    current: [0.7, 0.7, 0.6],
    voltage: Some([0.7, 0.7, 0.6]),
    temperature: [30.0, 30.0, 30.0],
};

/// RF transformers check current and hot spot margin only
const HIGH_FREQUENCY: InductorLimits = InductorLimits {
    current: [0.9, 0.9, 0.8],
    voltage: None,
    temperature: [30.0, 30.0, 30.0],
};

/// Incandescent lamp current ratio limits
const LAMP_CURRENT: [f64; 3] = [0.2, 0.1, 0.1];

/// Check a capacitor's operating stresses against its style limits.
///
/// The style is derived from the subcategory ID; subcategory 11 splits on
/// the specification ID (temperature compensating vs. chip). Checks the
/// voltage ratio, the reverse voltage ratio for tantalum styles, and the
/// margin between the operating and maximum rated temperatures.
pub fn check_capacitor(
    subcategory_id: u32,
    specification_id: u32,
    class: EnvironmentClass,
    voltage_ratio: f64,
    voltage_reverse_ratio: f64,
    temperature_active: f64,
    temperature_rated_max: f64,
) -> Result<(bool, String)> {
    let limits = get_capacitor_limits(subcategory_id, specification_id)?;
    let idx = class.index();

    let mut reason = Findings::new();

    if voltage_ratio > limits.voltage[idx] {
        reason.push(format!(
            ". Operating voltage > {}% rated voltage.",
            percent(limits.voltage[idx])
        ));
    }
    if let Some(reverse) = limits.reverse_voltage {
        if voltage_reverse_ratio > reverse[idx] {
            reason.push(format!(
                ". Operating reverse voltage > {}% rated voltage.",
                percent(reverse[idx])
            ));
        }
    }
    if temperature_rated_max - temperature_active <= limits.temperature[idx] {
        reason.push(format!(
            ". Operating temperature within {:.1}C of maximum rated temperature.",
            limits.temperature[idx]
        ));
    }

    Ok(reason.into_result())
}

/// Check an inductive device's operating stresses against its frequency
/// class limits.
///
/// Transformers (subcategory 1) of families 1-3 and coils (subcategory 2)
/// are low frequency; family 4 transformers are RF. Low frequency devices
/// check current, voltage and the hot spot temperature margin; RF devices
/// skip the voltage check.
pub fn check_inductor(
    subcategory_id: u32,
    family_id: u32,
    class: EnvironmentClass,
    current_ratio: f64,
    voltage_ratio: f64,
    temperature_hot_spot: f64,
    temperature_rated_max: f64,
) -> Result<(bool, String)> {
    let limits = get_inductor_limits(subcategory_id, family_id)?;
    let idx = class.index();

    let mut reason = Findings::new();

    if current_ratio > limits.current[idx] {
        reason.push(format!(
            ". Operating current > {}% rated current.",
            percent(limits.current[idx])
        ));
    }
    if let Some(voltage) = limits.voltage {
        if voltage_ratio > voltage[idx] {
            reason.push(format!(
                ". Operating voltage > {}% rated voltage.",
                percent(voltage[idx])
            ));
        }
    }
    if temperature_rated_max - temperature_hot_spot <= limits.temperature[idx] {
        reason.push(format!(
            ". Hot spot temperature within {:.1}C of maximum rated temperature.",
            limits.temperature[idx]
        ));
    }

    Ok(reason.into_result())
}

/// Check an incandescent lamp's current ratio
pub fn check_lamp(class: EnvironmentClass, current_ratio: f64) -> (bool, String) {
    let limit = LAMP_CURRENT[class.index()];

    let mut reason = Findings::new();
    if current_ratio > limit {
        reason.push(format!(
            ". Operating current > {}% rated current.",
            percent(limit)
        ));
    }

    reason.into_result()
}

fn get_capacitor_limits(
    subcategory_id: u32,
    specification_id: u32,
) -> Result<&'static CapacitorLimits> {
    match subcategory_id {
        1..=6 | 8 => Ok(&PAPER_FILM),
        7 => Ok(&MICA),
        9 | 10 | 17 => Ok(&GLASS_CERAMIC),
        11 => match specification_id {
            1 | 2 => Ok(&CERAMIC_CHIP),
            _ => Err(AnalysisError::UnknownTableKey {
                function: "get_capacitor_limits",
                detail: format!("capacitor specification ID {}", specification_id),
            }),
        },
        16 | 18 | 19 => Ok(&CERAMIC_CHIP),
        12 | 13 => Ok(&TANTALUM),
        14 | 15 => Ok(&ALUMINUM),
        _ => Err(AnalysisError::UnknownTableKey {
            function: "get_capacitor_limits",
            detail: format!("capacitor subcategory ID {}", subcategory_id),
        }),
    }
}

fn get_inductor_limits(subcategory_id: u32, family_id: u32) -> Result<&'static InductorLimits> {
    match subcategory_id {
        1 => match family_id {
            1..=3 => Ok(&LOW_FREQUENCY),
            4 => Ok(&HIGH_FREQUENCY),
            _ => Err(AnalysisError::UnknownTableKey {
                function: "get_inductor_limits",
                detail: format!("inductor family ID {}", family_id),
            }),
        },
        2 => match family_id {
            1 | 2 => Ok(&LOW_FREQUENCY),
            _ => Err(AnalysisError::UnknownTableKey {
                function: "get_inductor_limits",
                detail: format!("inductor family ID {}", family_id),
            }),
        },
        _ => Err(AnalysisError::UnknownTableKey {
            function: "get_inductor_limits",
            detail: format!("inductor subcategory ID {}", subcategory_id),
        }),
    }
}

fn percent(limit: f64) -> f64 {
    (limit * 100.0).round()
}

/// Accumulates numbered findings into a single reason string
struct Findings {
    next: u32,
    text: String,
}

impl Findings {
    fn new() -> Self {
        Findings {
            next: 1,
            text: String::new(),
        }
    }

    fn push(&mut self, finding: String) {
        self.text.push_str(&format!("{}{}\n", self.next, finding));
        self.next += 1;
    }

    fn into_result(self) -> (bool, String) {
        (self.next > 1, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_classes() {
        assert_eq!(get_environment_class(1).unwrap(), EnvironmentClass::Protected);
        assert_eq!(get_environment_class(11).unwrap(), EnvironmentClass::Protected);
        assert_eq!(get_environment_class(2).unwrap(), EnvironmentClass::Normal);
        assert_eq!(get_environment_class(4).unwrap(), EnvironmentClass::Normal);
        assert_eq!(get_environment_class(3).unwrap(), EnvironmentClass::Harsh);
        assert_eq!(get_environment_class(14).unwrap(), EnvironmentClass::Harsh);

        let err = get_environment_class(15).unwrap_err();
        assert_eq!(err.to_string(), "get_environment_class: invalid environment ID 15");
    }

    #[test]
    fn test_capacitor_within_limits() {
        let (overstressed, reason) =
            check_capacitor(10, 1, EnvironmentClass::Harsh, 0.55, 0.0, 45.0, 85.0).unwrap();

        assert!(!overstressed);
        assert!(reason.is_empty());
    }

    #[test]
    fn test_capacitor_voltage_overstress() {
        let (overstressed, reason) =
            check_capacitor(10, 1, EnvironmentClass::Harsh, 0.65, 0.0, 45.0, 85.0).unwrap();

        assert!(overstressed);
        assert_eq!(reason, "1. Operating voltage > 60% rated voltage.\n");
    }

    #[test]
    fn test_capacitor_temperature_margin() {
        let (overstressed, reason) =
            check_capacitor(1, 1, EnvironmentClass::Normal, 0.3, 0.0, 80.0, 85.0).unwrap();

        assert!(overstressed);
        assert_eq!(
            reason,
            "1. Operating temperature within 10.0C of maximum rated temperature.\n"
        );
    }

    #[test]
    fn test_tantalum_numbered_findings() {
        let (overstressed, reason) =
            check_capacitor(12, 1, EnvironmentClass::Protected, 0.7, 0.05, 80.0, 85.0).unwrap();

        assert!(overstressed);
        assert_eq!(
            reason,
            "1. Operating voltage > 60% rated voltage.\n\
             2. Operating reverse voltage > 2% rated voltage.\n\
             3. Operating temperature within 10.0C of maximum rated temperature.\n"
        );
    }

    #[test]
    fn test_reverse_voltage_ignored_for_other_styles() {
        let (overstressed, reason) =
            check_capacitor(14, 1, EnvironmentClass::Protected, 0.5, 0.5, 45.0, 105.0).unwrap();

        assert!(!overstressed);
        assert!(reason.is_empty());
    }

    #[test]
    fn test_capacitor_unknown_style() {
        let err = check_capacitor(23, 1, EnvironmentClass::Harsh, 0.5, 0.0, 45.0, 85.0)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "get_capacitor_limits: unknown capacitor subcategory ID 23"
        );

        let err = check_capacitor(11, 3, EnvironmentClass::Harsh, 0.5, 0.0, 45.0, 85.0)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "get_capacitor_limits: unknown capacitor specification ID 3"
        );
    }

    #[test]
    fn test_inductor_harsh_tightens_limits() {
        // current ratio 0.65 passes the 0.7 normal limit but not the 0.6
        // harsh limit
        let (overstressed, _) =
            check_inductor(1, 3, EnvironmentClass::Normal, 0.65, 0.5, 60.0, 130.0).unwrap();
        assert!(!overstressed);

        let (overstressed, reason) =
            check_inductor(1, 3, EnvironmentClass::Harsh, 0.65, 0.5, 60.0, 130.0).unwrap();
        assert!(overstressed);
        assert_eq!(reason, "1. Operating current > 60% rated current.\n");
    }

    #[test]
    fn test_inductor_hot_spot_margin() {
        let (overstressed, reason) =
            check_inductor(2, 1, EnvironmentClass::Protected, 0.5, 0.5, 100.0, 125.0).unwrap();

        assert!(overstressed);
        assert_eq!(
            reason,
            "1. Hot spot temperature within 30.0C of maximum rated temperature.\n"
        );
    }

    #[test]
    fn test_rf_transformer_skips_voltage_check() {
        let (overstressed, reason) =
            check_inductor(1, 4, EnvironmentClass::Protected, 0.85, 0.95, 60.0, 130.0).unwrap();

        assert!(!overstressed);
        assert!(reason.is_empty());

        let (overstressed, reason) =
            check_inductor(1, 4, EnvironmentClass::Harsh, 0.85, 0.5, 60.0, 130.0).unwrap();
        assert!(overstressed);
        assert_eq!(reason, "1. Operating current > 80% rated current.\n");
    }

    #[test]
    fn test_inductor_unknown_keys() {
        let err = check_inductor(3, 1, EnvironmentClass::Harsh, 0.5, 0.5, 60.0, 130.0)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "get_inductor_limits: unknown inductor subcategory ID 3"
        );

        let err = check_inductor(1, 5, EnvironmentClass::Harsh, 0.5, 0.5, 60.0, 130.0)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "get_inductor_limits: unknown inductor family ID 5"
        );
    }

    #[test]
    fn test_lamp_current_limits() {
        let (overstressed, _) = check_lamp(EnvironmentClass::Protected, 0.15);
        assert!(!overstressed);

        let (overstressed, reason) = check_lamp(EnvironmentClass::Normal, 0.15);
        assert!(overstressed);
        assert_eq!(reason, "1. Operating current > 10% rated current.\n");

        let (overstressed, reason) = check_lamp(EnvironmentClass::Protected, 0.25);
        assert!(overstressed);
        assert_eq!(reason, "1. Operating current > 20% rated current.\n");
    }
}
