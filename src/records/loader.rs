//! Input file loading
//!
//! YAML inputs carry a `kind` discriminator; growth failures and survival
//! observations can also come straight from CSV with a header row.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::records::{
    ComponentFile, FailureRecord, FmeaFile, GrowthFile, SurvivalFile, SurvivalObservation,
};
use crate::schema::InputKind;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed YAML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} has no 'kind' key; expected one of components, fmea, growth, survival")]
    MissingKind { path: PathBuf },

    #[error("{path} is a '{found}' file, expected '{expected}'")]
    WrongKind {
        path: PathBuf,
        expected: InputKind,
        found: String,
    },
}

/// Any parsed analysis input file
#[derive(Debug, Clone)]
pub enum InputFile {
    Components(ComponentFile),
    Fmea(FmeaFile),
    Growth(GrowthFile),
    Survival(SurvivalFile),
}

impl InputFile {
    pub fn kind(&self) -> InputKind {
        match self {
            InputFile::Components(_) => InputKind::Components,
            InputFile::Fmea(_) => InputKind::Fmea,
            InputFile::Growth(_) => InputKind::Growth,
            InputFile::Survival(_) => InputKind::Survival,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            InputFile::Components(f) => f.title.as_deref(),
            InputFile::Fmea(f) => f.title.as_deref(),
            InputFile::Growth(f) => f.title.as_deref(),
            InputFile::Survival(f) => f.title.as_deref(),
        }
    }
}

fn read_to_string(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_yaml<T: serde::de::DeserializeOwned + 'static>(path: &Path, body: &str) -> Result<T, LoadError> {
    serde_yml::from_str(body).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn detected_kind(path: &Path, body: &str) -> Result<InputKind, LoadError> {
    let value: serde_yml::Value = parse_yaml(path, body)?;
    value
        .get("kind")
        .and_then(|kind| kind.as_str())
        .and_then(|kind| kind.parse().ok())
        .ok_or_else(|| LoadError::MissingKind {
            path: path.to_path_buf(),
        })
}

fn expect_kind(path: &Path, body: &str, expected: InputKind) -> Result<(), LoadError> {
    let found = detected_kind(path, body)?;
    if found == expected {
        Ok(())
    } else {
        Err(LoadError::WrongKind {
            path: path.to_path_buf(),
            expected,
            found: found.to_string(),
        })
    }
}

/// Load any input file, dispatching on its `kind`
pub fn load_input(path: &Path) -> Result<InputFile, LoadError> {
    let body = read_to_string(path)?;
    match detected_kind(path, &body)? {
        InputKind::Components => Ok(InputFile::Components(parse_yaml(path, &body)?)),
        InputKind::Fmea => Ok(InputFile::Fmea(parse_yaml(path, &body)?)),
        InputKind::Growth => Ok(InputFile::Growth(parse_yaml(path, &body)?)),
        InputKind::Survival => Ok(InputFile::Survival(parse_yaml(path, &body)?)),
    }
}

pub fn load_components(path: &Path) -> Result<ComponentFile, LoadError> {
    let body = read_to_string(path)?;
    expect_kind(path, &body, InputKind::Components)?;
    parse_yaml(path, &body)
}

pub fn load_fmea(path: &Path) -> Result<FmeaFile, LoadError> {
    let body = read_to_string(path)?;
    expect_kind(path, &body, InputKind::Fmea)?;
    parse_yaml(path, &body)
}

/// Load growth failure data from YAML, or from CSV with `time[,count]` columns
pub fn load_growth(path: &Path) -> Result<GrowthFile, LoadError> {
    if is_csv(path) {
        let failures = load_failures_csv(path)?;
        return Ok(GrowthFile {
            kind: InputKind::Growth.to_string(),
            title: None,
            termination_time: 0.0,
            grouped: false,
            confidence: 0.90,
            failures,
            plan: None,
        });
    }
    let body = read_to_string(path)?;
    expect_kind(path, &body, InputKind::Growth)?;
    parse_yaml(path, &body)
}

/// Load survival observations from YAML, or from CSV with
/// `time[,right][,status][,quantity]` columns
pub fn load_survival(path: &Path) -> Result<SurvivalFile, LoadError> {
    if is_csv(path) {
        let observations = load_observations_csv(path)?;
        return Ok(SurvivalFile {
            kind: InputKind::Survival.to_string(),
            title: None,
            confidence: 0.90,
            time_limit: 0.0,
            observations,
        });
    }
    let body = read_to_string(path)?;
    expect_kind(path, &body, InputKind::Survival)?;
    parse_yaml(path, &body)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Read `(time, count)` failure rows from a headered CSV file
pub fn load_failures_csv(path: &Path) -> Result<Vec<FailureRecord>, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    let mut failures = Vec::new();
    for row in reader.deserialize() {
        let record: FailureRecord = row.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        failures.push(record);
    }
    Ok(failures)
}

/// Read survival observation rows from a headered CSV file
pub fn load_observations_csv(path: &Path) -> Result<Vec<SurvivalObservation>, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    let mut observations = Vec::new();
    for row in reader.deserialize() {
        let record: SurvivalObservation = row.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        observations.push(record);
    }
    Ok(observations)
}
