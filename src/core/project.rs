//! Project discovery and initialization
//!
//! An `lrt` project is any directory holding a `.lrt/` marker. Commands
//! that need project context walk up from the working directory until they
//! find one; analysis inputs live in `records/` and the run history in
//! `.lrt/history.db`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

use crate::core::config::Config;

/// Name of the project marker directory.
pub const PROJECT_DIR: &str = ".lrt";

/// Suffix every analysis input file carries.
pub const INPUT_SUFFIX: &str = ".lrt.yaml";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not inside an lrt project (no {PROJECT_DIR} directory found walking up from {0})")]
    NotFound(PathBuf),

    #[error("an lrt project already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write default config: {0}")]
    Config(#[from] serde_yml::Error),
}

/// A discovered or freshly initialized project root
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Walk up from the current directory to the nearest project root
    pub fn discover() -> Result<Self, ProjectError> {
        let cwd = std::env::current_dir().map_err(|source| ProjectError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Self::discover_from(&cwd)
    }

    /// Walk up from `start` to the nearest project root
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut dir = Some(start);
        while let Some(candidate) = dir {
            if candidate.join(PROJECT_DIR).is_dir() {
                return Ok(Self {
                    root: candidate.to_path_buf(),
                });
            }
            dir = candidate.parent();
        }
        Err(ProjectError::NotFound(start.to_path_buf()))
    }

    /// Create the project skeleton at `path`
    ///
    /// Writes `.lrt/config.yaml` with the default configuration and the
    /// empty `records/` and `data/` directories. Refuses to touch an
    /// existing project unless `force` is set.
    pub fn init(path: &Path, force: bool) -> Result<Self, ProjectError> {
        let marker = path.join(PROJECT_DIR);
        if marker.exists() && !force {
            return Err(ProjectError::AlreadyExists(path.to_path_buf()));
        }

        for dir in [marker.as_path(), &path.join("records"), &path.join("data")] {
            std::fs::create_dir_all(dir).map_err(|source| ProjectError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let project = Self {
            root: path.to_path_buf(),
        };
        let config = Config::default();
        let body = serde_yml::to_string(&config)?;
        std::fs::write(project.config_path(), body).map_err(|source| ProjectError::Io {
            path: project.config_path(),
            source,
        })?;

        Ok(project)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lrt_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    pub fn config_path(&self) -> PathBuf {
        self.lrt_dir().join("config.yaml")
    }

    pub fn history_db_path(&self) -> PathBuf {
        self.lrt_dir().join("history.db")
    }

    pub fn records_dir(&self) -> PathBuf {
        self.root.join("records")
    }

    /// Every `*.lrt.yaml` input file under the project root, sorted
    ///
    /// Skips the `.lrt/` directory itself so scratch copies in the marker
    /// directory never show up as inputs.
    pub fn find_input_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != PROJECT_DIR)
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry.file_name().to_string_lossy().ends_with(INPUT_SUFFIX)
            })
            .map(|entry| entry.into_path())
            .collect();
        files.sort();
        files
    }
}
