//! CLI command implementations

pub mod completions;
pub mod config;
pub mod derate;
pub mod fmea;
pub mod growth;
pub mod history;
pub mod init;
pub mod new;
pub mod predict;
pub mod survival;
pub mod validate;

use std::path::Path;

use miette::Result;

use crate::core::{HistoryStore, Project, RunRecord};

/// Record a finished analysis run into the project history.
///
/// Outside a project this is a no-op; analysis commands stay usable on
/// loose files.
pub(crate) fn record_run(
    command: &str,
    input: &Path,
    summary: serde_json::Value,
) -> Result<()> {
    let Ok(project) = Project::discover() else {
        return Ok(());
    };

    let store = HistoryStore::open(&project.history_db_path())
        .map_err(|e| miette::miette!("{}", e))?;
    let run = RunRecord::new(command, input, summary).map_err(|e| miette::miette!("{}", e))?;
    store.record(&run).map_err(|e| miette::miette!("{}", e))?;
    Ok(())
}
