//! `lrt fmea` command - RPN and mode criticality

use std::path::PathBuf;

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::analysis::fmea;
use crate::cli::commands::record_run;
use crate::cli::output::{self, OutputFormat};
use crate::records::loader;

#[derive(clap::Args, Debug)]
pub struct FmeaArgs {
    /// FMEA input file
    #[arg(long, short)]
    pub input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Tabled, Serialize)]
struct FmeaRow {
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Sev")]
    severity: u32,
    #[tabled(rename = "Occ")]
    occurrence: u32,
    #[tabled(rename = "Det")]
    detection: u32,
    #[tabled(rename = "RPN")]
    rpn: u32,
    #[tabled(rename = "Mode rate (fpmh)")]
    mode_hazard_rate: f64,
    #[tabled(rename = "Criticality")]
    mode_criticality: f64,
}

pub fn run(args: FmeaArgs) -> Result<()> {
    let file = loader::load_fmea(&args.input).map_err(|e| miette::miette!("{}", e))?;

    let mut rows = Vec::new();
    let mut item_criticality = 0.0;
    for mode in &file.modes {
        let rpn = fmea::calculate_rpn(mode.severity, mode.occurrence, mode.detection)
            .map_err(|e| miette::miette!("mode '{}': {}", mode.description, e))?;
        let mode_hazard_rate =
            fmea::calculate_mode_hazard_rate(file.item_hazard_rate, mode.mode_ratio)
                .map_err(|e| miette::miette!("mode '{}': {}", mode.description, e))?;
        let mode_criticality = fmea::calculate_mode_criticality(
            mode_hazard_rate,
            file.mission_time,
            mode.effect_probability,
        )
        .map_err(|e| miette::miette!("mode '{}': {}", mode.description, e))?;

        item_criticality += mode_criticality;
        rows.push(FmeaRow {
            mode: mode.description.clone(),
            severity: mode.severity,
            occurrence: mode.occurrence,
            detection: mode.detection,
            rpn,
            mode_hazard_rate,
            mode_criticality,
        });
    }

    output::emit(&rows, args.format)?;
    println!(
        "{} item criticality {} over a {} h mission",
        style("Σ").bold(),
        item_criticality,
        file.mission_time
    );

    record_run(
        "fmea",
        &args.input,
        serde_json::json!({
            "modes": rows.len(),
            "item_criticality": item_criticality,
            "max_rpn": rows.iter().map(|r| r.rpn).max(),
        }),
    )?;

    Ok(())
}
