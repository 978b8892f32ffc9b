//! `lrt predict` command - MIL-HDBK-217F hazard rates

use std::path::PathBuf;

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::analysis::milhdbk217f::{self, PredictionMethod};
use crate::cli::commands::record_run;
use crate::cli::output::{self, OutputFormat};
use crate::records::loader;

#[derive(clap::Subcommand, Debug)]
pub enum PredictCommand {
    /// Part count prediction from environment-keyed base rates
    PartCount(PredictArgs),
    /// Part stress prediction from the full pi factor model
    PartStress(PredictArgs),
}

#[derive(clap::Args, Debug)]
pub struct PredictArgs {
    /// Components input file
    #[arg(long, short)]
    pub input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Append a totals row
    #[arg(long)]
    pub totals: bool,

    /// Report per-record errors but exit zero anyway
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Debug, Tabled, Serialize)]
struct PredictionRow {
    #[tabled(rename = "ID")]
    hardware_id: u32,
    #[tabled(rename = "Family")]
    family: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    /// Active hazard rate for the whole record, failures per million hours
    #[tabled(rename = "Hazard rate (fpmh)")]
    hazard_rate: f64,
}

pub fn run(command: PredictCommand) -> Result<()> {
    let (args, method) = match command {
        PredictCommand::PartCount(args) => (args, PredictionMethod::PartCount),
        PredictCommand::PartStress(args) => (args, PredictionMethod::PartStress),
    };

    let file = loader::load_components(&args.input).map_err(|e| miette::miette!("{}", e))?;

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    let mut total = 0.0;
    for component in &file.components {
        let mut record = component.clone();
        milhdbk217f::set_default_values(&mut record);
        match milhdbk217f::calculate_hazard_rate(&mut record, method) {
            Ok(rate) => {
                total += rate;
                rows.push(PredictionRow {
                    hardware_id: record.hardware_id(),
                    family: record.family_name().to_string(),
                    description: record.description().to_string(),
                    quantity: record.quantity(),
                    hazard_rate: rate,
                });
            }
            Err(err) => errors.push(format!("record {}: {}", component.hardware_id(), err)),
        }
    }
    let n_calculated = rows.len();

    if args.totals {
        rows.push(PredictionRow {
            hardware_id: 0,
            family: String::new(),
            description: "TOTAL".to_string(),
            quantity: 0,
            hazard_rate: total,
        });
    }

    output::emit(&rows, args.format)?;

    for error in &errors {
        eprintln!("{} {}", style("✗").red(), error);
    }

    record_run(
        &format!("predict {}", method),
        &args.input,
        serde_json::json!({
            "method": method.to_string(),
            "records": n_calculated,
            "failed": errors.len(),
            "total_hazard_rate": total,
        }),
    )?;

    if !errors.is_empty() && !args.keep_going {
        return Err(miette::miette!(
            "{} record(s) failed prediction",
            errors.len()
        ));
    }
    Ok(())
}
