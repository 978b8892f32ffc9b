//! `lrt derate` command - overstress report

use std::path::PathBuf;

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::analysis::derating;
use crate::analysis::milhdbk217f::{self, PredictionMethod};
use crate::cli::commands::record_run;
use crate::cli::output::{self, OutputFormat};
use crate::records::loader;
use crate::records::ComponentRecord;

#[derive(clap::Args, Debug)]
pub struct DerateArgs {
    /// Components input file
    #[arg(long, short)]
    pub input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Tabled, Serialize)]
struct DeratingRow {
    #[tabled(rename = "ID")]
    hardware_id: u32,
    #[tabled(rename = "Family")]
    family: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Environment")]
    environment: String,
    #[tabled(rename = "Overstress")]
    overstressed: bool,
    #[tabled(rename = "Reason")]
    reason: String,
}

pub fn run(args: DerateArgs) -> Result<()> {
    let file = loader::load_components(&args.input).map_err(|e| miette::miette!("{}", e))?;

    let mut rows = Vec::new();
    let mut overstressed_count = 0usize;
    for component in &file.components {
        let mut record = component.clone();
        milhdbk217f::set_default_values(&mut record);
        // The part stress model fills derived stresses (inductor hot spot);
        // an error here still leaves the record checkable.
        let _ = milhdbk217f::calculate_hazard_rate(&mut record, PredictionMethod::PartStress);

        let (class, check) = check_record(&record)?;
        let (overstressed, reason) = check;
        if overstressed {
            overstressed_count += 1;
        }

        rows.push(DeratingRow {
            hardware_id: record.hardware_id(),
            family: record.family_name().to_string(),
            description: record.description().to_string(),
            environment: class.to_string(),
            overstressed,
            reason,
        });
    }

    output::emit(&rows, args.format)?;

    if overstressed_count > 0 {
        println!(
            "{} {} of {} record(s) overstressed",
            style("!").yellow().bold(),
            overstressed_count,
            rows.len()
        );
    } else {
        println!(
            "{} no overstress findings in {} record(s)",
            style("✓").green().bold(),
            rows.len()
        );
    }

    record_run(
        "derate",
        &args.input,
        serde_json::json!({
            "records": rows.len(),
            "overstressed": overstressed_count,
        }),
    )?;

    Ok(())
}

fn check_record(
    record: &ComponentRecord,
) -> Result<(derating::EnvironmentClass, (bool, String))> {
    match record {
        ComponentRecord::Capacitor(r) => {
            let class = derating::get_environment_class(r.environment_active_id)
                .map_err(|e| miette::miette!("record {}: {}", r.hardware_id, e))?;
            let check = derating::check_capacitor(
                r.subcategory_id,
                r.specification_id,
                class,
                r.voltage_ratio,
                r.voltage_reverse_ratio,
                r.temperature_active,
                r.temperature_rated_max,
            )
            .map_err(|e| miette::miette!("record {}: {}", r.hardware_id, e))?;
            Ok((class, check))
        }
        ComponentRecord::Inductor(r) => {
            let class = derating::get_environment_class(r.environment_active_id)
                .map_err(|e| miette::miette!("record {}: {}", r.hardware_id, e))?;
            let hot_spot = if r.temperature_hot_spot > 0.0 {
                r.temperature_hot_spot
            } else {
                r.temperature_active
            };
            let check = derating::check_inductor(
                r.subcategory_id,
                r.family_id,
                class,
                r.current_ratio,
                r.voltage_ratio,
                hot_spot,
                r.temperature_rated_max,
            )
            .map_err(|e| miette::miette!("record {}: {}", r.hardware_id, e))?;
            Ok((class, check))
        }
        ComponentRecord::Miscellaneous(r) => {
            let class = derating::get_environment_class(r.environment_active_id)
                .map_err(|e| miette::miette!("record {}: {}", r.hardware_id, e))?;
            // Only lamps carry derating limits among the miscellaneous parts.
            let check = if r.subcategory_id == 4 {
                derating::check_lamp(class, r.current_ratio)
            } else {
                (false, String::new())
            };
            Ok((class, check))
        }
    }
}
