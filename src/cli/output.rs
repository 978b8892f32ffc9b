//! Output formatting utilities

use clap::ValueEnum;
use console::style;
use miette::Result;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// How analysis results are rendered
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
    Csv,
}

/// Render one slice of result rows in the requested format
pub fn emit<T: Tabled + Serialize>(rows: &[T], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new(rows);
            table.with(Style::sharp());
            println!("{}", table);
        }
        OutputFormat::Json => {
            let body =
                serde_json::to_string_pretty(rows).map_err(|e| miette::miette!("{}", e))?;
            println!("{}", body);
        }
        OutputFormat::Yaml => {
            let body = serde_yml::to_string(&rows).map_err(|e| miette::miette!("{}", e))?;
            print!("{}", body);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                writer
                    .serialize(row)
                    .map_err(|e| miette::miette!("{}", e))?;
            }
            writer.flush().map_err(|e| miette::miette!("{}", e))?;
        }
    }
    Ok(())
}

pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

pub fn warn(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

pub fn heading(text: &str) {
    println!("{}", style(text).bold());
}
