//! Command line argument definitions

use clap::{Parser, Subcommand};

use crate::cli::commands;

#[derive(Parser, Debug)]
#[command(
    name = "lrt",
    version,
    about = "Plain-text reliability analysis toolkit",
    long_about = "MIL-HDBK-217F hazard rate prediction, derating checks, FMEA criticality, \
                  reliability growth and survival analysis over plain-text YAML/CSV inputs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new lrt project
    Init(commands::init::InitArgs),

    /// Show or edit the layered configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Write a starter analysis input file
    New(commands::new::NewArgs),

    /// Validate input files against the embedded schemas
    Validate(commands::validate::ValidateArgs),

    /// MIL-HDBK-217F hazard rate prediction
    #[command(subcommand)]
    Predict(commands::predict::PredictCommand),

    /// Check operating stresses against derating limits
    Derate(commands::derate::DerateArgs),

    /// FMEA criticality and risk priority numbers
    Fmea(commands::fmea::FmeaArgs),

    /// Reliability growth fitting, planning and simulation
    #[command(subcommand)]
    Growth(commands::growth::GrowthCommand),

    /// Kaplan-Meier and Turnbull survival analysis
    #[command(subcommand)]
    Survival(commands::survival::SurvivalCommand),

    /// Past analysis runs recorded in the project history
    History(commands::history::HistoryArgs),

    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}
