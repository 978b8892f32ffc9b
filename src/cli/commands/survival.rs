//! `lrt survival` command - nonparametric survival estimation

use std::path::PathBuf;

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::Tabled;

use crate::analysis::survival::turnbull::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::analysis::survival::{
    calculate_kaplan_meier, calculate_kaplan_meier_hazard, calculate_kaplan_meier_mean,
    calculate_turnbull, KaplanMeierFit, TurnbullFit,
};
use crate::cli::commands::record_run;
use crate::cli::output::{self, OutputFormat};
use crate::cli::viz;
use crate::records::loader;
use crate::records::SurvivalFile;

#[derive(clap::Subcommand, Debug)]
pub enum SurvivalCommand {
    /// Fit a survival curve to the observations
    Fit(FitArgs),
    /// Restricted mean life from the product-limit table
    Mean(MeanArgs),
    /// Braille plot of the survival curve
    Plot(PlotArgs),
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorArg {
    /// Product-limit estimator for exact and right censored data
    KaplanMeier,
    /// Self-consistency estimator for interval censored data
    Turnbull,
}

#[derive(clap::Args, Debug)]
pub struct FitArgs {
    /// Survival input file (YAML, or CSV with time[,right,status,quantity])
    #[arg(long, short)]
    pub input: PathBuf,

    /// Which estimator to fit
    #[arg(long, value_enum, default_value_t = EstimatorArg::KaplanMeier)]
    pub estimator: EstimatorArg,

    /// Confidence level, fraction or percent (default: from the input file)
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Also print the hazard rate table
    #[arg(long)]
    pub hazard: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct MeanArgs {
    /// Survival input file
    #[arg(long, short)]
    pub input: PathBuf,

    /// Confidence level, fraction or percent (default: from the input file)
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct PlotArgs {
    /// Survival input file
    #[arg(long, short)]
    pub input: PathBuf,

    /// Which estimator to plot
    #[arg(long, value_enum, default_value_t = EstimatorArg::KaplanMeier)]
    pub estimator: EstimatorArg,

    /// Canvas width in braille cells
    #[arg(long, default_value_t = viz::PLOT_WIDTH)]
    pub width: u32,

    /// Canvas height in braille cells
    #[arg(long, default_value_t = viz::PLOT_HEIGHT)]
    pub height: u32,
}

#[derive(Debug, Tabled, Serialize)]
struct KaplanMeierTableRow {
    #[tabled(rename = "Time")]
    time: f64,
    #[tabled(rename = "At risk")]
    n_at_risk: usize,
    #[tabled(rename = "Events")]
    n_events: usize,
    #[tabled(rename = "Lower")]
    lower: f64,
    #[tabled(rename = "S(t)")]
    s_hat: f64,
    #[tabled(rename = "Upper")]
    upper: f64,
}

#[derive(Debug, Tabled, Serialize)]
struct HazardTableRow {
    #[tabled(rename = "Time")]
    time: f64,
    #[tabled(rename = "Hazard")]
    hazard: f64,
    #[tabled(rename = "Cumulative")]
    cumulative: f64,
    #[tabled(rename = "ln(cumulative)")]
    log_cumulative: f64,
}

#[derive(Debug, Tabled, Serialize)]
struct TurnbullTableRow {
    #[tabled(rename = "Interval")]
    interval: String,
    #[tabled(rename = "Probability")]
    probability: f64,
    #[tabled(rename = "S(t)")]
    survival: f64,
}

#[derive(Debug, Tabled, Serialize)]
struct MeanRow {
    #[tabled(rename = "Lower")]
    lower: f64,
    #[tabled(rename = "Mean life")]
    mean: f64,
    #[tabled(rename = "Upper")]
    upper: f64,
    #[tabled(rename = "Variance")]
    variance: f64,
}

pub fn run(command: SurvivalCommand) -> Result<()> {
    match command {
        SurvivalCommand::Fit(args) => run_fit(args),
        SurvivalCommand::Mean(args) => run_mean(args),
        SurvivalCommand::Plot(args) => run_plot(args),
    }
}

fn load(input: &PathBuf) -> Result<SurvivalFile> {
    loader::load_survival(input).map_err(|e| miette::miette!("{}", e))
}

fn fit_kaplan_meier(file: &SurvivalFile, confidence: f64) -> Result<KaplanMeierFit> {
    calculate_kaplan_meier(&file.km_observations(), 0.0, file.time_limit, confidence)
        .map_err(|e| miette::miette!("{}", e))
}

fn fit_turnbull(file: &SurvivalFile) -> Result<TurnbullFit> {
    calculate_turnbull(&file.intervals(), DEFAULT_TOLERANCE, DEFAULT_MAX_ITERATIONS)
        .map_err(|e| miette::miette!("{}", e))
}

fn run_fit(args: FitArgs) -> Result<()> {
    let file = load(&args.input)?;
    let confidence = args.confidence.unwrap_or(file.confidence);

    match args.estimator {
        EstimatorArg::KaplanMeier => {
            let fit = fit_kaplan_meier(&file, confidence)?;
            let rows: Vec<KaplanMeierTableRow> = fit
                .rows
                .iter()
                .map(|row| KaplanMeierTableRow {
                    time: row.time,
                    n_at_risk: row.n_at_risk,
                    n_events: row.n_events,
                    lower: row.lower,
                    s_hat: row.s_hat,
                    upper: row.upper,
                })
                .collect();
            output::emit(&rows, args.format)?;

            if args.hazard {
                let hazard: Vec<HazardTableRow> = calculate_kaplan_meier_hazard(&fit)
                    .iter()
                    .map(|row| HazardTableRow {
                        time: row.time,
                        hazard: row.hazard.1,
                        cumulative: row.cumulative.1,
                        log_cumulative: row.log_cumulative.1,
                    })
                    .collect();
                println!();
                output::emit(&hazard, args.format)?;
            }

            record_run(
                "survival fit",
                &args.input,
                serde_json::json!({
                    "estimator": "kaplan-meier",
                    "observations": fit.n_total,
                    "steps": fit.rows.len(),
                    "confidence": fit.confidence,
                }),
            )?;
        }
        EstimatorArg::Turnbull => {
            let fit = fit_turnbull(&file)?;
            let rows = turnbull_rows(&fit);
            output::emit(&rows, args.format)?;

            if !fit.converged {
                println!(
                    "{} stopped after {} iterations without converging",
                    style("!").yellow().bold(),
                    fit.iterations
                );
            }

            record_run(
                "survival fit",
                &args.input,
                serde_json::json!({
                    "estimator": "turnbull",
                    "intervals": fit.probabilities.len(),
                    "iterations": fit.iterations,
                    "converged": fit.converged,
                }),
            )?;
        }
    }
    Ok(())
}

fn turnbull_rows(fit: &TurnbullFit) -> Vec<TurnbullTableRow> {
    fit.probabilities
        .iter()
        .enumerate()
        .map(|(j, &probability)| TurnbullTableRow {
            interval: format!("[{}, {})", fit.tau[j], fit.tau[j + 1]),
            probability,
            survival: fit.survival[j + 1],
        })
        .collect()
}

fn run_mean(args: MeanArgs) -> Result<()> {
    let file = load(&args.input)?;
    let confidence = args.confidence.unwrap_or(file.confidence);

    let fit = fit_kaplan_meier(&file, confidence)?;
    let mean = calculate_kaplan_meier_mean(&fit, confidence).map_err(|e| miette::miette!("{}", e))?;

    output::emit(
        &[MeanRow {
            lower: mean.lower,
            mean: mean.mean,
            upper: mean.upper,
            variance: mean.variance,
        }],
        args.format,
    )?;

    record_run(
        "survival mean",
        &args.input,
        serde_json::json!({
            "mean": mean.mean,
            "lower": mean.lower,
            "upper": mean.upper,
            "confidence": fit.confidence,
        }),
    )?;
    Ok(())
}

fn run_plot(args: PlotArgs) -> Result<()> {
    let file = load(&args.input)?;

    let (xs, ys) = match args.estimator {
        EstimatorArg::KaplanMeier => {
            let fit = fit_kaplan_meier(&file, file.confidence)?;
            let mut xs = vec![0.0];
            let mut ys = vec![1.0];
            for row in &fit.rows {
                xs.push(row.time);
                ys.push(row.s_hat);
            }
            (xs, ys)
        }
        EstimatorArg::Turnbull => {
            let fit = fit_turnbull(&file)?;
            let points: Vec<(f64, f64)> = fit
                .tau
                .iter()
                .zip(&fit.survival)
                .filter(|(tau, _)| tau.is_finite())
                .map(|(&tau, &s)| (tau, s))
                .collect();
            (
                points.iter().map(|p| p.0).collect(),
                points.iter().map(|p| p.1).collect(),
            )
        }
    };

    output::heading("Survival probability");
    println!("{}", viz::render_steps(&xs, &ys, args.width, args.height));
    Ok(())
}
