//! `lrt growth` command - reliability growth fitting, planning and simulation

use std::path::PathBuf;

use console::style;
use miette::Result;
use rand::SeedableRng;
use serde::Serialize;
use tabled::Tabled;

use crate::analysis::growth::crow_amsaa::{
    calculate_cramer_von_mises, calculate_crow_amsaa_chi_square, calculate_mean_profile,
    chi_square_critical_values, cramer_von_mises_critical_value, fit_power_law,
};
use crate::analysis::growth::curves::solve_growth_rate;
use crate::analysis::growth::duane::{calculate_duane_mean, calculate_duane_parameters};
use crate::analysis::growth::simulation::simulate_power_law;
use crate::analysis::growth::{planning, BoundsMethod, FitMethod};
use crate::cli::commands::record_run;
use crate::cli::output::{self, OutputFormat};
use crate::cli::viz;
use crate::records::loader;
use crate::records::GrowthFile;

#[derive(clap::Subcommand, Debug)]
pub enum GrowthCommand {
    /// Fit the Duane or Crow-AMSAA model to failure data
    Fit(FitArgs),
    /// SPLAN program planning tables
    Plan(PlanArgs),
    /// Simulate failure histories from a fitted power law
    Simulate(SimulateArgs),
    /// Braille plot of the cumulative MTBF growth
    Plot(PlotArgs),
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelArg {
    Duane,
    CrowAmsaa,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum FitArg {
    Mle,
    Regression,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum BoundsArg {
    Fisher,
    Crow,
}

#[derive(clap::Args, Debug)]
pub struct FitArgs {
    /// Growth input file (YAML, or CSV with time[,count] columns)
    #[arg(long, short)]
    pub input: PathBuf,

    /// Growth model
    #[arg(long, value_enum, default_value_t = ModelArg::CrowAmsaa)]
    pub model: ModelArg,

    /// Parameter estimation method
    #[arg(long, value_enum, default_value_t = FitArg::Mle)]
    pub fit: FitArg,

    /// Confidence bound construction for MLE fits
    #[arg(long, value_enum, default_value_t = BoundsArg::Crow)]
    pub bounds: BoundsArg,

    /// Confidence level, fraction or percent (default: from the input file)
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Growth input file with a plan section
    #[arg(long, short)]
    pub input: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct SimulateArgs {
    /// Growth input file the power law is fitted to
    #[arg(long, short)]
    pub input: PathBuf,

    /// Number of histories to draw
    #[arg(long, short = 'n', default_value_t = 10)]
    pub histories: usize,

    /// Seed for reproducible draws
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(clap::Args, Debug)]
pub struct PlotArgs {
    /// Growth input file
    #[arg(long, short)]
    pub input: PathBuf,

    /// Canvas width in braille cells
    #[arg(long, default_value_t = viz::PLOT_WIDTH)]
    pub width: u32,

    /// Canvas height in braille cells
    #[arg(long, default_value_t = viz::PLOT_HEIGHT)]
    pub height: u32,
}

#[derive(Debug, Tabled, Serialize)]
struct ParameterRow {
    #[tabled(rename = "Parameter")]
    parameter: String,
    #[tabled(rename = "Lower")]
    lower: f64,
    #[tabled(rename = "Point")]
    point: f64,
    #[tabled(rename = "Upper")]
    upper: f64,
}

#[derive(Debug, Tabled, Serialize)]
struct PlanRow {
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Value")]
    value: f64,
}

#[derive(Debug, Tabled, Serialize)]
struct PhaseRow {
    #[tabled(rename = "Phase")]
    name: String,
    #[tabled(rename = "Cumulative time")]
    cumulative_time: f64,
    #[tabled(rename = "Expected failures")]
    expected_failures: f64,
    #[tabled(rename = "Average MTBF")]
    average_mtbf: f64,
    #[tabled(rename = "Phase final MTBF")]
    final_mtbf: f64,
}

#[derive(Debug, Tabled, Serialize)]
struct HistoryRow {
    #[tabled(rename = "History")]
    history: usize,
    #[tabled(rename = "Failures")]
    failures: usize,
    #[tabled(rename = "Last failure")]
    last_failure: f64,
    #[tabled(rename = "Cumulative MTBF")]
    cumulative_mtbf: f64,
}

pub fn run(command: GrowthCommand) -> Result<()> {
    match command {
        GrowthCommand::Fit(args) => run_fit(args),
        GrowthCommand::Plan(args) => run_plan(args),
        GrowthCommand::Simulate(args) => run_simulate(args),
        GrowthCommand::Plot(args) => run_plot(args),
    }
}

fn load(input: &PathBuf) -> Result<GrowthFile> {
    loader::load_growth(input).map_err(|e| miette::miette!("{}", e))
}

fn run_fit(args: FitArgs) -> Result<()> {
    let growth = load(&args.input)?;
    let (counts, times) = growth.observations();
    let confidence = args.confidence.unwrap_or(growth.confidence);

    if args.model == ModelArg::Duane {
        return run_duane_fit(&args, &growth, &counts, &times);
    }

    let fit_method = match args.fit {
        FitArg::Mle => FitMethod::Mle,
        FitArg::Regression => FitMethod::Regression,
    };
    let bounds_method = match args.bounds {
        BoundsArg::Fisher => BoundsMethod::Fisher,
        BoundsArg::Crow => BoundsMethod::Crow,
    };

    let fit = fit_power_law(
        &counts,
        &times,
        growth.grouped,
        fit_method,
        bounds_method,
        confidence,
        growth.termination_time,
    )
    .map_err(|e| miette::miette!("{}", e))?;
    let rate = fit.growth_rate();

    let rows = vec![
        ParameterRow {
            parameter: "scale (lambda)".to_string(),
            lower: fit.scale.lower,
            point: fit.scale.point,
            upper: fit.scale.upper,
        },
        ParameterRow {
            parameter: "shape (beta)".to_string(),
            lower: fit.shape.lower,
            point: fit.shape.point,
            upper: fit.shape.upper,
        },
        ParameterRow {
            parameter: "growth rate".to_string(),
            lower: rate.lower,
            point: rate.point,
            upper: rate.upper,
        },
    ];
    output::emit(&rows, args.format)?;

    report_goodness_of_fit(&growth, &counts, &times, fit.scale.point, fit.shape.point, confidence);

    record_run(
        "growth fit",
        &args.input,
        serde_json::json!({
            "model": "crow-amsaa",
            "scale": fit.scale.point,
            "shape": fit.shape.point,
            "growth_rate": rate.point,
            "confidence": confidence,
        }),
    )?;
    Ok(())
}

fn run_duane_fit(
    args: &FitArgs,
    growth: &GrowthFile,
    counts: &[f64],
    times: &[f64],
) -> Result<()> {
    let (alpha, beta) = calculate_duane_parameters(counts, times);
    let end_time = if growth.termination_time > 0.0 {
        growth.termination_time
    } else {
        times.iter().cloned().fold(0.0, f64::max)
    };
    let (cumulative, instantaneous) = calculate_duane_mean(alpha, beta, end_time);

    let rows = vec![
        PlanRow {
            quantity: "growth slope (alpha)".to_string(),
            value: alpha,
        },
        PlanRow {
            quantity: "scale (b)".to_string(),
            value: beta,
        },
        PlanRow {
            quantity: format!("cumulative MTBF at {end_time} h"),
            value: cumulative,
        },
        PlanRow {
            quantity: format!("instantaneous MTBF at {end_time} h"),
            value: instantaneous,
        },
    ];
    output::emit(&rows, args.format)?;

    record_run(
        "growth fit",
        &args.input,
        serde_json::json!({
            "model": "duane",
            "alpha": alpha,
            "b": beta,
            "cumulative_mtbf": cumulative,
            "instantaneous_mtbf": instantaneous,
        }),
    )?;
    Ok(())
}

fn report_goodness_of_fit(
    growth: &GrowthFile,
    counts: &[f64],
    times: &[f64],
    lambda: f64,
    beta: f64,
    confidence: f64,
) {
    let total: f64 = counts.iter().sum();
    let time_terminated = growth.termination_time > 0.0;

    if growth.grouped {
        match calculate_crow_amsaa_chi_square(counts, times, lambda, beta, true) {
            Ok(statistic) => {
                let (low, high) =
                    chi_square_critical_values(total, times.len(), confidence, true, time_terminated);
                let verdict = if statistic > low && statistic < high {
                    style("model fits").green()
                } else {
                    style("model rejected").red()
                };
                println!(
                    "chi-square {} against ({}, {}): {}",
                    statistic, low, high, verdict
                );
            }
            Err(err) => println!("{} {}", style("!").yellow(), err),
        }
        return;
    }

    match calculate_cramer_von_mises(times, beta, growth.termination_time, !time_terminated) {
        Ok(statistic) => match cramer_von_mises_critical_value(total as usize, confidence) {
            Ok(critical) => {
                let verdict = if statistic < critical {
                    style("model fits").green()
                } else {
                    style("model rejected").red()
                };
                println!(
                    "Cramér-von Mises {} against critical {}: {}",
                    statistic, critical, verdict
                );
            }
            Err(err) => println!("{} {}", style("!").yellow(), err),
        },
        Err(err) => println!("{} {}", style("!").yellow(), err),
    }
}

fn run_plan(args: PlanArgs) -> Result<()> {
    let growth = load(&args.input)?;
    let plan = growth
        .plan
        .as_ref()
        .ok_or_else(|| miette::miette!("{} has no plan section", args.input.display()))?;

    let mut initial_mtbf = plan.mtbf_initial;
    if initial_mtbf <= 0.0 {
        initial_mtbf = planning::calculate_initial_mtbf(
            plan.total_time,
            plan.first_phase_time,
            plan.mtbf_goal,
            plan.growth_rate,
            plan.management_strategy,
            plan.probability,
        );
    }
    let mut growth_rate = plan.growth_rate;
    if growth_rate <= 0.0 {
        growth_rate = solve_growth_rate(
            initial_mtbf,
            plan.mtbf_goal,
            plan.total_time,
            plan.first_phase_time,
        );
    }

    let final_mtbf = planning::calculate_final_mtbf(
        plan.total_time,
        plan.first_phase_time,
        initial_mtbf,
        growth_rate,
    );
    let (expected_failures, average_mtbf) = planning::calculate_average_mtbf(
        plan.total_time,
        plan.first_phase_time,
        initial_mtbf,
        growth_rate,
        0.0,
        0.0,
    );
    let probability = if plan.probability > 0.0 {
        plan.probability
    } else {
        planning::calculate_probability(
            plan.first_phase_time,
            plan.management_strategy,
            initial_mtbf,
        )
    };
    let growth_potential = planning::calculate_growth_potential(
        average_mtbf,
        plan.management_strategy,
        plan.fix_effectiveness,
    );
    let minimum_first_phase = planning::calculate_minimum_first_phase_time(
        plan.total_time,
        plan.mtbf_goal,
        average_mtbf,
        growth_rate,
    );

    let rows = vec![
        PlanRow {
            quantity: "initial MTBF".to_string(),
            value: initial_mtbf,
        },
        PlanRow {
            quantity: "goal MTBF".to_string(),
            value: plan.mtbf_goal,
        },
        PlanRow {
            quantity: "final MTBF".to_string(),
            value: final_mtbf,
        },
        PlanRow {
            quantity: "growth rate".to_string(),
            value: growth_rate,
        },
        PlanRow {
            quantity: "average MTBF".to_string(),
            value: average_mtbf,
        },
        PlanRow {
            quantity: "expected failures".to_string(),
            value: expected_failures,
        },
        PlanRow {
            quantity: "probability of failure in phase 1".to_string(),
            value: probability,
        },
        PlanRow {
            quantity: "growth potential MTBF".to_string(),
            value: growth_potential,
        },
        PlanRow {
            quantity: "minimum first phase time".to_string(),
            value: minimum_first_phase,
        },
    ];
    output::emit(&rows, args.format)?;

    if growth_potential.is_finite() && plan.mtbf_goal > growth_potential {
        println!(
            "{} goal MTBF {} exceeds the growth potential {}",
            style("!").yellow().bold(),
            plan.mtbf_goal,
            growth_potential
        );
    }

    if !plan.phases.is_empty() {
        let mut phase_rows = Vec::new();
        let mut previous_time = 0.0;
        let mut previous_failures = 0.0;
        for (index, phase) in plan.phases.iter().enumerate() {
            let (n_failures, derived_average) = planning::calculate_average_mtbf(
                phase.cumulative_time,
                plan.first_phase_time,
                initial_mtbf,
                growth_rate,
                previous_time,
                previous_failures,
            );
            let average = if phase.mtbf_average > 0.0 {
                phase.mtbf_average
            } else {
                derived_average
            };
            let name = if phase.name.is_empty() {
                format!("phase {}", index + 1)
            } else {
                phase.name.clone()
            };

            phase_rows.push(PhaseRow {
                name,
                cumulative_time: phase.cumulative_time,
                expected_failures: n_failures,
                average_mtbf: average,
                final_mtbf: planning::calculate_final_mtbf(
                    phase.cumulative_time,
                    plan.first_phase_time,
                    initial_mtbf,
                    growth_rate,
                ),
            });
            previous_time = phase.cumulative_time;
            previous_failures += n_failures;
        }

        println!();
        output::emit(&phase_rows, args.format)?;
    }

    record_run(
        "growth plan",
        &args.input,
        serde_json::json!({
            "initial_mtbf": initial_mtbf,
            "final_mtbf": final_mtbf,
            "growth_rate": growth_rate,
            "growth_potential": growth_potential,
        }),
    )?;
    Ok(())
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    let growth = load(&args.input)?;
    let (counts, times) = growth.observations();

    let fit = fit_power_law(
        &counts,
        &times,
        growth.grouped,
        FitMethod::Mle,
        BoundsMethod::Crow,
        growth.confidence,
        growth.termination_time,
    )
    .map_err(|e| miette::miette!("{}", e))?;

    let t_max = if growth.termination_time > 0.0 {
        growth.termination_time
    } else {
        times.iter().cloned().fold(0.0, f64::max)
    };

    let mut rng: Box<dyn rand::RngCore> = match args.seed {
        Some(seed) => Box::new(rand::rngs::StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rngs::StdRng::from_os_rng()),
    };

    let mut rows = Vec::new();
    for history in 1..=args.histories {
        let draws = simulate_power_law(fit.scale.point, fit.shape.point, t_max, &mut rng);
        let last_failure = draws.last().copied().unwrap_or(0.0);
        let cumulative_mtbf = if draws.is_empty() {
            f64::INFINITY
        } else {
            t_max / draws.len() as f64
        };
        rows.push(HistoryRow {
            history,
            failures: draws.len(),
            last_failure,
            cumulative_mtbf,
        });
    }

    println!(
        "simulating N(t) = {} * t^{} up to {} h",
        fit.scale.point, fit.shape.point, t_max
    );
    output::emit(&rows, args.format)?;

    record_run(
        "growth simulate",
        &args.input,
        serde_json::json!({
            "histories": args.histories,
            "scale": fit.scale.point,
            "shape": fit.shape.point,
            "t_max": t_max,
        }),
    )?;
    Ok(())
}

fn run_plot(args: PlotArgs) -> Result<()> {
    let growth = load(&args.input)?;
    let (counts, times) = growth.observations();

    let fit = fit_power_law(
        &counts,
        &times,
        growth.grouped,
        FitMethod::Mle,
        BoundsMethod::Crow,
        growth.confidence,
        growth.termination_time,
    )
    .map_err(|e| miette::miette!("{}", e))?;

    let profile = calculate_mean_profile(&counts, &times, &fit, growth.confidence)
        .map_err(|e| miette::miette!("{}", e))?;

    let xs: Vec<f64> = profile.iter().map(|point| point.time).collect();
    let ys: Vec<f64> = profile.iter().map(|point| point.cumulative.point).collect();

    output::heading(&format!(
        "Cumulative MTBF, beta = {}",
        fit.shape.point
    ));
    println!("{}", viz::render_line(&xs, &ys, args.width, args.height));
    Ok(())
}
