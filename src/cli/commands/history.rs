//! `lrt history` command - recorded analysis runs

use console::style;
use dialoguer::Confirm;
use miette::Result;

use crate::core::{HistoryStore, Project};

#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: Option<HistoryCommand>,
}

#[derive(clap::Subcommand, Debug)]
pub enum HistoryCommand {
    /// Most recent runs, newest first
    List(ListArgs),
    /// Full detail of one run
    Show(ShowArgs),
    /// Delete every recorded run
    Clear(ClearArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// How many runs to show
    #[arg(long, short = 'n', default_value_t = 20)]
    pub limit: usize,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Run ID, full or unique prefix
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

pub fn run(args: HistoryArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store =
        HistoryStore::open(&project.history_db_path()).map_err(|e| miette::miette!("{}", e))?;

    match args.command.unwrap_or(HistoryCommand::List(ListArgs { limit: 20 })) {
        HistoryCommand::List(list) => run_list(&store, list.limit),
        HistoryCommand::Show(show) => run_show(&store, &show.id),
        HistoryCommand::Clear(clear) => run_clear(&store, clear.yes),
    }
}

fn run_list(store: &HistoryStore, limit: usize) -> Result<()> {
    let runs = store.list(limit).map_err(|e| miette::miette!("{}", e))?;
    if runs.is_empty() {
        println!("no recorded runs");
        return Ok(());
    }

    for run in runs {
        println!(
            "{}  {}  {}  {}",
            style(&run.id[..10]).cyan(),
            run.timestamp.format("%Y-%m-%d %H:%M"),
            style(&run.command).bold(),
            style(&run.input_path).dim(),
        );
    }
    Ok(())
}

fn run_show(store: &HistoryStore, id: &str) -> Result<()> {
    let run = store.get(id).map_err(|e| miette::miette!("{}", e))?;

    println!("{}      {}", style("id:").bold(), run.id);
    println!("{}    {}", style("time:").bold(), run.timestamp.to_rfc3339());
    println!("{} {}", style("command:").bold(), run.command);
    println!("{}   {}", style("input:").bold(), run.input_path);
    println!("{}  {}", style("digest:").bold(), run.input_digest);
    println!(
        "{} {}",
        style("summary:").bold(),
        serde_json::to_string_pretty(&run.summary).map_err(|e| miette::miette!("{}", e))?
    );
    Ok(())
}

fn run_clear(store: &HistoryStore, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete every recorded run?")
            .default(false)
            .interact()
            .map_err(|e| miette::miette!("{}", e))?;
        if !confirmed {
            println!("aborted");
            return Ok(());
        }
    }

    let removed = store.clear().map_err(|e| miette::miette!("{}", e))?;
    println!(
        "{} removed {} run(s)",
        style("✓").green().bold(),
        removed
    );
    Ok(())
}
