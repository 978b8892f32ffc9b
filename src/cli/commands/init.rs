//! `lrt init` command - scaffold a project

use std::path::PathBuf;

use console::style;
use dialoguer::Confirm;
use miette::Result;

use crate::core::project::{Project, PROJECT_DIR};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Reinitialize an existing project without asking
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let marker = args.path.join(PROJECT_DIR);
    let mut force = args.force;

    if marker.exists() && !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "A project already exists at {}. Reinitialize it?",
                args.path.display()
            ))
            .default(false)
            .interact()
            .map_err(|e| miette::miette!("{}", e))?;
        if !confirmed {
            println!("{}", style("Aborted.").yellow());
            return Ok(());
        }
        force = true;
    }

    let project = Project::init(&args.path, force).map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Initialized lrt project at {}",
        style("✓").green().bold(),
        style(project.root().display()).cyan()
    );
    println!("  {}", style("records/   analysis input files").dim());
    println!("  {}", style("data/      raw CSV data").dim());
    println!("  {}", style(".lrt/      config and run history").dim());
    Ok(())
}
