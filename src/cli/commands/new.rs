//! `lrt new` command - write a starter input file

use std::path::PathBuf;

use console::style;
use dialoguer::Confirm;
use miette::Result;

use crate::core::config::Config;
use crate::core::project::Project;
use crate::schema::{InputKind, TemplateContext, TemplateGenerator};

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Input kind: records, fmea, growth or survival
    pub kind: String,

    /// Title recorded in the file
    #[arg(long, short)]
    pub title: Option<String>,

    /// Output path (default: records/<kind>.lrt.yaml inside a project)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing file without asking
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: NewArgs) -> Result<()> {
    let kind: InputKind = args.kind.parse().map_err(|e| miette::miette!("{}", e))?;
    let project = Project::discover().ok();
    let config = Config::load(project.as_ref()).map_err(|e| miette::miette!("{}", e))?;

    let path = args.output.unwrap_or_else(|| {
        let name = format!("{}.lrt.yaml", kind);
        match &project {
            Some(project) => project.records_dir().join(name),
            None => PathBuf::from(name),
        }
    });

    if path.exists() && !args.force {
        let overwrite = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite it?", path.display()))
            .default(false)
            .interact()
            .map_err(|e| miette::miette!("{}", e))?;
        if !overwrite {
            println!("{}", style("Aborted.").yellow());
            return Ok(());
        }
    }

    let title = args
        .title
        .unwrap_or_else(|| format!("New {} analysis", kind));
    let ctx = TemplateContext::new(title, config.author.clone())
        .with_quality_id(config.quality_id)
        .with_environment_id(config.environment_id)
        .with_confidence(config.confidence);

    let generator = TemplateGenerator::new().map_err(|e| miette::miette!("{}", e))?;
    let body = generator
        .generate(kind, &ctx)
        .map_err(|e| miette::miette!("{}", e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| miette::miette!("failed to create {}: {}", parent.display(), e))?;
        }
    }
    std::fs::write(&path, body)
        .map_err(|e| miette::miette!("failed to write {}: {}", path.display(), e))?;

    println!(
        "{} Wrote {}",
        style("✓").green().bold(),
        style(path.display()).cyan()
    );
    Ok(())
}
