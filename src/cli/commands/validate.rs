//! `lrt validate` command - JSON-Schema validation of input files

use std::path::{Path, PathBuf};

use console::style;
use miette::Result;

use crate::core::project::Project;
use crate::schema::{InputKind, SchemaRegistry};

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Files to validate (default: every input file in the project)
    pub paths: Vec<PathBuf>,

    /// Keep checking after a file fails
    #[arg(long)]
    pub keep_going: bool,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let registry = SchemaRegistry::new().map_err(|e| miette::miette!("{}", e))?;

    let files = if args.paths.is_empty() {
        let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
        project.find_input_files()
    } else {
        args.paths
    };

    if files.is_empty() {
        println!("{}", style("No input files found.").yellow());
        return Ok(());
    }

    let mut checked = 0usize;
    let mut failed = 0usize;
    for path in &files {
        checked += 1;
        match validate_file(&registry, path) {
            Ok(()) => println!("{} {}", style("✓").green(), path.display()),
            Err(violations) => {
                failed += 1;
                println!(
                    "{} {} - {} violation(s)",
                    style("✗").red(),
                    path.display(),
                    violations.len()
                );
                for violation in &violations {
                    println!("    {}", style(violation).dim());
                }
                if !args.keep_going {
                    break;
                }
            }
        }
    }

    println!();
    if failed > 0 {
        Err(miette::miette!(
            "validation failed: {} of {} file(s) have violations",
            failed,
            checked
        ))
    } else {
        println!(
            "{} {} file(s) passed validation",
            style("✓").green().bold(),
            checked
        );
        Ok(())
    }
}

fn validate_file(registry: &SchemaRegistry, path: &Path) -> std::result::Result<(), Vec<String>> {
    let body = std::fs::read_to_string(path).map_err(|e| vec![e.to_string()])?;
    let document: serde_json::Value =
        serde_yml::from_str(&body).map_err(|e| vec![format!("malformed YAML: {}", e)])?;

    let kind = InputKind::detect(&document).ok_or_else(|| {
        vec!["no 'kind' key; expected one of components, fmea, growth, survival".to_string()]
    })?;

    let violations = registry.validate(kind, &document);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
