//! `lrt config` command - layered configuration

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::core::config::{self, Config, KEYS};
use crate::core::project::Project;

#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the resolved configuration
    Show,
    /// Print the config file locations
    Path,
    /// List the recognized keys
    Keys,
    /// Set a key in the project config file
    Set(SetArgs),
    /// Remove a key from the project config file
    Unset(UnsetArgs),
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    pub key: String,
    pub value: String,

    /// Write to the per-user global config instead
    #[arg(long)]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    pub key: String,

    /// Edit the per-user global config instead
    #[arg(long)]
    pub global: bool,
}

pub fn run(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let project = Project::discover().ok();
            let config =
                Config::load(project.as_ref()).map_err(|e| miette::miette!("{}", e))?;
            let body = serde_yml::to_string(&config).map_err(|e| miette::miette!("{}", e))?;
            print!("{}", body);
            Ok(())
        }
        ConfigCommand::Path => {
            match Config::global_path() {
                Some(path) => println!("global:  {}", path.display()),
                None => println!("global:  (unavailable on this platform)"),
            }
            match Project::discover() {
                Ok(project) => println!("project: {}", project.config_path().display()),
                Err(_) => println!("project: (not inside a project)"),
            }
            Ok(())
        }
        ConfigCommand::Keys => {
            for (key, description) in KEYS {
                println!("{:16} {}", style(key).cyan(), description);
            }
            Ok(())
        }
        ConfigCommand::Set(args) => {
            let path = target_path(args.global)?;
            config::set_key(&path, &args.key, &args.value)
                .map_err(|e| miette::miette!("{}", e))?;
            println!(
                "{} {} = {} ({})",
                style("✓").green().bold(),
                args.key,
                args.value,
                style(path.display()).dim()
            );
            Ok(())
        }
        ConfigCommand::Unset(args) => {
            let path = target_path(args.global)?;
            config::unset_key(&path, &args.key).map_err(|e| miette::miette!("{}", e))?;
            println!(
                "{} removed {} ({})",
                style("✓").green().bold(),
                args.key,
                style(path.display()).dim()
            );
            Ok(())
        }
    }
}

fn target_path(global: bool) -> Result<PathBuf> {
    if global {
        Config::global_path()
            .ok_or_else(|| miette::miette!("no global config directory available on this platform"))
    } else {
        let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
        Ok(project.config_path())
    }
}
