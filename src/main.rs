use clap::Parser;
use lrt::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Restore default SIGPIPE handling so `lrt ... | head` exits quietly.
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => lrt::cli::commands::init::run(args),
        Commands::Config(cmd) => lrt::cli::commands::config::run(cmd),
        Commands::New(args) => lrt::cli::commands::new::run(args),
        Commands::Validate(args) => lrt::cli::commands::validate::run(args),
        Commands::Predict(cmd) => lrt::cli::commands::predict::run(cmd),
        Commands::Derate(args) => lrt::cli::commands::derate::run(args),
        Commands::Fmea(args) => lrt::cli::commands::fmea::run(args),
        Commands::Growth(cmd) => lrt::cli::commands::growth::run(cmd),
        Commands::Survival(cmd) => lrt::cli::commands::survival::run(cmd),
        Commands::History(args) => lrt::cli::commands::history::run(args),
        Commands::Completions(args) => lrt::cli::commands::completions::run(args),
    }
}
