use clap::Parser;
use page_scenarios::cli::commands::{cmd_check, cmd_run, cmd_steps};
use page_scenarios::cli::config::{Cli, Commands, load_config, resolve_run_settings};
use page_scenarios::cli::logging::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Run(args) => {
            let settings = resolve_run_settings(&args, &config);
            let all_passed = cmd_run(&settings)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::Check { features, tags } => {
            let all_defined = cmd_check(features.as_deref(), tags.as_deref(), &config)?;
            if !all_defined {
                std::process::exit(1);
            }
        }
        Commands::Steps => cmd_steps()?,
    }

    Ok(())
}
