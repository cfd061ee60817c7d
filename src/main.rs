use std::process::ExitCode;

use clap::Parser;
use mri_stability::{cli::Cli, config::Config, errors::diagnostic, logging};
use tracing::{error, info};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", diagnostic(&err));
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = logging::init_logging(config.verbose, config.log_file.as_deref());
    info!(
        base_dir = %config.base_dir.display(),
        archive = config.archive,
        "collector starting"
    );

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    match mri_stability::run(&config, &mut handle) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "collection failed");
            eprintln!("{}", diagnostic(&err));
            ExitCode::FAILURE
        }
    }
}
