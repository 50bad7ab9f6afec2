use std::process::ExitCode;

use polyglot_host::{config::PROGRAM, init_logging, run, ConfigError, HostConfig};
use tracing::{debug, error, info};

fn load_config() -> Result<HostConfig, ConfigError> {
    let config = HostConfig::from_args(std::env::args().skip(1))?;
    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let config = match load_config() {
        Ok(c) => c,
        Err(ConfigError::HelpRequested) => {
            println!("{}", HostConfig::usage());
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{PROGRAM}: {e}\n\n{}", HostConfig::usage());
            return ExitCode::from(2);
        }
    };

    if let Err(e) = init_logging(&config.log) {
        eprintln!("{PROGRAM}: logging disabled: {e}");
    }
    debug!(?config, "configuration loaded");

    match run(&config) {
        Ok(report) => {
            println!("=== Polyglot boundary calls ===");
            for record in &report.records {
                println!("{record}");
            }
            info!(live = report.live_after, "all boundary calls completed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "boundary run failed");
            eprintln!("{PROGRAM}: {e}");
            ExitCode::from(1)
        }
    }
}
