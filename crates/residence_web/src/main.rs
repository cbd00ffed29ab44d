//! `residence` server binary.

use log::error;
use residence_core::{init_logging, init_stderr_logging};
use residence_web::config::Config;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("residence: {err}");
            return ExitCode::FAILURE;
        }
    };

    let logging = match config.log_dir.as_deref() {
        Some(log_dir) => init_logging(&config.log_level, log_dir),
        None => init_stderr_logging(&config.log_level),
    };
    if let Err(err) = logging {
        eprintln!("residence: {err}");
        return ExitCode::FAILURE;
    }

    match residence_web::start_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=web status=error error={err}");
            ExitCode::FAILURE
        }
    }
}
