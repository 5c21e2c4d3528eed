use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};

fn init_logging() {
    // .env first so RUST_LOG and LOG_FORMAT from the file are honored
    dotenv().ok();
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => common::utils::logging::init_logging_json(),
        _ => common::utils::logging::init_logging_default(),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), pid = std::process::id(), "resolver starting");

    tokio::select! {
        res = server::run() => match res {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %e, "resolver stopped with error");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl+C, shutting down");
            ExitCode::SUCCESS
        }
    }
}
