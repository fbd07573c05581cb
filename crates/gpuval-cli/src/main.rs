use std::future::Future;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use gpuval_core::ExitStatus;

mod cli;
mod logging;
mod output;
mod run;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let _logging = logging::LoggingContext::init(&cli.log_file, cli.verbose);

    let status = supervise(run::run(&cli), tokio::signal::ctrl_c()).await;
    ExitCode::from(status.code())
}

/// Drive `run` to completion unless `interrupt` fires first.
///
/// An interrupt source that fails to install is logged and ignored; the run
/// then completes normally.
async fn supervise<R, I>(run: R, interrupt: I) -> ExitStatus
where
    R: Future<Output = anyhow::Result<ExitStatus>>,
    I: Future<Output = io::Result<()>>,
{
    let interrupted = async {
        if let Err(error) = interrupt.await {
            tracing::warn!("Cannot listen for interrupts: {error}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = run => match result {
            Ok(status) => status,
            Err(error) => {
                tracing::error!("Validation failed with unexpected error: {error:#}");
                ExitStatus::UnexpectedError
            }
        },
        () = interrupted => {
            tracing::warn!("Validation interrupted by user");
            ExitStatus::Interrupted
        }
    }
}
