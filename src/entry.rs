use clap::Parser;

use crate::args::HammerArgs;
use crate::config::TelemetryConfig;
use crate::error::AppResult;

pub(crate) fn run() -> AppResult<()> {
    let args = HammerArgs::parse();

    crate::system::logger::init_logging(args.verbose);

    // The ambient environment is read exactly once, before any component
    // runs; everything downstream receives this snapshot.
    let telemetry = TelemetryConfig::from_env();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(crate::app::run(&args, telemetry))
}
