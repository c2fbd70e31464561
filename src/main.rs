mod app;
mod args;
mod config;
mod entry;
mod error;
mod http;
mod metrics;
mod session;
mod system;
mod telemetry;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
