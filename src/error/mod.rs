mod app;
mod config;
mod http;
mod session;
mod telemetry;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use session::SessionError;
pub use telemetry::TelemetryError;
pub use validation::ValidationError;
