mod client;
mod payload;


pub(crate) use client::{DeliveryStatus, TelemetryClient};
pub(crate) use payload::{ReportSpec, TelemetryPayload};
