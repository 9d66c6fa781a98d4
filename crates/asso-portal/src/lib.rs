pub mod config;
pub mod dates;
pub mod error;
pub mod members;
pub mod session;
pub mod telemetry;
pub mod treasury;
