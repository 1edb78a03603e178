//! API Toolkit Library
//!
//! A thin HTTP service that forwards requests to third-party providers and
//! reshapes their answers into typed JSON:
//!
//! - `POST /qr-code/generate` renders a QR code as a base64 PNG
//! - `GET /currency/exchange-rate` fetches one exchange rate
//! - `GET /ip-geolocation/{ip}` resolves an IP address and audits the call

pub mod audit;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod providers;
pub mod qr;

pub use audit::AuditLog;
pub use config::ToolkitConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
