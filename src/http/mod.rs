//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, metrics)
//!     → qr.rs / currency.rs / geolocation.rs / status.rs (extract, call)
//!     → response.rs (errors → {"error": ...})
//!     → Send to client
//! ```

pub mod currency;
pub mod geolocation;
pub mod qr;
pub mod response;
pub mod server;
pub mod status;

pub use response::{ApiError, ErrorBody};
pub use server::{AppState, HttpServer};
