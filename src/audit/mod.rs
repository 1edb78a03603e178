//! Audit logging subsystem.
//!
//! # Data Flow
//! ```text
//! provider call completes (status checked)
//!     → AuditRecord (identity, endpoint, status, raw body)
//!     → store.rs (single INSERT into SQLite)
//! ```
//!
//! # Design Decisions
//! - The pool is opened at startup and handed to handlers through state
//! - One row per call; no batching, no retries
//! - Rows carry no ordering guarantee across concurrent requests

pub mod store;
pub mod types;

pub use store::AuditLog;
pub use types::{AuditEntry, AuditError, AuditRecord, AuditResult, RequestStatus};
