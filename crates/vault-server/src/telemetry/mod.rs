//! Structured logging setup for the vault backend.
//!
//! # Telemetry invariants
//!
//! - **No plaintext field values, key material, or master secret** must
//!   appear in any span attribute or log field.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::init_telemetry;
