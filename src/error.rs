//! Error types for NestKV
//!
//! Provides a unified error type for all operations. A missing key is
//! never an error; reads return `Option<i64>` instead.

use thiserror::Error;

use crate::overlay::{OverlayId, OverlayState};

/// Result type alias using NestError
pub type Result<T> = std::result::Result<T, NestError>;

/// Unified error type for NestKV operations
#[derive(Debug, Error)]
pub enum NestError {
    // -------------------------------------------------------------------------
    // Transaction Errors
    // -------------------------------------------------------------------------
    #[error("Overlay {overlay} is {state}, not open")]
    InvalidState {
        overlay: OverlayId,
        state: OverlayState,
    },

    #[error("No active transaction")]
    NoActiveTransaction,

    #[error("Unknown overlay: {0}")]
    UnknownOverlay(OverlayId),

    #[error("Transaction nesting limit of {limit} reached")]
    DepthExceeded { limit: usize },

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
