//! # NestKV
//!
//! An in-memory key-value store with nested transactions:
//! - A flat base store holding committed integer values
//! - A chain of overlays, one per open transaction, each with its own log
//! - Live reads through the chain, no snapshots
//! - Commit folds a log into the parent one level at a time
//! - Rollback discards a log without touching the parent
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Shell (nestkv-cli)                          │
//! │              (stdin or script file)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ command lines
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Session                                 │
//! │          (stack of open transactions, serial)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 TransactionalStore                           │
//! │        (overlay arena: logs + parent handles)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ root writes / root commits
//!                       ▼
//!                ┌─────────────┐
//!                │  BaseStore  │
//!                └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use nestkv::TransactionalStore;
//!
//! let mut store = TransactionalStore::new();
//! let root = store.root();
//! store.set(root, "a", 40).unwrap();
//!
//! let tx = store.begin(root).unwrap();
//! store.set(tx, "a", 50).unwrap();
//! assert_eq!(store.get(root, "a").unwrap(), Some(40));
//!
//! store.rollback(tx).unwrap();
//! assert_eq!(store.get(root, "a").unwrap(), Some(40));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod overlay;
pub mod protocol;
pub mod session;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{NestError, Result};
pub use config::Config;
pub use overlay::{OverlayId, OverlayState, PendingOp, TransactionalStore};
pub use session::Session;
pub use store::BaseStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of NestKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
