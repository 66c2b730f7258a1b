//! Overlay Module
//!
//! Nested transactions as a chain of pending-operation logs.
//!
//! ## Responsibilities
//! - Record set/delete intents per transaction level
//! - Resolve reads by walking the chain from the newest overlay to the base
//! - Fold a committed log into its parent, one level at a time
//! - Discard a rolled-back log without touching the parent
//!
//! ## Layout
//! ```text
//!   ┌──────────────┐
//!   │ overlay #2   │  log: [Set c=60]
//!   └──────┬───────┘
//!          │ parent
//!   ┌──────▼───────┐
//!   │ overlay #1   │  log: [Set b=50]
//!   └──────┬───────┘
//!          │ parent
//!   ┌──────▼───────┐
//!   │ root #0      │  untransacted, writes go straight through
//!   └──────┬───────┘
//!          │
//!   ┌──────▼───────┐
//!   │  BaseStore   │
//!   └──────────────┘
//! ```
//!
//! Overlays live in an arena owned by [`TransactionalStore`] and are
//! addressed by [`OverlayId`] handles, so a child never borrows its parent.

mod chain;
mod log;

use std::fmt;

pub use chain::TransactionalStore;
pub use log::{LogMatch, PendingLog};

/// Handle to an overlay inside a [`TransactionalStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(usize);

impl OverlayId {
    /// The untransacted root every chain starts from
    pub const ROOT: OverlayId = OverlayId(0);

    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a single overlay
///
/// `Open` is the only state that accepts writes. Both other states are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Open,
    Committed,
    RolledBack,
}

impl fmt::Display for OverlayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OverlayState::Open => "open",
            OverlayState::Committed => "committed",
            OverlayState::RolledBack => "rolled back",
        };
        f.write_str(name)
    }
}

/// A recorded intent not yet applied to the parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOp {
    /// Set a key to a value
    Set { key: String, value: i64 },

    /// Delete a key
    Delete { key: String },
}

impl PendingOp {
    /// Key this operation touches
    pub fn key(&self) -> &str {
        match self {
            PendingOp::Set { key, .. } | PendingOp::Delete { key } => key,
        }
    }
}
