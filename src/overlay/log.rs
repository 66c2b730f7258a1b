//! Pending operation log
//!
//! Append-only record of one overlay's uncommitted writes.

use super::PendingOp;

/// Outcome of looking a key up in a single log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMatch {
    /// The newest matching entry set this value
    Value(i64),

    /// The newest matching entry deleted the key
    Tombstone,
}

/// Ordered log of pending operations, oldest first
#[derive(Debug, Default, Clone)]
pub struct PendingLog {
    ops: Vec<PendingOp>,
}

impl PendingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation at the newest end
    pub fn push(&mut self, op: PendingOp) {
        self.ops.push(op);
    }

    /// Resolve `key` against this log alone
    ///
    /// Scans newest to oldest and stops at the first entry for `key`.
    /// Returns `None` when the log never touched the key.
    pub fn lookup(&self, key: &str) -> Option<LogMatch> {
        self.ops.iter().rev().find(|op| op.key() == key).map(|op| match op {
            PendingOp::Set { value, .. } => LogMatch::Value(*value),
            PendingOp::Delete { .. } => LogMatch::Tombstone,
        })
    }

    /// Take every operation out, oldest first, leaving the log empty
    pub fn drain(&mut self) -> Vec<PendingOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn as_slice(&self) -> &[PendingOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
