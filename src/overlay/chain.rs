//! Overlay chain
//!
//! Arena of overlay records layered over a single base store.

use crate::config::Config;
use crate::error::{NestError, Result};
use crate::store::BaseStore;

use super::{LogMatch, OverlayId, OverlayState, PendingLog, PendingOp};

/// One level of the chain
#[derive(Debug)]
struct OverlayRecord {
    /// `None` only for the root
    parent: Option<OverlayId>,

    /// Number of transactions between this overlay and the root
    depth: usize,

    state: OverlayState,

    log: PendingLog,
}

impl OverlayRecord {
    fn root() -> Self {
        Self {
            parent: None,
            depth: 0,
            state: OverlayState::Open,
            log: PendingLog::new(),
        }
    }

    fn child_of(parent: OverlayId, parent_depth: usize) -> Self {
        Self {
            parent: Some(parent),
            depth: parent_depth + 1,
            state: OverlayState::Open,
            log: PendingLog::new(),
        }
    }
}

/// A base store plus every overlay begun on top of it
///
/// ## Read path
/// `get` checks the overlay's own log newest-first, then walks parent
/// handles toward the root, then falls back to the base store. Nothing is
/// cached, so a parent write made after `begin` is visible to a child that
/// has not shadowed the key.
///
/// ## Write path
/// Writes on the root go straight to the base store. Writes on any other
/// open overlay are appended to its log. `commit` replays the log into the
/// parent through the same write path, so a commit into a transactional
/// parent only grows the parent's log.
///
/// Terminated overlays keep their arena slot; handles stay valid and reads
/// through them resolve against the parent chain.
///
/// ## Memory bound
/// Slots are never reused: the arena holds one record per `begin` for the
/// life of the store (`overlay_count() == 1 + begins`). A terminated record
/// keeps only its parent handle, depth and state, since its log is drained
/// on commit and cleared on rollback. Long-running embedders that open
/// unbounded numbers of transactions should start a fresh store from the
/// committed base periodically.
#[derive(Debug)]
pub struct TransactionalStore {
    config: Config,
    base: BaseStore,
    overlays: Vec<OverlayRecord>,
}

impl TransactionalStore {
    /// Create a store with default config
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            base: BaseStore::new(),
            overlays: vec![OverlayRecord::root()],
        }
    }

    /// Create a store with the given config
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Handle of the untransacted root
    pub fn root(&self) -> OverlayId {
        OverlayId::ROOT
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Set `key` to `value` as seen from overlay `id`
    pub fn set(&mut self, id: OverlayId, key: impl Into<String>, value: i64) -> Result<()> {
        self.ensure_open(id)?;
        let key = key.into();
        tracing::trace!("set {}={} on overlay {}", key, value, id);
        self.write(id, PendingOp::Set { key, value });
        Ok(())
    }

    /// Delete `key` as seen from overlay `id`
    pub fn delete(&mut self, id: OverlayId, key: impl Into<String>) -> Result<()> {
        self.ensure_open(id)?;
        let key = key.into();
        tracing::trace!("delete {} on overlay {}", key, id);
        self.write(id, PendingOp::Delete { key });
        Ok(())
    }

    /// Route an already-validated write to the base store or a log
    fn write(&mut self, id: OverlayId, op: PendingOp) {
        if id.is_root() {
            match op {
                PendingOp::Set { key, value } => self.base.set(key, value),
                PendingOp::Delete { key } => self.base.delete(&key),
            }
        } else {
            self.overlays[id.index()].log.push(op);
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Read `key` through overlay `id`
    ///
    /// Returns `Ok(None)` for a key that is absent in this view.
    pub fn get(&self, id: OverlayId, key: &str) -> Result<Option<i64>> {
        self.record(id)?;

        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let record = &self.overlays[current.index()];
            if let Some(found) = record.log.lookup(key) {
                tracing::trace!("get {} resolved at overlay {}", key, current);
                return Ok(match found {
                    LogMatch::Value(value) => Some(value),
                    LogMatch::Tombstone => None,
                });
            }
            cursor = record.parent;
        }

        Ok(self.base.get(key))
    }

    /// Read `key`, reporting an absent key as the configured sentinel
    pub fn get_or_sentinel(&self, id: OverlayId, key: &str) -> Result<i64> {
        Ok(self
            .get(id, key)?
            .unwrap_or(self.config.missing_sentinel))
    }

    // =========================================================================
    // Transaction Lifecycle
    // =========================================================================

    /// Open a child overlay of `id`
    pub fn begin(&mut self, id: OverlayId) -> Result<OverlayId> {
        self.ensure_open(id)?;
        let parent_depth = self.overlays[id.index()].depth;

        if let Some(limit) = self.config.max_depth {
            if parent_depth >= limit {
                return Err(NestError::DepthExceeded { limit });
            }
        }

        let child = OverlayId::from_index(self.overlays.len());
        self.overlays.push(OverlayRecord::child_of(id, parent_depth));
        tracing::debug!("begin overlay {} on {} (depth {})", child, id, parent_depth + 1);
        Ok(child)
    }

    /// Replay the log of `id` into its parent, oldest first
    ///
    /// Fails without side effects if `id` is not open or its parent has
    /// already terminated; in the latter case `id` may still be rolled back.
    pub fn commit(&mut self, id: OverlayId) -> Result<()> {
        let parent = self.transaction_parent(id)?;
        self.ensure_open(id)?;
        self.ensure_open(parent)?;

        let ops = self.overlays[id.index()].log.drain();
        let replayed = ops.len();
        for op in ops {
            self.write(parent, op);
        }
        self.overlays[id.index()].state = OverlayState::Committed;

        tracing::debug!("commit overlay {} into {}: {} ops replayed", id, parent, replayed);
        Ok(())
    }

    /// Discard the log of `id`; the parent is untouched
    pub fn rollback(&mut self, id: OverlayId) -> Result<()> {
        self.transaction_parent(id)?;
        self.ensure_open(id)?;

        let record = &mut self.overlays[id.index()];
        let discarded = record.log.len();
        record.log.clear();
        record.state = OverlayState::RolledBack;

        tracing::debug!("rollback overlay {}: {} ops discarded", id, discarded);
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Lifecycle state of `id`; the root is always open
    pub fn state(&self, id: OverlayId) -> Result<OverlayState> {
        Ok(self.record(id)?.state)
    }

    /// Parent of `id`, or `None` for the root
    pub fn parent(&self, id: OverlayId) -> Result<Option<OverlayId>> {
        Ok(self.record(id)?.parent)
    }

    /// Nesting depth of `id`; the root is depth 0
    pub fn depth(&self, id: OverlayId) -> Result<usize> {
        Ok(self.record(id)?.depth)
    }

    /// Uncommitted operations of `id`, oldest first
    pub fn pending(&self, id: OverlayId) -> Result<&[PendingOp]> {
        Ok(self.record(id)?.log.as_slice())
    }

    /// Committed state
    pub fn base(&self) -> &BaseStore {
        &self.base
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of overlays issued, root included
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn record(&self, id: OverlayId) -> Result<&OverlayRecord> {
        self.overlays
            .get(id.index())
            .ok_or(NestError::UnknownOverlay(id))
    }

    fn ensure_open(&self, id: OverlayId) -> Result<()> {
        match self.record(id)?.state {
            OverlayState::Open => Ok(()),
            state => Err(NestError::InvalidState { overlay: id, state }),
        }
    }

    /// Parent of a transactional overlay; the root has no transaction to end
    fn transaction_parent(&self, id: OverlayId) -> Result<OverlayId> {
        self.record(id)?.parent.ok_or(NestError::NoActiveTransaction)
    }
}

impl Default for TransactionalStore {
    fn default() -> Self {
        Self::new()
    }
}
