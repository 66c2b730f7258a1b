//! Overlay Chain Tests
//!
//! Tests verify:
//! - Root behaves as a plain key-value store
//! - Reads resolve through own log, then parents, then the base store
//! - Isolation of child writes until commit
//! - Commit cascades one level at a time
//! - Rollback leaves the parent untouched
//! - Terminal states reject further use

use nestkv::{Config, NestError, OverlayId, OverlayState, PendingOp, TransactionalStore};

// =============================================================================
// Root (Untransacted) Tests
// =============================================================================

#[test]
fn test_fresh_store_reads_absent() {
    let store = TransactionalStore::new();
    let root = store.root();

    assert_eq!(store.get(root, "a").unwrap(), None);
    assert_eq!(store.get_or_sentinel(root, "a").unwrap(), -1);
}

#[test]
fn test_root_writes_go_to_base() {
    let mut store = TransactionalStore::new();
    let root = store.root();

    store.set(root, "a", 50).unwrap();

    assert_eq!(store.get(root, "a").unwrap(), Some(50));
    assert_eq!(store.base().get("a"), Some(50));
    assert!(store.pending(root).unwrap().is_empty());

    store.delete(root, "a").unwrap();
    assert_eq!(store.get(root, "a").unwrap(), None);
    assert!(store.base().is_empty());
}

#[test]
fn test_custom_sentinel() {
    let config = Config::builder().missing_sentinel(0).build();
    let store = TransactionalStore::with_config(config).unwrap();

    assert_eq!(store.get_or_sentinel(store.root(), "a").unwrap(), 0);
}

#[test]
fn test_commit_on_root_is_rejected() {
    let mut store = TransactionalStore::new();
    let root = store.root();

    assert!(matches!(
        store.commit(root),
        Err(NestError::NoActiveTransaction)
    ));
    assert!(matches!(
        store.rollback(root),
        Err(NestError::NoActiveTransaction)
    ));
}

// =============================================================================
// Single-Level Transaction Tests
// =============================================================================

#[test]
fn test_write_then_read_in_transaction() {
    let mut store = TransactionalStore::new();
    let tx = store.begin(store.root()).unwrap();

    store.set(tx, "a", 50).unwrap();

    assert_eq!(store.get(tx, "a").unwrap(), Some(50));
    assert_eq!(store.depth(tx).unwrap(), 1);
    assert_eq!(store.parent(tx).unwrap(), Some(OverlayId::ROOT));
}

#[test]
fn test_last_write_wins_within_log() {
    let mut store = TransactionalStore::new();
    let tx = store.begin(store.root()).unwrap();

    store.set(tx, "a", 1).unwrap();
    store.set(tx, "a", 2).unwrap();

    assert_eq!(store.get(tx, "a").unwrap(), Some(2));
}

#[test]
fn test_delete_then_read_in_transaction() {
    let mut store = TransactionalStore::new();
    let root = store.root();
    store.set(root, "a", 10).unwrap();
    let tx = store.begin(root).unwrap();

    store.delete(tx, "a").unwrap();

    assert_eq!(store.get(tx, "a").unwrap(), None);
    assert_eq!(store.get(root, "a").unwrap(), Some(10));
}

#[test]
fn test_child_writes_invisible_to_parent() {
    let mut store = TransactionalStore::new();
    let root = store.root();
    let tx = store.begin(root).unwrap();

    store.set(tx, "a", 50).unwrap();

    assert_eq!(store.get(root, "a").unwrap(), None);
    assert!(store.base().is_empty());
}

#[test]
fn test_parent_state_visible_in_child() {
    let mut store = TransactionalStore::new();
    let root = store.root();
    store.set(root, "a", 1).unwrap();

    let tx = store.begin(root).unwrap();

    assert_eq!(store.get(tx, "a").unwrap(), Some(1));
}

#[test]
fn test_reads_are_live_not_snapshotted() {
    let mut store = TransactionalStore::new();
    let root = store.root();
    let tx = store.begin(root).unwrap();

    // Parent write after begin is visible while the child has no own entry
    store.set(root, "a", 1).unwrap();
    assert_eq!(store.get(tx, "a").unwrap(), Some(1));

    store.set(tx, "a", 2).unwrap();
    store.set(root, "a", 3).unwrap();
    assert_eq!(store.get(tx, "a").unwrap(), Some(2));
}

#[test]
fn test_commit_replays_in_order() {
    let mut store = TransactionalStore::new();
    let root = store.root();
    let tx = store.begin(root).unwrap();

    store.set(tx, "a", 1).unwrap();
    store.delete(tx, "a").unwrap();
    store.set(tx, "b", 2).unwrap();
    store.set(tx, "b", 3).unwrap();
    store.commit(tx).unwrap();

    assert_eq!(store.get(root, "a").unwrap(), None);
    assert_eq!(store.get(root, "b").unwrap(), Some(3));
    assert_eq!(store.state(tx).unwrap(), OverlayState::Committed);
    assert!(store.pending(tx).unwrap().is_empty());
}

#[test]
fn test_rollback_discards_log() {
    let mut store = TransactionalStore::new();
    let root = store.root();
    let tx = store.begin(root).unwrap();

    store.set(tx, "a", 50).unwrap();
    store.rollback(tx).unwrap();

    assert_eq!(store.get(root, "a").unwrap(), None);
    assert_eq!(store.state(tx).unwrap(), OverlayState::RolledBack);
    assert!(store.pending(tx).unwrap().is_empty());
}

// =============================================================================
// Reference Scenarios
// =============================================================================

#[test]
fn test_multi_op_override_commit() {
    let mut store = TransactionalStore::new();
    let root = store.root();
    store.set(root, "a", 40).unwrap();

    let tx = store.begin(root).unwrap();
    store.set(tx, "a", 50).unwrap();
    assert_eq!(store.get(tx, "a").unwrap(), Some(50));
    store.set(tx, "a", 60).unwrap();
    assert_eq!(store.get(tx, "a").unwrap(), Some(60));
    store.delete(tx, "a").unwrap();
    assert_eq!(store.get_or_sentinel(tx, "a").unwrap(), -1);

    store.commit(tx).unwrap();
    assert_eq!(store.get_or_sentinel(root, "a").unwrap(), -1);
}

#[test]
fn test_multi_op_override_rollback() {
    let mut store = TransactionalStore::new();
    let root = store.root();
    store.set(root, "a", 40).unwrap();

    let tx = store.begin(root).unwrap();
    store.set(tx, "a", 50).unwrap();
    store.set(tx, "a", 60).unwrap();
    store.delete(tx, "a").unwrap();
    store.rollback(tx).unwrap();

    assert_eq!(store.get(root, "a").unwrap(), Some(40));
}

#[test]
fn test_nested_rollback_then_outer_commit() {
    let mut store = TransactionalStore::new();
    let root = store.root();
    store.set(root, "a", 100).unwrap();

    let outer = store.begin(root).unwrap();
    store.set(outer, "b", 50).unwrap();
    assert_eq!(store.get(outer, "a").unwrap(), Some(100));

    let inner = store.begin(outer).unwrap();
    assert_eq!(store.get(inner, "b").unwrap(), Some(50));
    store.set(inner, "c", 60).unwrap();
    assert_eq!(store.get(inner, "c").unwrap(), Some(60));

    store.rollback(inner).unwrap();
    store.commit(outer).unwrap();

    assert_eq!(store.get(root, "a").unwrap(), Some(100));
    assert_eq!(store.get(root, "b").unwrap(), Some(50));
    assert_eq!(store.get(root, "c").unwrap(), None);
}

#[test]
fn test_nested_commit_cascades() {
    let mut store = TransactionalStore::new();
    let root = store.root();
    store.set(root, "a", 100).unwrap();

    let outer = store.begin(root).unwrap();
    store.set(outer, "b", 50).unwrap();
    let inner = store.begin(outer).unwrap();
    store.set(inner, "c", 60).unwrap();

    store.commit(inner).unwrap();

    // Landed in the parent's log only
    assert_eq!(store.get(outer, "c").unwrap(), Some(60));
    assert_eq!(store.get(root, "c").unwrap(), None);
    assert_eq!(
        store.pending(outer).unwrap(),
        &[
            PendingOp::Set {
                key: "b".to_string(),
                value: 50
            },
            PendingOp::Set {
                key: "c".to_string(),
                value: 60
            },
        ]
    );

    store.commit(outer).unwrap();

    assert_eq!(store.get(root, "a").unwrap(), Some(100));
    assert_eq!(store.get(root, "b").unwrap(), Some(50));
    assert_eq!(store.get(root, "c").unwrap(), Some(60));
}

#[test]
fn test_nested_commit_matches_flat_commit() {
    let mut nested = TransactionalStore::new();
    let root = nested.root();
    let outer = nested.begin(root).unwrap();
    nested.set(outer, "a", 1).unwrap();
    nested.set(outer, "b", 2).unwrap();
    let inner = nested.begin(outer).unwrap();
    nested.delete(inner, "a").unwrap();
    nested.set(inner, "b", 3).unwrap();
    nested.commit(inner).unwrap();
    nested.commit(outer).unwrap();

    let mut flat = TransactionalStore::new();
    let tx = flat.begin(flat.root()).unwrap();
    flat.set(tx, "a", 1).unwrap();
    flat.set(tx, "b", 2).unwrap();
    flat.delete(tx, "a").unwrap();
    flat.set(tx, "b", 3).unwrap();
    flat.commit(tx).unwrap();

    assert_eq!(
        nested.base().sorted_entries(),
        flat.base().sorted_entries()
    );
}

#[test]
fn test_sibling_commits_last_wins() {
    let mut store = TransactionalStore::new();
    let root = store.root();
    let first = store.begin(root).unwrap();
    let second = store.begin(root).unwrap();

    store.set(first, "a", 1).unwrap();
    store.set(second, "a", 2).unwrap();
    assert_eq!(store.get(first, "a").unwrap(), Some(1));

    store.commit(second).unwrap();
    store.commit(first).unwrap();

    assert_eq!(store.get(root, "a").unwrap(), Some(1));
}

// =============================================================================
// Terminal State Tests
// =============================================================================

#[test]
fn test_committed_overlay_rejects_writes() {
    let mut store = TransactionalStore::new();
    let tx = store.begin(store.root()).unwrap();
    store.commit(tx).unwrap();

    let err = store.set(tx, "a", 1).unwrap_err();
    assert!(matches!(
        err,
        NestError::InvalidState {
            state: OverlayState::Committed,
            ..
        }
    ));
    assert!(store.delete(tx, "a").is_err());
    assert!(store.begin(tx).is_err());
    assert!(store.commit(tx).is_err());
    assert!(store.rollback(tx).is_err());
}

#[test]
fn test_rolled_back_overlay_rejects_writes() {
    let mut store = TransactionalStore::new();
    let tx = store.begin(store.root()).unwrap();
    store.rollback(tx).unwrap();

    let err = store.commit(tx).unwrap_err();
    assert!(matches!(
        err,
        NestError::InvalidState {
            state: OverlayState::RolledBack,
            ..
        }
    ));
}

#[test]
fn test_terminated_overlay_reads_through_parent() {
    let mut store = TransactionalStore::new();
    let root = store.root();
    store.set(root, "a", 1).unwrap();
    let tx = store.begin(root).unwrap();
    store.set(tx, "a", 2).unwrap();
    store.rollback(tx).unwrap();

    assert_eq!(store.get(tx, "a").unwrap(), Some(1));
}

#[test]
fn test_commit_into_terminated_parent_fails_and_keeps_child() {
    let mut store = TransactionalStore::new();
    let root = store.root();
    let outer = store.begin(root).unwrap();
    let inner = store.begin(outer).unwrap();
    store.set(inner, "a", 1).unwrap();

    store.rollback(outer).unwrap();

    let err = store.commit(inner).unwrap_err();
    match err {
        NestError::InvalidState { overlay, state } => {
            assert_eq!(overlay, outer);
            assert_eq!(state, OverlayState::RolledBack);
        }
        other => panic!("Expected InvalidState, got {:?}", other),
    }
    assert_eq!(store.state(inner).unwrap(), OverlayState::Open);
    assert_eq!(store.pending(inner).unwrap().len(), 1);

    store.rollback(inner).unwrap();
    assert_eq!(store.get(root, "a").unwrap(), None);
}

#[test]
fn test_unknown_overlay() {
    let mut other = TransactionalStore::new();
    let foreign = other.begin(other.root()).unwrap();

    let mut store = TransactionalStore::new();

    assert!(matches!(
        store.get(foreign, "a"),
        Err(NestError::UnknownOverlay(id)) if id == foreign
    ));
    assert!(matches!(
        store.set(foreign, "a", 1),
        Err(NestError::UnknownOverlay(_))
    ));
}

// =============================================================================
// Depth Limit Tests
// =============================================================================

#[test]
fn test_max_depth_enforced() {
    let config = Config::builder().max_depth(2).build();
    let mut store = TransactionalStore::with_config(config).unwrap();

    let first = store.begin(store.root()).unwrap();
    let second = store.begin(first).unwrap();

    assert!(matches!(
        store.begin(second),
        Err(NestError::DepthExceeded { limit: 2 })
    ));
    assert_eq!(store.overlay_count(), 3);
}

#[test]
fn test_arena_holds_one_record_per_begin() {
    let mut store = TransactionalStore::new();
    let root = store.root();

    for round in 0..10 {
        let tx = store.begin(root).unwrap();
        store.set(tx, "k", round).unwrap();
        if round % 2 == 0 {
            store.commit(tx).unwrap();
        } else {
            store.rollback(tx).unwrap();
        }
        // Terminated records keep no log entries
        assert!(store.pending(tx).unwrap().is_empty());
    }

    assert_eq!(store.overlay_count(), 1 + 10);
    assert_eq!(store.get(root, "k").unwrap(), Some(8));
}

#[test]
fn test_zero_max_depth_rejected() {
    let config = Config::builder().max_depth(0).build();

    assert!(matches!(
        TransactionalStore::with_config(config),
        Err(NestError::Config(_))
    ));
}
