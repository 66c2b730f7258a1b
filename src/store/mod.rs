//! Store Module
//!
//! The base store: committed key-value state with no notion of
//! transactions.
//!
//! ## Responsibilities
//! - Hold the ground truth mapping from key to integer value
//! - Absorb writes made outside any transaction
//! - Absorb commits that land on the root of a chain
//!
//! ## Data Structure Choice
//! HashMap, since keys carry no ordering guarantee. Sorted views are
//! produced on demand for display.

mod base;

pub use base::BaseStore;
