//! Cart reconciliation engine.
//!
//! Everything in this crate is synchronous and free of I/O. Network calls are
//! owned by `trolley-store`; this crate only decides what the cart looks like
//! once a call has settled.
//!
//! * [`CartItem`]: one cart line with a two-field identity and lenient numbers.
//! * [`total`]: Σ(price × quantity) where malformed numbers count as zero.
//! * [`matcher`]: locate an item across the entity/product id pair.
//! * [`CartPayload`]: service responses normalized into one tagged union.
//! * [`reconcile`]: per-operation `(items, payload) -> items` merges.
//! * [`CartState`]: the pending/fulfilled/rejected state machine.

/// Cart error taxonomy and the payload stored on rejection.
pub mod error;
/// Cart line items and their identity pair.
pub mod item;
/// Item identity lookup.
pub mod matcher;
/// Service response normalization.
pub mod payload;
/// Per-operation merge of a settled response into local items.
pub mod reconcile;
/// Cart state and operation lifecycles.
pub mod state;
/// Lenient numeric parsing and the cart total.
pub mod total;

pub use error::{CartError, ErrorPayload, NOT_LOGGED_IN};
pub use item::{CartItem, ItemIdentity, RawNumber};
pub use matcher::{find_by_id, find_match};
pub use payload::CartPayload;
pub use state::{CartOp, CartState, CartStatus, Fulfilled};
pub use total::cart_total;
