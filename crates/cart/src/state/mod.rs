//! Cart state and operation lifecycles.
//!
//! Every remote operation goes `begin` → `fulfill` or `begin` → `reject`.
//! Nothing here orders or guards concurrent operations: whichever settle is
//! applied last determines the resulting items.

use serde::Serialize;

use crate::{CartError, CartItem, CartPayload, ErrorPayload, cart_total, reconcile};

/// Coarse lifecycle status shown to the user interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
	#[default]
	Idle,
	Loading,
	Succeeded,
	Failed,
}

impl CartStatus {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Idle => "idle",
			Self::Loading => "loading",
			Self::Succeeded => "succeeded",
			Self::Failed => "failed",
		}
	}
}

/// The four remote cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CartOp {
	Fetch,
	Add,
	Update,
	Remove,
}

impl CartOp {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Fetch => "fetch",
			Self::Add => "add",
			Self::Update => "update",
			Self::Remove => "remove",
		}
	}

	/// Fetch and add publish `loading` status while pending; update and remove
	/// only raise the loading flag.
	const fn marks_status_pending(self) -> bool {
		matches!(self, Self::Fetch | Self::Add)
	}
}

/// A successful settle, carrying what the reconciler needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Fulfilled {
	Fetched(CartPayload),
	Added(CartPayload),
	Updated(CartPayload),
	Removed {
		/// Id the removal was requested for; used when the service sends no list.
		product_id: String,
		payload: CartPayload,
	},
}

impl Fulfilled {
	pub const fn op(&self) -> CartOp {
		match self {
			Self::Fetched(_) => CartOp::Fetch,
			Self::Added(_) => CartOp::Add,
			Self::Updated(_) => CartOp::Update,
			Self::Removed { .. } => CartOp::Remove,
		}
	}
}

/// Canonical cart state for one session.
///
/// `total` is only ever written together with `items`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CartState {
	items: Vec<CartItem>,
	total: f64,
	status: CartStatus,
	loading: bool,
	error: Option<ErrorPayload>,
}

impl CartState {
	/// Empty cart, zero total, idle.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn items(&self) -> &[CartItem] {
		&self.items
	}

	pub fn total(&self) -> f64 {
		self.total
	}

	pub fn status(&self) -> CartStatus {
		self.status
	}

	pub fn loading(&self) -> bool {
		self.loading
	}

	pub fn error(&self) -> Option<&ErrorPayload> {
		self.error.as_ref()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Σ parsed quantities, saturating at the `i64` bounds.
	pub fn item_count(&self) -> i64 {
		self.items.iter().map(|item| item.quantity.as_integer()).fold(0, i64::saturating_add)
	}

	/// Pending transition for `op`.
	pub fn begin(&mut self, op: CartOp) {
		if op.marks_status_pending() {
			self.status = CartStatus::Loading;
		}
		self.loading = true;
	}

	/// Fulfilled transition: reconcile, recompute the total, clear the error.
	pub fn fulfill(&mut self, outcome: Fulfilled) {
		let current = std::mem::take(&mut self.items);
		let next = match outcome {
			Fulfilled::Fetched(payload) => reconcile::fetched(payload),
			Fulfilled::Added(payload) => reconcile::added(current, payload),
			Fulfilled::Updated(payload) => reconcile::updated(current, payload),
			Fulfilled::Removed { product_id, payload } => reconcile::removed(current, payload, &product_id),
		};
		self.set_items(next);
		self.status = CartStatus::Succeeded;
		self.loading = false;
		self.error = None;
	}

	/// Rejected transition. Items and total are left as they were.
	pub fn reject(&mut self, op: CartOp, error: &CartError) {
		let payload = error.payload();
		if op == CartOp::Update {
			tracing::error!(op = op.as_str(), error = %payload, "cart.update.rejected");
		} else {
			tracing::debug!(op = op.as_str(), error = %payload, "cart.op.rejected");
		}
		self.status = CartStatus::Failed;
		self.loading = false;
		self.error = Some(payload);
	}

	/// Empties the cart. Status, loading and error are untouched.
	pub fn clear(&mut self) {
		self.set_items(Vec::new());
	}

	/// Optimistic quantity overwrite for the first item whose entity id or
	/// product id equals `product_id`. Returns `false` and changes nothing when
	/// no item matches.
	pub fn update_item_locally(&mut self, product_id: &str, quantity: i64) -> bool {
		if !reconcile::set_quantity(&mut self.items, product_id, quantity) {
			return false;
		}
		self.total = cart_total(&self.items);
		true
	}

	fn set_items(&mut self, items: Vec<CartItem>) {
		self.items = items;
		self.total = cart_total(&self.items);
	}
}

#[cfg(test)]
mod tests;
