//! Per-operation merge of a settled service response into local items.
//!
//! Each function takes ownership of the current list and returns the next one.
//! None of them touch the total; [`crate::CartState`] recomputes it after every
//! merge.

use crate::{CartItem, CartPayload, find_by_id, find_match};

/// Items after a fetch: the returned list, or nothing.
pub fn fetched(payload: CartPayload) -> Vec<CartItem> {
	match payload {
		CartPayload::Items(items) => items,
		CartPayload::Item(_) | CartPayload::Empty => Vec::new(),
	}
}

/// Items after an add: a full list replaces everything; a single item
/// replaces its match in place or is appended.
pub fn added(mut items: Vec<CartItem>, payload: CartPayload) -> Vec<CartItem> {
	match payload {
		CartPayload::Items(next) => next,
		CartPayload::Item(item) if item.identity().is_known() => {
			match find_match(&items, item.identity()) {
				Some(at) => items[at] = item,
				None => items.push(item),
			}
			items
		}
		CartPayload::Item(_) | CartPayload::Empty => items,
	}
}

/// Items after an update: like [`added`], except an unmatched single item is
/// ignored.
pub fn updated(mut items: Vec<CartItem>, payload: CartPayload) -> Vec<CartItem> {
	match payload {
		CartPayload::Items(next) => next,
		CartPayload::Item(item) => {
			if let Some(at) = find_match(&items, item.identity()) {
				items[at] = item;
			} else {
				tracing::debug!(entity_id = ?item.entity_id, product_id = ?item.product_id, "cart.reconcile.update_unmatched");
			}
			items
		}
		CartPayload::Empty => items,
	}
}

/// Items after a removal: a full list replaces everything; otherwise every
/// item whose entity id or product id equals `removed_id` is dropped.
pub fn removed(mut items: Vec<CartItem>, payload: CartPayload, removed_id: &str) -> Vec<CartItem> {
	match payload {
		CartPayload::Items(next) => next,
		CartPayload::Item(_) | CartPayload::Empty => {
			items.retain(|item| !item.identity().contains(removed_id));
			items
		}
	}
}

/// Overwrites the quantity of the first item whose entity id or product id
/// equals `id`. Returns `false` when nothing matched.
pub fn set_quantity(items: &mut [CartItem], id: &str, quantity: i64) -> bool {
	let Some(at) = find_by_id(items, id) else {
		return false;
	};
	items[at].quantity = quantity.into();
	true
}

#[cfg(test)]
mod tests;
