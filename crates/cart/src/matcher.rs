//! Item identity lookup.
//!
//! Upstream services disagree on which identity field a payload fills in, so
//! [`find_match`] compares both fields of both sides. An entity id that happens
//! to equal some other item's product id is treated as the same item.

use crate::{CartItem, ItemIdentity};

/// Index of the first item equivalent to `target` under the four-way
/// cross-field comparison.
pub fn find_match(items: &[CartItem], target: ItemIdentity<'_>) -> Option<usize> {
	if !target.is_known() {
		return None;
	}
	items.iter().position(|item| item.identity().matches(&target))
}

/// Index of the first item whose entity id or product id equals `id`.
pub fn find_by_id(items: &[CartItem], id: &str) -> Option<usize> {
	items.iter().position(|item| item.identity().contains(id))
}
