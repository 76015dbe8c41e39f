use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn cart() -> Vec<CartItem> {
	vec![
		CartItem::new(Some("e1"), Some("p1"), 10, 1),
		CartItem::new(Some("e2"), Some("p2"), 5, 2),
	]
}

fn ids(items: &[CartItem]) -> Vec<Option<&str>> {
	items.iter().map(|i| i.entity_id.as_deref()).collect()
}

#[test]
fn fetch_takes_list_or_nothing() {
	let list = vec![CartItem::new(Some("a"), None, 1, 1)];
	assert_eq!(fetched(CartPayload::Items(list.clone())), list);
	assert_eq!(fetched(CartPayload::Empty), Vec::<CartItem>::new());
	assert_eq!(fetched(CartPayload::Item(CartItem::new(Some("a"), None, 1, 1))), Vec::<CartItem>::new());
}

#[test]
fn add_full_list_replaces_wholesale() {
	let next = vec![CartItem::new(Some("z"), None, 1, 1)];
	assert_eq!(added(cart(), CartPayload::Items(next.clone())), next);
}

#[test]
fn add_new_single_item_appends() {
	let items = added(cart(), CartPayload::Item(CartItem::new(Some("b"), None, 5, 1)));
	assert_eq!(ids(&items), vec![Some("e1"), Some("e2"), Some("b")]);
}

#[test]
fn add_single_item_sharing_product_id_replaces_in_place() {
	let incoming = CartItem::new(Some("e9"), Some("p1"), 10, 3);
	let items = added(cart(), CartPayload::Item(incoming.clone()));
	assert_eq!(items.len(), 2);
	assert_eq!(items[0], incoming);
	assert_eq!(items[1].entity_id.as_deref(), Some("e2"));
}

#[test]
fn add_without_identity_or_body_keeps_items() {
	assert_eq!(added(cart(), CartPayload::Empty), cart());
	assert_eq!(added(cart(), CartPayload::Item(CartItem::default())), cart());
}

#[test]
fn update_replaces_match_and_ignores_unknown() {
	let incoming: CartItem = serde_json::from_value(json!({ "productId": "e2", "price": 5, "quantity": 7 })).unwrap();
	let items = updated(cart(), CartPayload::Item(incoming.clone()));
	assert_eq!(items[1], incoming);

	let items = updated(cart(), CartPayload::Item(CartItem::new(Some("nope"), None, 1, 1)));
	assert_eq!(items, cart());
}

#[test]
fn update_full_list_replaces_wholesale() {
	assert_eq!(updated(cart(), CartPayload::Items(Vec::new())), Vec::<CartItem>::new());
}

#[test]
fn remove_without_body_filters_both_fields() {
	let mut items = cart();
	items.push(CartItem::new(Some("p1"), None, 1, 1));
	items.push(CartItem::new(None, Some("e1"), 1, 1));

	let items = removed(items, CartPayload::Empty, "p1");
	assert_eq!(ids(&items), vec![Some("e2"), None]);
}

#[test]
fn remove_with_list_replaces_wholesale() {
	let next = vec![CartItem::new(Some("e2"), Some("p2"), 5, 2)];
	assert_eq!(removed(cart(), CartPayload::Items(next.clone()), "p1"), next);
}

#[test]
fn set_quantity_hits_first_match_only() {
	let mut items = cart();
	assert!(set_quantity(&mut items, "p2", 9));
	assert_eq!(items[1].quantity.as_integer(), 9);
	assert_eq!(items[0].quantity.as_integer(), 1);

	let before = items.clone();
	assert!(!set_quantity(&mut items, "missing", 4));
	assert_eq!(items, before);
}
