use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::NOT_LOGGED_IN;

fn loaded() -> CartState {
	let mut state = CartState::new();
	state.begin(CartOp::Fetch);
	state.fulfill(Fulfilled::Fetched(CartPayload::Items(vec![
		CartItem::new(Some("e1"), Some("p1"), 10, 2),
		CartItem::new(Some("e2"), Some("p2"), "2.5", "4"),
	])));
	state
}

#[test]
fn starts_empty_and_idle() {
	let state = CartState::new();
	assert!(state.is_empty());
	assert_eq!(state.total(), 0.0);
	assert_eq!(state.status(), CartStatus::Idle);
	assert!(!state.loading());
	assert_eq!(state.error(), None);
}

#[test]
fn fetch_fulfilled_from_wire_body() {
	let mut state = CartState::new();
	state.begin(CartOp::Fetch);
	assert_eq!(state.status(), CartStatus::Loading);
	assert!(state.loading());

	let payload = CartPayload::from_json(json!({ "items": [{ "entityId": "a", "price": "10", "quantity": "2" }] }));
	state.fulfill(Fulfilled::Fetched(payload));

	assert_eq!(state.items().len(), 1);
	assert_eq!(state.items()[0].entity_id.as_deref(), Some("a"));
	assert_eq!(state.total(), 20.0);
	assert_eq!(state.status(), CartStatus::Succeeded);
	assert!(!state.loading());
	assert_eq!(state.error(), None);
}

#[test]
fn fetch_keeps_lines_with_both_id_spellings() {
	let mut state = CartState::new();
	state.begin(CartOp::Fetch);
	state.fulfill(Fulfilled::Fetched(CartPayload::from_json(json!({ "items": [
		{ "_id": "e1", "entityId": "e1", "productId": "p1", "price": 10, "quantity": 1 },
		{ "_id": "e2", "productId": "p2", "price": 5, "quantity": 1 },
	] }))));

	assert_eq!(state.items().len(), 2);
	assert_eq!(state.total(), 15.0);
}

#[test]
fn item_count_saturates_instead_of_overflowing() {
	let mut state = CartState::new();
	state.begin(CartOp::Fetch);
	state.fulfill(Fulfilled::Fetched(CartPayload::Items(vec![
		CartItem::new(Some("e1"), None, 1, "9223372036854775807"),
		CartItem::new(Some("e2"), None, 1, 1),
	])));

	assert_eq!(state.item_count(), i64::MAX);
}

#[test]
fn update_and_remove_pending_leave_status() {
	let mut state = loaded();
	state.begin(CartOp::Update);
	assert_eq!(state.status(), CartStatus::Succeeded);
	assert!(state.loading());

	state.begin(CartOp::Remove);
	assert_eq!(state.status(), CartStatus::Succeeded);
	assert!(state.loading());

	state.begin(CartOp::Add);
	assert_eq!(state.status(), CartStatus::Loading);
}

#[test]
fn add_single_new_item_appends_and_retotals() {
	let mut state = loaded();
	state.begin(CartOp::Add);
	state.fulfill(Fulfilled::Added(CartPayload::from_json(json!({ "entityId": "b", "price": 5, "quantity": 1 }))));

	assert_eq!(state.items().len(), 3);
	assert_eq!(state.items()[2].entity_id.as_deref(), Some("b"));
	assert_eq!(state.total(), 35.0);
	assert_eq!(state.item_count(), 7);
}

#[test]
fn add_existing_product_replaces_in_place() {
	let mut state = loaded();
	state.begin(CartOp::Add);
	state.fulfill(Fulfilled::Added(CartPayload::from_json(json!({ "productId": "p1", "price": 10, "quantity": 5 }))));

	assert_eq!(state.items().len(), 2);
	assert_eq!(state.items()[0].quantity.as_integer(), 5);
	assert_eq!(state.total(), 60.0);
}

#[test]
fn remove_without_body_filters_locally() {
	let mut state = loaded();
	state.begin(CartOp::Remove);
	state.fulfill(Fulfilled::Removed {
		product_id: "p1".into(),
		payload: CartPayload::Empty,
	});

	assert_eq!(state.items().len(), 1);
	assert_eq!(state.items()[0].product_id.as_deref(), Some("p2"));
	assert_eq!(state.total(), 10.0);
	assert_eq!(state.status(), CartStatus::Succeeded);
}

#[test]
fn rejection_keeps_items_and_records_payload() {
	for op in [CartOp::Fetch, CartOp::Add, CartOp::Update, CartOp::Remove] {
		let mut state = loaded();
		let before = state.items().to_vec();
		let body = json!({ "message": "out of stock", "code": 409 });

		state.begin(op);
		state.reject(op, &CartError::Service(ErrorPayload::Structured(body.clone())));

		assert_eq!(state.items(), before.as_slice(), "{op:?}");
		assert_eq!(state.total(), 30.0);
		assert_eq!(state.status(), CartStatus::Failed);
		assert!(!state.loading());
		assert_eq!(state.error(), Some(&ErrorPayload::Structured(body)));
	}
}

#[test]
fn success_clears_previous_error() {
	let mut state = loaded();
	state.begin(CartOp::Add);
	state.reject(CartOp::Add, &CartError::NotLoggedIn);
	assert_eq!(state.error(), Some(&ErrorPayload::Message(NOT_LOGGED_IN.into())));

	state.begin(CartOp::Fetch);
	state.fulfill(Fulfilled::Fetched(CartPayload::Empty));
	assert_eq!(state.error(), None);
	assert!(state.is_empty());
	assert_eq!(state.total(), 0.0);
}

#[test]
fn clear_leaves_lifecycle_fields() {
	let mut state = loaded();
	state.begin(CartOp::Update);
	state.reject(CartOp::Update, &CartError::Service("timeout".into()));
	state.begin(CartOp::Remove);

	state.clear();
	assert!(state.is_empty());
	assert_eq!(state.total(), 0.0);
	assert_eq!(state.status(), CartStatus::Failed);
	assert!(state.loading());
	assert_eq!(state.error(), Some(&ErrorPayload::Message("timeout".into())));
}

#[test]
fn local_update_overwrites_quantity_idempotently() {
	let mut state = loaded();
	assert!(state.update_item_locally("e2", 1));
	assert_eq!(state.total(), 22.5);
	let once = state.clone();
	assert!(state.update_item_locally("e2", 1));
	assert_eq!(state, once);
}

#[test]
fn local_update_of_unknown_id_changes_nothing() {
	let mut state = loaded();
	state.begin(CartOp::Update);
	let before = state.clone();
	assert!(!state.update_item_locally("missing", 3));
	assert_eq!(state, before);
}

#[test]
fn snapshot_serializes_for_the_ui() {
	let state = loaded();
	let value = serde_json::to_value(&state).unwrap();
	assert_eq!(value["status"], json!("succeeded"));
	assert_eq!(value["total"], json!(30.0));
	assert_eq!(value["loading"], json!(false));
	assert_eq!(value["error"], json!(null));
	assert_eq!(value["items"][1]["price"], json!("2.5"));
}
