use serde_json::Value;

use crate::CartItem;

/// A cart service response, normalized at the adapter boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CartPayload {
	/// A full item list, to replace local items wholesale.
	Items(Vec<CartItem>),
	/// A single item carrying at least one identity field.
	Item(CartItem),
	/// No usable body.
	#[default]
	Empty,
}

impl CartPayload {
	/// Normalizes a raw JSON response body.
	///
	/// * array → [`CartPayload::Items`]
	/// * object with an `items` array → [`CartPayload::Items`]
	/// * object with `_id`/`entityId`/`productId` → [`CartPayload::Item`]
	/// * anything else → [`CartPayload::Empty`]
	///
	/// List entries that are not item objects are skipped.
	pub fn from_json(body: Value) -> Self {
		match body {
			Value::Array(entries) => Self::Items(items_from(entries)),
			Value::Object(mut object) => {
				if matches!(object.get("items"), Some(Value::Array(_)))
					&& let Some(Value::Array(entries)) = object.remove("items")
				{
					return Self::Items(items_from(entries));
				}
				match serde_json::from_value::<CartItem>(Value::Object(object)) {
					Ok(item) if item.identity().is_known() => Self::Item(item),
					_ => Self::Empty,
				}
			}
			_ => Self::Empty,
		}
	}

	/// Normalizes an optional body, treating absence as [`CartPayload::Empty`].
	pub fn from_optional_json(body: Option<Value>) -> Self {
		body.map_or(Self::Empty, Self::from_json)
	}

	/// Short shape name for logs.
	pub const fn shape(&self) -> &'static str {
		match self {
			Self::Items(_) => "items",
			Self::Item(_) => "item",
			Self::Empty => "empty",
		}
	}
}

fn items_from(entries: Vec<Value>) -> Vec<CartItem> {
	let total = entries.len();
	let items: Vec<CartItem> = entries
		.into_iter()
		.filter_map(|entry| serde_json::from_value(entry).ok())
		.collect();
	if items.len() != total {
		tracing::warn!(skipped = total - items.len(), "cart.payload.malformed_entries");
	}
	items
}
