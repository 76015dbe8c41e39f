use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::total;

/// A price or quantity exactly as the service sent it.
///
/// Upstream payloads mix JSON numbers and numeric strings, so the raw value is
/// kept for pass-through and only parsed when a number is actually needed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawNumber(pub Value);

impl RawNumber {
	/// Decimal reading; unparsable input reads as `0.0`.
	pub fn as_decimal(&self) -> f64 {
		total::parse_decimal(&self.0)
	}

	/// Integer reading, truncated toward zero; unparsable input reads as `0`.
	pub fn as_integer(&self) -> i64 {
		total::parse_integer(&self.0)
	}
}

impl From<i32> for RawNumber {
	fn from(value: i32) -> Self {
		Self(Value::from(value))
	}
}

impl From<i64> for RawNumber {
	fn from(value: i64) -> Self {
		Self(Value::from(value))
	}
}

impl From<f64> for RawNumber {
	fn from(value: f64) -> Self {
		Self(Value::from(value))
	}
}

impl From<&str> for RawNumber {
	fn from(value: &str) -> Self {
		Self(Value::from(value))
	}
}

/// Borrowed view of an item's identity pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemIdentity<'a> {
	/// Canonical cart-entry id.
	pub entity_id: Option<&'a str>,
	/// Catalog product id.
	pub product_id: Option<&'a str>,
}

impl<'a> ItemIdentity<'a> {
	pub const fn new(entity_id: Option<&'a str>, product_id: Option<&'a str>) -> Self {
		Self { entity_id, product_id }
	}

	/// `true` when at least one id is present.
	pub const fn is_known(&self) -> bool {
		self.entity_id.is_some() || self.product_id.is_some()
	}

	/// Four-way cross-field comparison. Missing ids never compare equal.
	pub fn matches(&self, other: &ItemIdentity<'_>) -> bool {
		same(self.entity_id, other.entity_id)
			|| same(self.entity_id, other.product_id)
			|| same(self.product_id, other.entity_id)
			|| same(self.product_id, other.product_id)
	}

	/// `true` when either field equals `id`.
	pub fn contains(&self, id: &str) -> bool {
		self.entity_id == Some(id) || self.product_id == Some(id)
	}
}

fn same(lhs: Option<&str>, rhs: Option<&str>) -> bool {
	matches!((lhs, rhs), (Some(lhs), Some(rhs)) if lhs == rhs)
}

/// One cart line.
///
/// Fields other than the identity pair, price and quantity are carried in
/// [`CartItem::extra`] and re-emitted untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CartItem {
	#[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
	pub entity_id: Option<String>,
	#[serde(rename = "productId", skip_serializing_if = "Option::is_none")]
	pub product_id: Option<String>,
	pub price: RawNumber,
	pub quantity: RawNumber,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl CartItem {
	/// Creates an item with numeric price and quantity.
	pub fn new(entity_id: Option<&str>, product_id: Option<&str>, price: impl Into<RawNumber>, quantity: impl Into<RawNumber>) -> Self {
		Self {
			entity_id: entity_id.map(str::to_string),
			product_id: product_id.map(str::to_string),
			price: price.into(),
			quantity: quantity.into(),
			extra: Map::new(),
		}
	}

	/// Builds an item from a wire object.
	///
	/// `_id` wins over `entityId` and `productId` over `product_id`; a spelling
	/// that was not used for the identity stays in [`CartItem::extra`].
	pub fn from_fields(mut fields: Map<String, Value>) -> Self {
		let entity_id = take_id(&mut fields, "_id", "entityId");
		let product_id = take_id(&mut fields, "productId", "product_id");
		let price = fields.remove("price").map(RawNumber).unwrap_or_default();
		let quantity = fields.remove("quantity").map(RawNumber).unwrap_or_default();
		Self {
			entity_id,
			product_id,
			price,
			quantity,
			extra: fields,
		}
	}

	pub fn identity(&self) -> ItemIdentity<'_> {
		ItemIdentity::new(self.entity_id.as_deref(), self.product_id.as_deref())
	}

	/// Parsed price × parsed quantity. Overflowing lines count as zero.
	pub fn line_total(&self) -> f64 {
		let line = self.price.as_decimal() * self.quantity.as_integer() as f64;
		if line.is_finite() { line } else { 0.0 }
	}
}

impl<'de> Deserialize<'de> for CartItem {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Map::deserialize(deserializer).map(Self::from_fields)
	}
}

/// Removes `primary` and returns it as an id, falling back to `alias` when
/// `primary` is absent or not an id. The alias is only consumed when used.
fn take_id(fields: &mut Map<String, Value>, primary: &str, alias: &str) -> Option<String> {
	if let Some(id) = fields.remove(primary).and_then(lenient_id) {
		return Some(id);
	}
	let id = fields.get(alias).cloned().and_then(lenient_id)?;
	fields.remove(alias);
	Some(id)
}

/// Accepts string or numeric ids; anything else reads as absent.
fn lenient_id(value: Value) -> Option<String> {
	match value {
		Value::String(id) => Some(id),
		Value::Number(id) => Some(id.to_string()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	#[test]
	fn deserializes_both_identity_spellings() {
		let item: CartItem = serde_json::from_value(json!({
			"entityId": "e1",
			"productId": 42,
			"price": "9.50",
			"quantity": 2,
		}))
		.unwrap();
		assert_eq!(item.identity(), ItemIdentity::new(Some("e1"), Some("42")));
		assert_eq!(item.line_total(), 19.0);

		let item: CartItem = serde_json::from_value(json!({ "_id": "e2", "product_id": "p2" })).unwrap();
		assert_eq!(item.identity(), ItemIdentity::new(Some("e2"), Some("p2")));
		assert_eq!(item.line_total(), 0.0);
	}

	#[test]
	fn extra_fields_round_trip_untouched() {
		let raw = json!({
			"_id": "e1",
			"productId": "p1",
			"price": "4.25",
			"quantity": "3",
			"name": "Espresso beans",
			"options": { "grind": "fine" },
		});
		let item: CartItem = serde_json::from_value(raw.clone()).unwrap();
		assert_eq!(item.extra.get("name"), Some(&json!("Espresso beans")));
		assert_eq!(serde_json::to_value(&item).unwrap(), raw);
	}

	#[test]
	fn both_entity_spellings_prefer_underscore_id() {
		let raw = json!({ "_id": "e1", "entityId": "legacy-e1", "productId": "p1", "price": 10, "quantity": 1 });
		let item: CartItem = serde_json::from_value(raw.clone()).unwrap();
		assert_eq!(item.identity(), ItemIdentity::new(Some("e1"), Some("p1")));
		assert_eq!(item.extra.get("entityId"), Some(&json!("legacy-e1")));
		assert_eq!(serde_json::to_value(&item).unwrap(), raw);
	}

	#[test]
	fn both_product_spellings_prefer_camel_case() {
		let raw = json!({ "productId": "p1", "product_id": "p1", "quantity": "2" });
		let item: CartItem = serde_json::from_value(raw.clone()).unwrap();
		assert_eq!(item.identity(), ItemIdentity::new(None, Some("p1")));
		assert_eq!(item.extra.get("product_id"), Some(&json!("p1")));
		assert_eq!(serde_json::to_value(&item).unwrap(), raw);
	}

	#[test]
	fn null_primary_falls_back_to_alias() {
		let item: CartItem = serde_json::from_value(json!({ "_id": null, "entityId": "e1", "productId": null, "product_id": 7 })).unwrap();
		assert_eq!(item.identity(), ItemIdentity::new(Some("e1"), Some("7")));
		assert!(item.extra.is_empty());
	}

	#[test]
	fn null_ids_are_absent() {
		let item: CartItem = serde_json::from_value(json!({ "_id": null, "productId": true })).unwrap();
		assert!(!item.identity().is_known());
	}

	#[test]
	fn identity_comparison_crosses_fields() {
		let a = ItemIdentity::new(Some("x"), None);
		let b = ItemIdentity::new(None, Some("x"));
		assert!(a.matches(&b));
		assert!(b.matches(&a));
		assert!(!ItemIdentity::default().matches(&ItemIdentity::default()));
		assert!(b.contains("x"));
		assert!(!b.contains("y"));
	}
}
