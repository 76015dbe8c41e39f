//! In-process cart backend.
//!
//! Responses are produced as JSON bodies and run through
//! [`CartPayload::from_json`], the same normalization a network adapter uses,
//! so both response shapes can be exercised without a server.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use trolley_cart::{CartItem, CartPayload, RawNumber};

use crate::client::{CartService, ServiceError};

/// Body returned by add and update calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
	/// `{ "items": [...] }` with the whole cart.
	#[default]
	FullCart,
	/// The affected line only.
	SingleItem,
}

/// Body returned by remove calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveResponse {
	/// `{ "items": [...] }` with the remaining cart.
	#[default]
	FullCart,
	/// No body at all.
	NoBody,
}

#[derive(Default)]
struct Backend {
	catalog: HashMap<String, Value>,
	carts: HashMap<String, Vec<CartItem>>,
	add_shape: ResponseShape,
	update_shape: ResponseShape,
	remove_shape: RemoveResponse,
	failures: VecDeque<ServiceError>,
	next_line: u64,
}

impl Backend {
	fn line_id(&mut self) -> String {
		self.next_line += 1;
		format!("line-{}", self.next_line)
	}

	fn cart(&mut self, user_id: &str) -> &mut Vec<CartItem> {
		self.carts.entry(user_id.to_string()).or_default()
	}

	fn cart_body(&self, user_id: &str) -> Result<Value, ServiceError> {
		let items = self.carts.get(user_id).map(Vec::as_slice).unwrap_or_default();
		Ok(json!({ "items": encode(items)? }))
	}

	fn respond(&self, user_id: &str, shape: ResponseShape, line: &CartItem) -> Result<CartPayload, ServiceError> {
		let body = match shape {
			ResponseShape::FullCart => self.cart_body(user_id)?,
			ResponseShape::SingleItem => encode(line)?,
		};
		Ok(CartPayload::from_json(body))
	}
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Value, ServiceError> {
	serde_json::to_value(value).map_err(|err| ServiceError::new(format!("failed to encode response: {err}")).with_status(500))
}

fn not_found(what: &str, id: &str) -> ServiceError {
	ServiceError::new(format!("request failed with status 404: {what} {id} not found"))
		.with_status(404)
		.with_body(json!({ "message": format!("{what} not found"), "id": id }))
}

/// In-memory [`CartService`] with per-user carts and a price catalog.
#[derive(Default)]
pub struct MemoryCartService {
	backend: Mutex<Backend>,
}

impl MemoryCartService {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a product price. Strings are served verbatim, which lets the
	/// caller exercise lenient price parsing.
	#[must_use]
	pub fn with_product(self, product_id: impl Into<String>, price: impl Into<Value>) -> Self {
		self.backend.lock().catalog.insert(product_id.into(), price.into());
		self
	}

	/// Sets the body shape for add and update responses.
	#[must_use]
	pub fn with_shapes(self, add: ResponseShape, update: ResponseShape, remove: RemoveResponse) -> Self {
		{
			let mut backend = self.backend.lock();
			backend.add_shape = add;
			backend.update_shape = update;
			backend.remove_shape = remove;
		}
		self
	}

	/// Makes the next call fail with `err`. Queued failures are consumed in order.
	pub fn fail_next(&self, err: ServiceError) {
		self.backend.lock().failures.push_back(err);
	}

	/// Current stored lines for `user_id`.
	pub fn lines(&self, user_id: &str) -> Vec<CartItem> {
		self.backend.lock().carts.get(user_id).cloned().unwrap_or_default()
	}

	fn injected_failure(backend: &mut Backend, call: &str) -> Result<(), ServiceError> {
		match backend.failures.pop_front() {
			Some(err) => {
				tracing::debug!(call, error = %err, "memory_cart.injected_failure");
				Err(err)
			}
			None => Ok(()),
		}
	}
}

#[async_trait]
impl CartService for MemoryCartService {
	async fn get_cart(&self, user_id: &str) -> Result<CartPayload, ServiceError> {
		let mut backend = self.backend.lock();
		Self::injected_failure(&mut backend, "get_cart")?;
		Ok(CartPayload::from_json(backend.cart_body(user_id)?))
	}

	async fn add_to_cart(&self, user_id: &str, product_id: &str, quantity: i64) -> Result<CartPayload, ServiceError> {
		let mut backend = self.backend.lock();
		Self::injected_failure(&mut backend, "add_to_cart")?;
		let Some(price) = backend.catalog.get(product_id).cloned() else {
			return Err(not_found("product", product_id));
		};

		let existing = backend
			.cart(user_id)
			.iter()
			.position(|line| line.product_id.as_deref() == Some(product_id));
		let line = match existing {
			Some(at) => {
				let line = &mut backend.cart(user_id)[at];
				line.quantity = line.quantity.as_integer().saturating_add(quantity).into();
				line.clone()
			}
			None => {
				let entity_id = backend.line_id();
				let line = CartItem::new(Some(&entity_id), Some(product_id), RawNumber(price), quantity);
				backend.cart(user_id).push(line.clone());
				line
			}
		};
		let shape = backend.add_shape;
		backend.respond(user_id, shape, &line)
	}

	async fn update_cart_item(&self, user_id: &str, product_id: &str, quantity: i64, cart_item_id: Option<&str>) -> Result<CartPayload, ServiceError> {
		let mut backend = self.backend.lock();
		Self::injected_failure(&mut backend, "update_cart_item")?;
		let cart = backend.cart(user_id);
		let found = cart.iter_mut().find(|line| match cart_item_id {
			Some(id) => line.entity_id.as_deref() == Some(id),
			None => line.product_id.as_deref() == Some(product_id),
		});
		let Some(line) = found else {
			return Err(not_found("cart item", cart_item_id.unwrap_or(product_id)));
		};
		line.quantity = quantity.max(0).into();
		let line = line.clone();
		let shape = backend.update_shape;
		backend.respond(user_id, shape, &line)
	}

	async fn remove_from_cart(&self, user_id: &str, product_id: &str) -> Result<CartPayload, ServiceError> {
		let mut backend = self.backend.lock();
		Self::injected_failure(&mut backend, "remove_from_cart")?;
		let cart = backend.cart(user_id);
		let before = cart.len();
		cart.retain(|line| !line.identity().contains(product_id));
		if cart.len() == before {
			return Err(not_found("cart item", product_id));
		}
		match backend.remove_shape {
			RemoveResponse::FullCart => Ok(CartPayload::from_json(backend.cart_body(user_id)?)),
			RemoveResponse::NoBody => Ok(CartPayload::from_optional_json(None)),
		}
	}
}
