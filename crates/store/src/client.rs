use async_trait::async_trait;
use serde_json::Value;
use trolley_cart::{CartError, CartPayload, ErrorPayload};

/// Transport failure reported by a [`CartService`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
	message: String,
	status: Option<u16>,
	body: Option<Value>,
}

impl ServiceError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			status: None,
			body: None,
		}
	}

	/// Attaches the structured response body.
	#[must_use]
	pub fn with_body(mut self, body: Value) -> Self {
		self.body = Some(body);
		self
	}

	/// Attaches the transport status code.
	#[must_use]
	pub fn with_status(mut self, status: u16) -> Self {
		self.status = Some(status);
		self
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	pub fn status(&self) -> Option<u16> {
		self.status
	}

	pub fn body(&self) -> Option<&Value> {
		self.body.as_ref()
	}

	/// The structured body when one was sent, otherwise the message.
	pub fn payload(&self) -> ErrorPayload {
		match &self.body {
			Some(body) if !body.is_null() => ErrorPayload::Structured(body.clone()),
			_ => ErrorPayload::Message(self.message.clone()),
		}
	}
}

impl From<ServiceError> for CartError {
	fn from(err: ServiceError) -> Self {
		CartError::Service(err.payload())
	}
}

/// Remote cart service.
///
/// Implementations own transport concerns (retries included) and normalize
/// every response body into a [`CartPayload`] before returning it.
#[async_trait]
pub trait CartService: Send + Sync {
	/// Returns the user's full cart.
	async fn get_cart(&self, user_id: &str) -> Result<CartPayload, ServiceError>;

	/// Adds `quantity` of `product_id`. Backends answer with either the full
	/// cart or the affected line.
	async fn add_to_cart(&self, user_id: &str, product_id: &str, quantity: i64) -> Result<CartPayload, ServiceError>;

	/// Sets the quantity of one line. Backends answer with either the full cart
	/// or the affected line.
	async fn update_cart_item(&self, user_id: &str, product_id: &str, quantity: i64, cart_item_id: Option<&str>) -> Result<CartPayload, ServiceError>;

	/// Removes one line. Backends answer with the full cart or no body.
	async fn remove_from_cart(&self, user_id: &str, product_id: &str) -> Result<CartPayload, ServiceError>;
}
