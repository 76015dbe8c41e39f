use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Message stored when an operation is attempted without a session user.
pub const NOT_LOGGED_IN: &str = "User not logged in";

/// Error value recorded in [`crate::CartState::error`].
///
/// Services that answer with a structured error body keep that body; anything
/// else is reduced to its message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorPayload {
	/// Structured response body returned by the cart service.
	Structured(Value),
	/// Plain message, used when no structured body is available.
	Message(String),
}

impl fmt::Display for ErrorPayload {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Structured(body) => match body.get("message").and_then(Value::as_str) {
				Some(message) => f.write_str(message),
				None => write!(f, "{body}"),
			},
			Self::Message(message) => f.write_str(message),
		}
	}
}

impl From<&str> for ErrorPayload {
	fn from(message: &str) -> Self {
		Self::Message(message.to_string())
	}
}

impl From<String> for ErrorPayload {
	fn from(message: String) -> Self {
		Self::Message(message)
	}
}

/// Reasons an operation lifecycle ends in the rejected state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CartError {
	/// No session user; raised before any service call is made.
	#[error("{}", NOT_LOGGED_IN)]
	NotLoggedIn,
	/// The cart service failed or refused the request.
	#[error("cart service error: {0}")]
	Service(ErrorPayload),
}

impl CartError {
	/// Payload written to the cart state on rejection.
	pub fn payload(&self) -> ErrorPayload {
		match self {
			Self::NotLoggedIn => ErrorPayload::Message(NOT_LOGGED_IN.to_string()),
			Self::Service(payload) => payload.clone(),
		}
	}
}
