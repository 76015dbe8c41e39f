use serde::{Deserialize, Serialize};

/// Store actor sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
	/// Mailbox capacity for operation triggers and settle results.
	pub mailbox_capacity: usize,
	/// Broadcast buffer for change events. Slow subscribers skip ahead.
	pub event_buffer: usize,
	/// Graceful shutdown budget in milliseconds.
	pub shutdown_timeout_ms: u64,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			mailbox_capacity: 128,
			event_buffer: 128,
			shutdown_timeout_ms: 1_000,
		}
	}
}

impl StoreConfig {
	pub fn shutdown_timeout(&self) -> std::time::Duration {
		std::time::Duration::from_millis(self.shutdown_timeout_ms)
	}
}
