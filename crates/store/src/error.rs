use trolley_worker::ActorSendError;

/// Errors from the consumer-facing store handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
	/// The store actor has shut down and no longer accepts commands.
	#[error("cart store stopped")]
	Stopped,
	/// An event subscriber fell behind and `skipped` events were discarded.
	/// The awaited event may be among them; read [`crate::CartHandle::snapshot`].
	#[error("cart event subscriber lagged by {skipped} events")]
	EventsLagged { skipped: u64 },
}

impl From<ActorSendError> for StoreError {
	fn from(_: ActorSendError) -> Self {
		Self::Stopped
	}
}
