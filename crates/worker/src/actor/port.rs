use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

/// Cloneable enqueue port into an actor mailbox.
pub struct ActorCommandPort<Cmd>
where
	Cmd: Send + 'static,
{
	tx: mpsc::Sender<Cmd>,
	drops: Arc<AtomicU64>,
}

impl<Cmd> Clone for ActorCommandPort<Cmd>
where
	Cmd: Send + 'static,
{
	fn clone(&self) -> Self {
		Self {
			tx: self.tx.clone(),
			drops: Arc::clone(&self.drops),
		}
	}
}

impl<Cmd> ActorCommandPort<Cmd>
where
	Cmd: Send + 'static,
{
	pub(crate) fn new(tx: mpsc::Sender<Cmd>) -> Self {
		Self {
			tx,
			drops: Arc::new(AtomicU64::new(0)),
		}
	}

	/// Non-blocking enqueue. Returns `Err` if the mailbox is full or closed.
	pub fn send(&self, cmd: Cmd) -> Result<(), mpsc::error::TrySendError<Cmd>> {
		let result = self.tx.try_send(cmd);
		if let Err(mpsc::error::TrySendError::Full(_)) = &result {
			let count = self.drops.fetch_add(1, Ordering::Relaxed);
			if count % 1024 == 0 {
				tracing::warn!(drops = count + 1, "actor mailbox full, dropping command");
			}
		}
		result
	}

	/// Async enqueue. Waits for capacity if full.
	pub async fn send_async(&self, cmd: Cmd) -> Result<(), mpsc::error::SendError<Cmd>> {
		self.tx.send(cmd).await
	}

	/// Returns `true` once the receiving actor has stopped accepting commands.
	pub fn is_closed(&self) -> bool {
		self.tx.is_closed()
	}

	/// Number of commands rejected because the mailbox was full.
	pub fn drop_count(&self) -> u64 {
		self.drops.load(Ordering::Relaxed)
	}
}
