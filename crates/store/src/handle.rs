use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use trolley_cart::CartState;
use trolley_worker::{ActorEventReceiver, ActorHandle, ActorShutdownMode, ActorSpec, TaskClass};

use crate::actor::{CartActor, CartChange, CartCommand, CartEvent, OpId, Request};
use crate::client::CartService;
use crate::config::StoreConfig;
use crate::error::StoreError;

/// Consumer-facing handle to one cart store. Cheap to clone; every clone
/// talks to the same actor.
///
/// Operation methods return as soon as the trigger is queued. Settlement is
/// observed through [`CartHandle::subscribe`] (see [`next_settled`]) or
/// [`CartHandle::watch`].
#[derive(Clone)]
pub struct CartHandle {
	inner: Arc<Inner>,
}

struct Inner {
	actor: ActorHandle<CartCommand, CartEvent>,
	snapshot: watch::Receiver<CartState>,
	next_op: AtomicU64,
	shutdown_timeout: Duration,
}

impl CartHandle {
	/// Starts a store for `user_id`. `None` means no one is logged in; remote
	/// operations then reject without reaching `service`.
	pub fn spawn(service: Arc<dyn CartService>, user_id: Option<String>, config: &StoreConfig) -> Self {
		let (snapshot_tx, snapshot) = watch::channel(CartState::new());
		let actor = CartActor::new(service, user_id, snapshot_tx);
		let spec = ActorSpec::new("cart.store", TaskClass::Interactive, actor)
			.mailbox_capacity(config.mailbox_capacity.max(1))
			.event_buffer(config.event_buffer.max(1));
		tracing::debug!(
			mailbox_capacity = config.mailbox_capacity,
			event_buffer = config.event_buffer,
			"cart.store.spawn"
		);

		Self {
			inner: Arc::new(Inner {
				actor: ActorHandle::spawn(spec),
				snapshot,
				next_op: AtomicU64::new(1),
				shutdown_timeout: config.shutdown_timeout(),
			}),
		}
	}

	async fn request(&self, request: Request) -> Result<OpId, StoreError> {
		let op_id = OpId(self.inner.next_op.fetch_add(1, Ordering::Relaxed));
		self.inner.actor.send(CartCommand::Request { op_id, request }).await?;
		Ok(op_id)
	}

	/// Loads the user's cart, replacing local items with the response.
	pub async fn fetch_cart(&self) -> Result<OpId, StoreError> {
		self.request(Request::Fetch).await
	}

	pub async fn add_to_cart(&self, product_id: impl Into<String>, quantity: i64) -> Result<OpId, StoreError> {
		self.request(Request::Add {
			product_id: product_id.into(),
			quantity,
		})
		.await
	}

	/// Sets a line's quantity remotely. `cart_item_id` is forwarded to the
	/// service as-is when given.
	pub async fn update_cart_item(&self, product_id: impl Into<String>, quantity: i64, cart_item_id: Option<&str>) -> Result<OpId, StoreError> {
		self.request(Request::Update {
			product_id: product_id.into(),
			quantity,
			cart_item_id: cart_item_id.map(str::to_string),
		})
		.await
	}

	pub async fn remove_from_cart(&self, product_id: impl Into<String>) -> Result<OpId, StoreError> {
		self.request(Request::Remove {
			product_id: product_id.into(),
		})
		.await
	}

	/// Empties the cart locally. Calls already in flight still settle afterwards.
	pub async fn clear_cart(&self) -> Result<(), StoreError> {
		Ok(self.inner.actor.send(CartCommand::Clear).await?)
	}

	/// Overwrites one line's quantity without a remote call.
	pub async fn update_cart_item_locally(&self, product_id: impl Into<String>, quantity: i64) -> Result<(), StoreError> {
		let product_id = product_id.into();
		Ok(self.inner.actor.send(CartCommand::UpdateLocally { product_id, quantity }).await?)
	}

	/// Replaces the session user. Cart contents are left as they are.
	pub async fn set_user(&self, user_id: Option<String>) -> Result<(), StoreError> {
		Ok(self.inner.actor.send(CartCommand::SetUser(user_id)).await?)
	}

	/// Latest published state.
	pub fn snapshot(&self) -> CartState {
		self.inner.snapshot.borrow().clone()
	}

	pub fn watch(&self) -> watch::Receiver<CartState> {
		self.inner.snapshot.clone()
	}

	/// Subscribes to transitions. Only events published after this call are
	/// delivered, so subscribe before triggering the operation of interest.
	pub fn subscribe(&self) -> ActorEventReceiver<CartEvent> {
		self.inner.actor.subscribe()
	}

	/// Stops accepting commands, applies what is already queued, then stops.
	/// Calls still in flight are abandoned. Returns `false` if the configured
	/// timeout elapsed and the store was stopped forcibly.
	pub async fn shutdown(&self) -> bool {
		let report = self
			.inner
			.actor
			.shutdown(ActorShutdownMode::Graceful {
				timeout: self.inner.shutdown_timeout,
			})
			.await;
		tracing::debug!(completed = report.completed(), timed_out = report.timed_out(), "cart.store.shutdown");
		report.completed()
	}
}

/// Waits for `op_id` to settle and returns its event.
///
/// Fails with [`StoreError::EventsLagged`] once the subscriber has fallen
/// behind, since the settle may have been among the discarded events.
pub async fn next_settled(events: &mut ActorEventReceiver<CartEvent>, op_id: OpId) -> Result<CartEvent, StoreError> {
	loop {
		match events.recv().await {
			Ok(event) => {
				if matches!(event.change, CartChange::Settled { op_id: id, .. } if id == op_id) {
					return Ok(event);
				}
			}
			Err(RecvError::Lagged(skipped)) => {
				tracing::warn!(%op_id, skipped, "cart.events.lagged");
				return Err(StoreError::EventsLagged { skipped });
			}
			Err(RecvError::Closed) => return Err(StoreError::Stopped),
		}
	}
}
