use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use trolley_cart::{CartError, CartOp, CartState, Fulfilled};
use trolley_worker::{Actor, ActorContext, ActorFlow, TaskClass};

use crate::client::CartService;

/// Identifier assigned to one operation trigger, unique per store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpId(pub(crate) u64);

impl OpId {
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for OpId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "op#{}", self.0)
	}
}

/// What a [`CartEvent`] reports.
#[derive(Debug, Clone, PartialEq)]
pub enum CartChange {
	/// An operation entered its pending state.
	Pending { op_id: OpId, op: CartOp },
	/// An operation settled; `succeeded` is false for rejections.
	Settled { op_id: OpId, op: CartOp, succeeded: bool },
	/// The cart was emptied locally.
	Cleared,
	/// An optimistic quantity overwrite was attempted.
	LocallyUpdated { product_id: String, applied: bool },
	/// The session user was replaced.
	SessionChanged { logged_in: bool },
}

/// One state transition together with the state it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEvent {
	pub change: CartChange,
	pub snapshot: CartState,
}

/// A remote call, owned by the task that performs it.
#[derive(Debug, Clone)]
pub(crate) enum Request {
	Fetch,
	Add { product_id: String, quantity: i64 },
	Update { product_id: String, quantity: i64, cart_item_id: Option<String> },
	Remove { product_id: String },
}

impl Request {
	pub(crate) const fn op(&self) -> CartOp {
		match self {
			Self::Fetch => CartOp::Fetch,
			Self::Add { .. } => CartOp::Add,
			Self::Update { .. } => CartOp::Update,
			Self::Remove { .. } => CartOp::Remove,
		}
	}

	async fn run(self, service: &dyn CartService, user_id: &str) -> Result<Fulfilled, CartError> {
		let fulfilled = match self {
			Self::Fetch => Fulfilled::Fetched(service.get_cart(user_id).await?),
			Self::Add { product_id, quantity } => Fulfilled::Added(service.add_to_cart(user_id, &product_id, quantity).await?),
			Self::Update {
				product_id,
				quantity,
				cart_item_id,
			} => Fulfilled::Updated(service.update_cart_item(user_id, &product_id, quantity, cart_item_id.as_deref()).await?),
			Self::Remove { product_id } => {
				let payload = service.remove_from_cart(user_id, &product_id).await?;
				Fulfilled::Removed { product_id, payload }
			}
		};
		Ok(fulfilled)
	}
}

pub(crate) enum CartCommand {
	Request { op_id: OpId, request: Request },
	Settle { op_id: OpId, op: CartOp, result: Result<Fulfilled, CartError> },
	Clear,
	UpdateLocally { product_id: String, quantity: i64 },
	SetUser(Option<String>),
}

/// Owns the session's cart state. All mutation happens in [`Actor::handle`].
pub(crate) struct CartActor {
	service: Arc<dyn CartService>,
	user_id: Option<String>,
	state: CartState,
	snapshot: watch::Sender<CartState>,
	in_flight: usize,
}

impl CartActor {
	pub(crate) fn new(service: Arc<dyn CartService>, user_id: Option<String>, snapshot: watch::Sender<CartState>) -> Self {
		Self {
			service,
			user_id,
			state: CartState::new(),
			snapshot,
			in_flight: 0,
		}
	}

	fn publish(&self, change: CartChange, ctx: &ActorContext<CartCommand, CartEvent>) {
		self.snapshot.send_replace(self.state.clone());
		ctx.emit(CartEvent {
			change,
			snapshot: self.state.clone(),
		});
	}

	fn start(&mut self, op_id: OpId, request: Request, ctx: &ActorContext<CartCommand, CartEvent>) {
		let op = request.op();
		self.state.begin(op);
		self.publish(CartChange::Pending { op_id, op }, ctx);

		let Some(user_id) = self.user_id.clone() else {
			tracing::warn!(%op_id, op = op.as_str(), "cart.op.no_user");
			self.settle(op_id, op, Err(CartError::NotLoggedIn), ctx);
			return;
		};

		self.in_flight += 1;
		tracing::debug!(%op_id, op = op.as_str(), user = %user_id, in_flight = self.in_flight, "cart.op.dispatch");

		let service = Arc::clone(&self.service);
		let port = ctx.port();
		trolley_worker::spawn(TaskClass::Network, async move {
			let result = request.run(service.as_ref(), &user_id).await;
			if port.send_async(CartCommand::Settle { op_id, op, result }).await.is_err() {
				tracing::trace!(%op_id, op = op.as_str(), "cart.op.settle_dropped");
			}
		});
	}

	fn settle(&mut self, op_id: OpId, op: CartOp, result: Result<Fulfilled, CartError>, ctx: &ActorContext<CartCommand, CartEvent>) {
		let succeeded = result.is_ok();
		match result {
			Ok(fulfilled) => self.state.fulfill(fulfilled),
			Err(err) => self.state.reject(op, &err),
		}
		tracing::debug!(
			%op_id,
			op = op.as_str(),
			succeeded,
			items = self.state.items().len(),
			total = self.state.total(),
			"cart.op.settled"
		);
		self.publish(CartChange::Settled { op_id, op, succeeded }, ctx);
	}
}

#[async_trait]
impl Actor for CartActor {
	type Cmd = CartCommand;
	type Evt = CartEvent;

	async fn handle(&mut self, cmd: Self::Cmd, ctx: &mut ActorContext<Self::Cmd, Self::Evt>) -> Result<ActorFlow, String> {
		match cmd {
			CartCommand::Request { op_id, request } => self.start(op_id, request, ctx),
			CartCommand::Settle { op_id, op, result } => {
				self.in_flight = self.in_flight.saturating_sub(1);
				self.settle(op_id, op, result, ctx);
			}
			CartCommand::Clear => {
				self.state.clear();
				self.publish(CartChange::Cleared, ctx);
			}
			CartCommand::UpdateLocally { product_id, quantity } => {
				let applied = self.state.update_item_locally(&product_id, quantity);
				tracing::trace!(product_id = %product_id, quantity, applied, "cart.local_update");
				self.publish(CartChange::LocallyUpdated { product_id, applied }, ctx);
			}
			CartCommand::SetUser(user_id) => {
				let logged_in = user_id.is_some();
				self.user_id = user_id;
				self.publish(CartChange::SessionChanged { logged_in }, ctx);
			}
		}
		Ok(ActorFlow::Continue)
	}

	async fn on_stop(&mut self, _ctx: &mut ActorContext<Self::Cmd, Self::Evt>) {
		if self.in_flight > 0 {
			tracing::debug!(in_flight = self.in_flight, "cart.store.stopped_with_calls_in_flight");
		}
	}
}
