use async_trait::async_trait;
use tokio::sync::broadcast;

use super::port::ActorCommandPort;
use crate::TaskClass;

/// Continuation directive from one command handling step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorFlow {
	/// Continue processing commands.
	Continue,
	/// Stop this actor.
	Stop,
}

/// Exit classification for an actor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActorExitKind {
	/// A handler returned [`ActorFlow::Stop`].
	Stopped,
	/// The mailbox was closed and fully drained.
	MailboxClosed,
	/// Shutdown was forced while commands may still have been queued.
	Cancelled,
	/// [`Actor::on_start`] returned an error.
	StartupFailed,
	/// [`Actor::handle`] returned an error.
	HandlerFailed,
	/// The actor task panicked.
	Panicked,
	/// The actor task could not be joined for another reason.
	JoinFailed,
}

/// Exit summary for one actor loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorExit {
	kind: ActorExitKind,
	message: Option<String>,
}

impl ActorExit {
	pub(crate) fn new(kind: ActorExitKind) -> Self {
		Self { kind, message: None }
	}

	pub(crate) fn with_message(kind: ActorExitKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: Some(message.into()),
		}
	}

	pub fn kind(&self) -> ActorExitKind {
		self.kind
	}

	pub fn message(&self) -> Option<&str> {
		self.message.as_deref()
	}

	pub fn is_failure(&self) -> bool {
		matches!(
			self.kind,
			ActorExitKind::StartupFailed | ActorExitKind::HandlerFailed | ActorExitKind::Panicked | ActorExitKind::JoinFailed
		)
	}
}

/// Actor behavior executed by the actor loop.
#[async_trait]
pub trait Actor: Send + 'static {
	type Cmd: Send + 'static;
	type Evt: Clone + Send + 'static;

	async fn on_start(&mut self, _ctx: &mut ActorContext<Self::Cmd, Self::Evt>) -> Result<(), String> {
		Ok(())
	}

	async fn on_stop(&mut self, _ctx: &mut ActorContext<Self::Cmd, Self::Evt>) {}

	async fn handle(&mut self, cmd: Self::Cmd, ctx: &mut ActorContext<Self::Cmd, Self::Evt>) -> Result<ActorFlow, String>;
}

/// Actor execution context: event emitter plus a port back into the actor's own mailbox.
pub struct ActorContext<Cmd, Evt>
where
	Cmd: Send + 'static,
{
	name: String,
	events: broadcast::Sender<Evt>,
	port: ActorCommandPort<Cmd>,
}

impl<Cmd, Evt> ActorContext<Cmd, Evt>
where
	Cmd: Send + 'static,
	Evt: Clone + Send + 'static,
{
	pub(crate) fn new(name: String, events: broadcast::Sender<Evt>, port: ActorCommandPort<Cmd>) -> Self {
		Self { name, events, port }
	}

	/// Actor name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Emits one event to subscribers. Events emitted with no subscriber are dropped.
	pub fn emit(&self, evt: Evt) {
		let _ = self.events.send(evt);
	}

	/// Returns a port that enqueues into this actor's mailbox.
	pub fn port(&self) -> ActorCommandPort<Cmd> {
		self.port.clone()
	}
}

/// Builder spec for one actor.
pub struct ActorSpec<A>
where
	A: Actor,
{
	pub(crate) name: String,
	pub(crate) class: TaskClass,
	pub(crate) mailbox_capacity: usize,
	pub(crate) event_buffer: usize,
	pub(crate) actor: A,
}

impl<A> ActorSpec<A>
where
	A: Actor,
{
	/// Creates a spec owning the initial actor value.
	pub fn new(name: impl Into<String>, class: TaskClass, actor: A) -> Self {
		Self {
			name: name.into(),
			class,
			mailbox_capacity: 128,
			event_buffer: 128,
			actor,
		}
	}

	/// Sets the mailbox capacity.
	///
	/// # Panics
	///
	/// Panics if `capacity` is zero.
	#[must_use]
	pub fn mailbox_capacity(mut self, capacity: usize) -> Self {
		assert!(capacity > 0, "mailbox capacity must be > 0");
		self.mailbox_capacity = capacity;
		self
	}

	/// Sets the event broadcast buffer capacity.
	///
	/// # Panics
	///
	/// Panics if `size` is zero.
	#[must_use]
	pub fn event_buffer(mut self, size: usize) -> Self {
		assert!(size > 0, "event buffer size must be > 0");
		self.event_buffer = size;
		self
	}
}
