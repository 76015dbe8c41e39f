use std::time::Duration;

use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::port::ActorCommandPort;
use super::spec::{Actor, ActorContext, ActorExit, ActorExitKind, ActorFlow, ActorSpec};

/// Error returned when sending a command to a stopped actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorSendError {
	/// The actor's mailbox is closed.
	Closed,
}

impl std::fmt::Display for ActorSendError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ActorSendError::Closed => write!(f, "actor mailbox closed"),
		}
	}
}

impl std::error::Error for ActorSendError {}

/// Shutdown mode for an actor.
#[derive(Debug, Clone, Copy)]
pub enum ActorShutdownMode {
	/// Stop at the next command boundary, discarding queued commands.
	Immediate,
	/// Refuse new commands, drain the queue, then stop. Falls back to
	/// [`ActorShutdownMode::Immediate`] once `timeout` elapses.
	Graceful { timeout: Duration },
}

/// Shutdown report for one actor.
#[derive(Debug, Clone)]
pub struct ActorShutdownReport {
	completed: bool,
	timed_out: bool,
	last_exit: Option<ActorExit>,
}

impl ActorShutdownReport {
	/// `true` when the actor stopped within the requested mode's limits.
	pub fn completed(&self) -> bool {
		self.completed
	}

	pub fn timed_out(&self) -> bool {
		self.timed_out
	}

	pub fn last_exit(&self) -> Option<&ActorExit> {
		self.last_exit.as_ref()
	}
}

enum JoinState {
	Running(JoinHandle<ActorExit>),
	Done(ActorExit),
}

/// Handle for one running actor.
///
/// Dropping the handle forces the actor to stop at its next command boundary.
pub struct ActorHandle<Cmd, Evt>
where
	Cmd: Send + 'static,
	Evt: Clone + Send + 'static,
{
	name: String,
	port: ActorCommandPort<Cmd>,
	events: broadcast::Sender<Evt>,
	close: CancellationToken,
	cancel: CancellationToken,
	join: Mutex<JoinState>,
}

impl<Cmd, Evt> Drop for ActorHandle<Cmd, Evt>
where
	Cmd: Send + 'static,
	Evt: Clone + Send + 'static,
{
	fn drop(&mut self) {
		self.cancel.cancel();
	}
}

impl<Cmd, Evt> ActorHandle<Cmd, Evt>
where
	Cmd: Send + 'static,
	Evt: Clone + Send + 'static,
{
	/// Spawns the actor loop described by `spec`.
	pub fn spawn<A>(spec: ActorSpec<A>) -> Self
	where
		A: Actor<Cmd = Cmd, Evt = Evt>,
	{
		let (tx, rx) = mpsc::channel(spec.mailbox_capacity);
		let (events, _) = broadcast::channel(spec.event_buffer);
		let port = ActorCommandPort::new(tx);
		let close = CancellationToken::new();
		let cancel = CancellationToken::new();

		let ctx = ActorContext::new(spec.name.clone(), events.clone(), port.clone());
		let task = crate::spawn(spec.class, run_actor(spec.actor, rx, ctx, close.clone(), cancel.clone()));

		Self {
			name: spec.name,
			port,
			events,
			close,
			cancel,
			join: Mutex::new(JoinState::Running(task)),
		}
	}

	/// Subscribes to actor events.
	pub fn subscribe(&self) -> crate::ActorEventReceiver<Evt> {
		self.events.subscribe()
	}

	/// Returns a cloneable enqueue port.
	pub fn port(&self) -> ActorCommandPort<Cmd> {
		self.port.clone()
	}

	/// Sends one command, waiting for mailbox capacity.
	pub async fn send(&self, cmd: Cmd) -> Result<(), ActorSendError> {
		self.port.send_async(cmd).await.map_err(|_| ActorSendError::Closed)
	}

	/// Sends one command without waiting. Fails when the mailbox is full or closed.
	pub fn try_send(&self, cmd: Cmd) -> Result<(), ActorSendError> {
		self.port.send(cmd).map_err(|_| ActorSendError::Closed)
	}

	/// Shuts down this actor.
	pub async fn shutdown(&self, mode: ActorShutdownMode) -> ActorShutdownReport {
		match mode {
			ActorShutdownMode::Immediate => {
				self.cancel.cancel();
				let last_exit = self.join(None).await;
				ActorShutdownReport {
					completed: true,
					timed_out: false,
					last_exit,
				}
			}
			ActorShutdownMode::Graceful { timeout } => {
				self.close.cancel();
				if let Some(exit) = self.join(Some(timeout)).await {
					return ActorShutdownReport {
						completed: true,
						timed_out: false,
						last_exit: Some(exit),
					};
				}
				tracing::warn!(actor = %self.name, "graceful shutdown timed out; forcing immediate");
				self.cancel.cancel();
				ActorShutdownReport {
					completed: false,
					timed_out: true,
					last_exit: self.join(None).await,
				}
			}
		}
	}

	/// Waits for the actor task, optionally bounded. Returns `None` on timeout.
	async fn join(&self, limit: Option<Duration>) -> Option<ActorExit> {
		let mut state = self.join.lock().await;
		let handle = match &mut *state {
			JoinState::Done(exit) => return Some(exit.clone()),
			JoinState::Running(handle) => handle,
		};

		let joined = match limit {
			Some(limit) => tokio::time::timeout(limit, &mut *handle).await.ok()?,
			None => (&mut *handle).await,
		};
		let exit = match joined {
			Ok(exit) => exit,
			Err(err) if err.is_panic() => ActorExit::new(ActorExitKind::Panicked),
			Err(err) if err.is_cancelled() => ActorExit::new(ActorExitKind::Cancelled),
			Err(err) => ActorExit::with_message(ActorExitKind::JoinFailed, err.to_string()),
		};
		*state = JoinState::Done(exit.clone());
		Some(exit)
	}
}

async fn run_actor<A>(
	mut actor: A, mut rx: mpsc::Receiver<A::Cmd>, mut ctx: ActorContext<A::Cmd, A::Evt>, close: CancellationToken, cancel: CancellationToken,
) -> ActorExit
where
	A: Actor,
{
	let started = tokio::select! {
		biased;
		_ = cancel.cancelled() => None,
		res = actor.on_start(&mut ctx) => Some(res),
	};
	match started {
		None => return ActorExit::new(ActorExitKind::Cancelled),
		Some(Err(err)) => return ActorExit::with_message(ActorExitKind::StartupFailed, err),
		Some(Ok(())) => {}
	}

	let mut closing = false;
	let exit = loop {
		let cmd = tokio::select! {
			biased;
			_ = cancel.cancelled() => break ActorExit::new(ActorExitKind::Cancelled),
			_ = close.cancelled(), if !closing => {
				// Queued commands are still delivered; new sends fail.
				rx.close();
				closing = true;
				continue;
			}
			msg = rx.recv() => {
				let Some(cmd) = msg else {
					break ActorExit::new(ActorExitKind::MailboxClosed);
				};
				cmd
			}
		};

		match actor.handle(cmd, &mut ctx).await {
			Ok(ActorFlow::Continue) => {}
			Ok(ActorFlow::Stop) => break ActorExit::new(ActorExitKind::Stopped),
			Err(err) => break ActorExit::with_message(ActorExitKind::HandlerFailed, err),
		}
	};

	actor.on_stop(&mut ctx).await;
	tracing::debug!(actor = %ctx.name(), exit = ?exit.kind(), "worker.actor.exit");
	exit
}
