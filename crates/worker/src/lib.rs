//! Shared worker runtime primitives for trolley.
//!
//! * [`spawn`]: runtime-aware task spawning tagged with a [`TaskClass`].
//! * [`actor`]: a single-owner actor loop. One task owns the actor value and
//!   applies mailbox commands strictly one at a time, so handler bodies never
//!   interleave even when the work they start runs concurrently.

pub mod actor;
mod class;
mod spawn;

pub use actor::{Actor, ActorCommandPort, ActorContext, ActorExit, ActorExitKind, ActorFlow, ActorHandle, ActorSendError, ActorShutdownMode, ActorShutdownReport, ActorSpec};
pub use class::TaskClass;
pub use spawn::spawn;

/// Receiver type for actor event subscriptions.
pub type ActorEventReceiver<Evt> = tokio::sync::broadcast::Receiver<Evt>;
