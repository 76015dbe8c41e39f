//! Single-owner actor loop.
//!
//! An actor value is moved into one task together with the receiving end of a
//! bounded mailbox. Commands are applied in arrival order and each
//! [`Actor::handle`] call runs to completion before the next command is read.
//! Work that must not block the loop is spawned by the handler, and its result
//! comes back as another command through an [`ActorCommandPort`].

mod handle;
mod port;
mod spec;

pub use handle::{ActorHandle, ActorSendError, ActorShutdownMode, ActorShutdownReport};
pub use port::ActorCommandPort;
pub use spec::{Actor, ActorContext, ActorExit, ActorExitKind, ActorFlow, ActorSpec};
