//! Actor-owned cart store.
//!
//! [`CartHandle::spawn`] starts one actor that owns the session's
//! [`trolley_cart::CartState`]. Operation triggers are mailbox commands; each
//! remote call runs as its own task and posts its result back into the same
//! mailbox, where it is reconciled. Calls are never serialized against each
//! other, so the last result to arrive determines the cart.

mod actor;
mod client;
mod config;
mod error;
mod handle;
mod memory;

pub use actor::{CartChange, CartEvent, OpId};
pub use client::{CartService, ServiceError};
pub use config::StoreConfig;
pub use error::StoreError;
pub use handle::{CartHandle, next_settled};
pub use memory::{MemoryCartService, RemoveResponse, ResponseShape};
pub use trolley_cart as cart;
