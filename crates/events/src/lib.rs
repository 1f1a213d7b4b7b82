//! `chassis-events` — pub/sub mechanics for fire-and-forget event publication.
//!
//! The bus here is the delivery channel for security-relevant events emitted
//! by the authorization pipeline. Publication must never block or fail a
//! request, so the in-process implementation is bounded and drops on full.

pub mod bus;
pub mod event;
pub mod local_bus;

pub use bus::{EventBus, PublishError, Subscription};
pub use event::Event;
pub use local_bus::LocalEventBus;
