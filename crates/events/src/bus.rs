//! Notification publishing/subscription abstraction (mechanics only).
//!
//! The engine never knows who is listening. A rendering layer, a logger or a
//! test subscribes to the bus and re-reads the engine state when told that
//! stock changed.
//!
//! ## Delivery
//!
//! - **Synchronous**: `publish` hands the message to every live subscriber
//!   before returning. Nothing is queued beyond the subscriber's channel.
//! - **Best-effort**: a subscriber that went away is dropped silently. A failing
//!   publish is reported to the caller, which decides whether to care (the
//!   engine logs and moves on; its state is already committed).
//! - **Broadcast**: each subscription receives its own copy of every message.

use std::sync::mpsc::Receiver;

/// A subscription to a notification stream.
///
/// ```ignore
/// let subscription = engine.subscribe();
/// engine.purchase(0, Money::new(2000))?;
///
/// while let Ok(change) = subscription.try_recv() {
///     redraw(engine.stock_list());
/// }
/// ```
///
/// Subscriptions are meant for a single consumer. Dropping one unsubscribes it
/// on the next publish.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain everything already delivered, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Domain-agnostic pub/sub bus.
///
/// Requires `Send + Sync` so an engine wrapped in a mutex can be shared across
/// threads together with its bus.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}
