//! Downstream consumer contract.

use std::sync::Arc;

use crate::error::BoxError;
use crate::subscription::Subscription;

/// Receiver side of the push-stream contract.
///
/// A producer activates the stream by calling [`on_subscribe`] exactly once
/// with the handle the consumer uses to issue demand, then delivers zero or
/// more values followed by at most one terminal signal (`on_error` or
/// `on_complete`). Methods take `&self` because the engine may invoke them
/// from producer- and consumer-owned threads concurrently; implementations
/// own whatever interior mutability they need.
///
/// [`on_subscribe`]: StreamSubscriber::on_subscribe
pub trait StreamSubscriber<T>: Send + Sync {
  /// Called once at activation with the handle for issuing demand and
  /// cancellation.
  fn on_subscribe(&self, subscription: Arc<dyn Subscription>);

  /// Delivers one produced value. Only called while outstanding demand is
  /// positive and no terminal signal has been delivered.
  fn on_next(&self, value: T);

  /// Terminal failure signal from the producer. No further signals follow.
  fn on_error(&self, error: BoxError);

  /// Terminal completion signal from the producer. No further signals follow.
  fn on_complete(&self);
}
