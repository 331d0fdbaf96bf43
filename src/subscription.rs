//! Upstream subscription handle contract.
//!
//! A [`Subscription`] is the channel a consumer uses to signal demand and
//! cancellation back to the producer. Handles are shared as
//! `Arc<dyn Subscription>` because the stream engine may deliver signals from
//! any thread.

use std::sync::{Arc, OnceLock};

use crate::error::ProtocolViolation;

/// Handle for signalling demand and cancellation to an upstream producer.
pub trait Subscription: Send + Sync {
  /// Requests `n` more values from the producer.
  ///
  /// Non-positive demand is a contract violation handled by the producer,
  /// not by callers of this trait.
  fn request(&self, n: u64);

  /// Tells the producer to stop emitting and release its resources.
  fn cancel(&self);
}

/// Applies the stream contract's activation validation rule.
///
/// Stores `incoming` into `slot` and returns `true` when no subscription has
/// been established yet. When `slot` is already occupied the duplicate is
/// cancelled, the violation logged, and `false` returned; the active stream
/// is left untouched.
pub fn validate(slot: &OnceLock<Arc<dyn Subscription>>, incoming: Arc<dyn Subscription>) -> bool {
  match slot.set(incoming) {
    Ok(()) => true,
    Err(duplicate) => {
      tracing::error!(
        violation = %ProtocolViolation::SubscriptionAlreadySet,
        "rejecting duplicate subscription"
      );
      duplicate.cancel();
      false
    }
  }
}
