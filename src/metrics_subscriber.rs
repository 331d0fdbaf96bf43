//! The metrics decorator for a single stream activation.
//!
//! [`MetricsSubscriber`] sits transparently between a producer and the real
//! consumer. It forwards every signal unmodified in both directions while
//! recording per-event counters and one activation-to-terminal duration as a
//! side effect. One instance serves exactly one activation.
//!
//! # Terminal accounting
//!
//! The stream contract allows completion or error from the producer side to
//! race against a concurrently-issued cancellation from the consumer side.
//! Exactly one of the three may be accounted per activation, enforced by a
//! single atomic compare-and-set on the terminal flag. The flag guards
//! *accounting only*: whichever side loses the race still has its signal
//! forwarded, so propagation never depends on winning the metrics race.
//!
//! # Concurrency
//!
//! Value delivery, demand forwarding and the losing side of a terminal race
//! are never blocked; the only contended state is the terminal flag and it is
//! lock-free. The decorator owns no scheduling and performs no I/O.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, Weak};
use std::time::Instant;

use crate::error::{BoxError, ProtocolViolation};
use crate::metrics::StreamMetrics;
use crate::subscriber::StreamSubscriber;
use crate::subscription::{self, Subscription};

/// Decorator that counts stream signals and times stream lifetime without
/// altering delivery.
///
/// Implements both sides of the contract at once: it is the
/// [`StreamSubscriber`] the producer delivers into, and the [`Subscription`]
/// proxy the real consumer issues demand and cancellation against. It holds
/// no stream content; values pass through unbuffered and unmodified.
pub struct MetricsSubscriber<T: 'static> {
  actual: Arc<dyn StreamSubscriber<T>>,
  metrics: StreamMetrics,
  /// Self-handle passed to the consumer as its subscription proxy.
  this: Weak<Self>,
  /// Set exactly once at activation, read-only afterward.
  upstream: OnceLock<Arc<dyn Subscription>>,
  start: OnceLock<Instant>,
  terminal_fired: AtomicBool,
}

impl<T: 'static> MetricsSubscriber<T> {
  /// Wraps `actual` so the stream it consumes is measured against `metrics`.
  ///
  /// Returns an `Arc` because both directions of the contract hold the
  /// instance: the producer as a subscriber, the consumer as its
  /// subscription proxy.
  pub fn new(actual: Arc<dyn StreamSubscriber<T>>, metrics: StreamMetrics) -> Arc<Self> {
    Arc::new_cyclic(|this| Self {
      actual,
      metrics,
      this: this.clone(),
      upstream: OnceLock::new(),
      start: OnceLock::new(),
      terminal_fired: AtomicBool::new(false),
    })
  }

  /// First terminal signal wins; at most one of {complete, error, cancelled}
  /// is accounted per activation.
  fn try_fire_terminal(&self) -> bool {
    self
      .terminal_fired
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
  }

  fn record_duration(&self) {
    if let Some(start) = self.start.get() {
      self.metrics.timer.record(start.elapsed());
    }
  }
}

impl<T: 'static> StreamSubscriber<T> for MetricsSubscriber<T> {
  fn on_subscribe(&self, subscription: Arc<dyn Subscription>) {
    if subscription::validate(&self.upstream, subscription) {
      let _ = self.start.set(Instant::now());
      // Signal the consumer only after the upstream handle is stored, so
      // demand issued synchronously during activation forwards correctly.
      if let Some(proxy) = self.this.upgrade() {
        self.actual.on_subscribe(proxy);
      }
    }
  }

  fn on_next(&self, value: T) {
    self.metrics.next.increment();
    self.actual.on_next(value);
  }

  fn on_error(&self, error: BoxError) {
    if self.try_fire_terminal() {
      self.metrics.error.increment();
      self.record_duration();
    }
    // Forwarded win or lose: the consumer must always learn of upstream
    // termination even when cancellation already took the accounting.
    self.actual.on_error(error);
  }

  fn on_complete(&self) {
    if self.try_fire_terminal() {
      self.metrics.complete.increment();
      self.record_duration();
    }
    self.actual.on_complete();
  }
}

impl<T: 'static> Subscription for MetricsSubscriber<T> {
  fn request(&self, n: u64) {
    match self.upstream.get() {
      Some(upstream) => upstream.request(n),
      None => tracing::error!(
        violation = %ProtocolViolation::RequestBeforeSubscribe,
        demand = n,
        "dropping demand request"
      ),
    }
  }

  fn cancel(&self) {
    if self.try_fire_terminal() {
      self.metrics.cancelled.increment();
      self.record_duration();
    }
    // Forwarded win or lose: the producer must always learn of cancellation
    // even when completion or error already took the accounting.
    if let Some(upstream) = self.upstream.get() {
      upstream.cancel();
    }
  }
}
