//! Producer contract and the instrumenting operator.

use std::sync::Arc;

use crate::metrics::StreamMetrics;
use crate::metrics_subscriber::MetricsSubscriber;
use crate::subscriber::StreamSubscriber;

/// Source side of the push-stream contract.
pub trait Publisher<T>: Send + Sync {
  /// Activates a new stream for `subscriber`.
  ///
  /// The publisher must call `on_subscribe` exactly once before delivering
  /// any other signal, then honor demand issued through the handle it
  /// provided.
  fn subscribe(&self, subscriber: Arc<dyn StreamSubscriber<T>>);
}

/// Publisher wrapper that interposes a fresh [`MetricsSubscriber`] on every
/// activation.
///
/// All activations served by one `Instrumented` share the same
/// [`StreamMetrics`] bundle, so counters aggregate across streams of the same
/// endpoint while the timer still receives one sample per activation.
pub struct Instrumented<P> {
  inner: P,
  metrics: StreamMetrics,
}

impl<P> Instrumented<P> {
  /// Wraps `inner` so every stream it serves is measured against `metrics`.
  pub fn new(inner: P, metrics: StreamMetrics) -> Self {
    Self { inner, metrics }
  }
}

impl<T: 'static, P: Publisher<T>> Publisher<T> for Instrumented<P> {
  fn subscribe(&self, subscriber: Arc<dyn StreamSubscriber<T>>) {
    let decorated = MetricsSubscriber::new(subscriber, self.metrics.clone());
    self.inner.subscribe(decorated);
  }
}

/// Convenience constructor for [`Instrumented`].
pub fn instrument<P>(publisher: P, metrics: StreamMetrics) -> Instrumented<P> {
  Instrumented::new(publisher, metrics)
}
