//! Demand-driven publisher over a `futures::Stream`.
//!
//! [`StreamPublisher`] adapts an async stream into the push-stream contract:
//! a pump task pulls from the stream only while outstanding demand is
//! positive, delivering `on_next` per `Ok` item, `on_error` on the first
//! `Err`, and `on_complete` at exhaustion. Cancellation stops the pump.
//!
//! This is a reference source for exercising instrumented pipelines, not a
//! transport: the underlying stream is consumed by the first activation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::{Stream, StreamExt};
use thiserror::Error;
use tokio::sync::Notify;

use crate::error::BoxError;
use crate::publisher::Publisher;
use crate::subscriber::StreamSubscriber;
use crate::subscription::Subscription;

/// A publisher that pumps items out of a `futures::Stream`, gated by demand.
pub struct StreamPublisher<St> {
  source: Mutex<Option<St>>,
}

impl<St> StreamPublisher<St> {
  /// Creates a publisher over `stream`. Items are `Result`s so the source
  /// can terminate the stream with an error.
  pub fn new(stream: St) -> Self {
    Self {
      source: Mutex::new(Some(stream)),
    }
  }
}

/// Publisher over an in-memory sequence of values; completes after the last.
pub fn from_iter<I>(
  items: I,
) -> StreamPublisher<impl Stream<Item = Result<I::Item, BoxError>> + Send + Unpin + 'static>
where
  I: IntoIterator,
  I::IntoIter: Send + 'static,
  I::Item: 'static,
{
  StreamPublisher::new(futures::stream::iter(items.into_iter().map(Ok)))
}

/// The stream was already consumed by an earlier activation.
#[derive(Debug, Error)]
#[error("stream source already consumed by an earlier subscriber")]
struct SourceConsumed;

/// Demand ledger shared between the pump task and the consumer's handle.
struct PumpSubscription {
  /// Outstanding demand; `u64::MAX` is treated as unbounded.
  demand: AtomicU64,
  cancelled: AtomicBool,
  wake: Notify,
}

impl PumpSubscription {
  fn new() -> Self {
    Self {
      demand: AtomicU64::new(0),
      cancelled: AtomicBool::new(false),
      wake: Notify::new(),
    }
  }

  /// Consumes one unit of demand; returns `false` when none is outstanding.
  fn take_one(&self) -> bool {
    self
      .demand
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |demand| match demand {
        0 => None,
        u64::MAX => Some(u64::MAX),
        n => Some(n - 1),
      })
      .is_ok()
  }

  fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::Acquire)
  }
}

impl Subscription for PumpSubscription {
  fn request(&self, n: u64) {
    let _ = self
      .demand
      .fetch_update(Ordering::AcqRel, Ordering::Acquire, |demand| {
        Some(demand.saturating_add(n))
      });
    self.wake.notify_one();
  }

  fn cancel(&self) {
    self.cancelled.store(true, Ordering::Release);
    self.wake.notify_one();
  }
}

impl<St, T> Publisher<T> for StreamPublisher<St>
where
  St: Stream<Item = Result<T, BoxError>> + Send + Unpin + 'static,
  T: Send + 'static,
{
  fn subscribe(&self, subscriber: Arc<dyn StreamSubscriber<T>>) {
    let taken = self.source.lock().ok().and_then(|mut slot| slot.take());
    let subscription = Arc::new(PumpSubscription::new());
    subscriber.on_subscribe(subscription.clone());

    let Some(mut stream) = taken else {
      subscriber.on_error(Box::new(SourceConsumed));
      return;
    };

    tokio::spawn(async move {
      loop {
        if subscription.is_cancelled() {
          return;
        }
        if subscription.take_one() {
          match stream.next().await {
            Some(Ok(value)) => subscriber.on_next(value),
            Some(Err(error)) => {
              subscriber.on_error(error);
              return;
            }
            None => {
              subscriber.on_complete();
              return;
            }
          }
        } else {
          subscription.wake.notified().await;
        }
      }
    });
  }
}
