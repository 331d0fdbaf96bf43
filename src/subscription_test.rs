//! # Subscription Validation Test Suite
//!
//! Covers the activation validation rule: the first subscription is stored,
//! a duplicate is cancelled and rejected, and the established handle is
//! never overwritten.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use crate::subscription::{Subscription, validate};

#[derive(Default)]
struct RecordingSubscription {
  requests: Mutex<Vec<u64>>,
  cancels: AtomicU64,
}

impl Subscription for RecordingSubscription {
  fn request(&self, n: u64) {
    self.requests.lock().unwrap().push(n);
  }

  fn cancel(&self) {
    self.cancels.fetch_add(1, Ordering::Relaxed);
  }
}

#[test]
fn test_validate_accepts_first_subscription() {
  let slot: OnceLock<Arc<dyn Subscription>> = OnceLock::new();
  let first = Arc::new(RecordingSubscription::default());

  assert!(validate(&slot, first.clone()));
  assert_eq!(first.cancels.load(Ordering::Relaxed), 0);

  slot.get().unwrap().request(9);
  assert_eq!(*first.requests.lock().unwrap(), vec![9]);
}

#[test]
fn test_validate_cancels_duplicate_and_keeps_first() {
  let slot: OnceLock<Arc<dyn Subscription>> = OnceLock::new();
  let first = Arc::new(RecordingSubscription::default());
  let duplicate = Arc::new(RecordingSubscription::default());

  assert!(validate(&slot, first.clone()));
  assert!(!validate(&slot, duplicate.clone()));

  assert_eq!(duplicate.cancels.load(Ordering::Relaxed), 1);
  assert_eq!(first.cancels.load(Ordering::Relaxed), 0);

  // The established handle still serves demand.
  slot.get().unwrap().request(2);
  assert_eq!(*first.requests.lock().unwrap(), vec![2]);
  assert_eq!(duplicate.requests.lock().unwrap().len(), 0);
}
