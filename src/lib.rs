//! # StreamGauge
//!
//! Metrics instrumentation for asynchronous, backpressured push streams.
//!
//! StreamGauge decorates a stream activation with observability metrics:
//! per-event counters (next, complete, error, cancelled) and one end-to-end
//! duration per stream. The decorator forwards every signal unmodified in
//! both directions of the protocol, so instrumentation never alters delivery
//! order or the contract's exactly-once-terminal-signal guarantee.
//!
//! ## Key Features
//!
//! - **Transparent**: values and terminal signals pass through unbuffered
//! - **Lock-Free**: terminal accounting is a single atomic compare-and-set;
//!   the value path is never blocked
//! - **Race-Safe**: completion/error racing a concurrent cancellation is
//!   accounted at most once, while both signals still propagate
//! - **Backend-Agnostic**: the metrics backend is a seam; a Prometheus-backed
//!   implementation ships in [`metrics`]
//!
//! ## Quick Start
//!
//! ```rust
//! use streamgauge::producers::from_iter;
//! use streamgauge::{StreamMetrics, instrument};
//!
//! // One instrument bundle per endpoint; wrap the source with it.
//! let metrics = StreamMetrics::for_stream("quotes");
//! let publisher = instrument(from_iter(vec![1, 2, 3]), metrics);
//! # let _ = publisher;
//! ```
//!
//! Every subscriber attached to `publisher` now gets a fresh
//! [`MetricsSubscriber`] interposed for its activation.

// Documentation enforcement - treat missing docs as errors
#![deny(missing_docs)]

/// Error vocabulary: terminal error payloads and protocol violations.
pub mod error;
/// Metrics backend seam, instrument bundle, and Prometheus glue.
pub mod metrics;
/// The metrics decorator for a single stream activation.
pub mod metrics_subscriber;
/// Built-in publishers for driving instrumented streams.
pub mod producers;
/// Producer contract and the instrumenting operator.
pub mod publisher;
/// Downstream consumer contract.
pub mod subscriber;
/// Upstream subscription handle contract.
pub mod subscription;

pub use error::{BoxError, ProtocolViolation};
pub use crate::metrics::{Counter, DurationTimer, StreamMetrics};
pub use metrics_subscriber::MetricsSubscriber;
pub use publisher::{Instrumented, Publisher, instrument};
pub use subscriber::StreamSubscriber;
pub use subscription::Subscription;

#[cfg(test)]
mod subscription_test;
