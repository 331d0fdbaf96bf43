//! Metrics backend seam and Prometheus glue.
//!
//! The decorator never stores metric values itself; it only invokes
//! `increment` / `record` on instruments owned by an external backend. The
//! [`Counter`] and [`DurationTimer`] traits are that seam, and
//! [`StreamMetrics`] bundles the five instruments one stream endpoint needs:
//! four event counters (next, complete, error, cancelled) and one end-to-end
//! duration timer.
//!
//! Production instruments are backed by the `metrics` facade and exported via
//! Prometheus. Use [`install_prometheus_recorder`] at startup to expose them
//! for scraping; without a recorder, facade instruments record into the void.
//!
//! # Example
//!
//! ```rust,no_run
//! use streamgauge::metrics;
//! use streamgauge::StreamMetrics;
//!
//! // At startup, install the Prometheus recorder.
//! metrics::install_prometheus_recorder();
//!
//! // One bundle per instrumented endpoint.
//! let bundle = StreamMetrics::for_stream("quotes");
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// A monotonically increasing event counter owned by the metrics backend.
///
/// Assumed thread-safe, non-blocking, and infallible from the caller's point
/// of view.
pub trait Counter: Send + Sync {
  /// Adds one to the counter.
  fn increment(&self);
}

/// Records elapsed stream durations into the metrics backend.
pub trait DurationTimer: Send + Sync {
  /// Records one end-to-end duration sample.
  fn record(&self, elapsed: Duration);
}

/// The instrument bundle for one stream endpoint.
///
/// Cloning is cheap; clones share the underlying instruments, so one bundle
/// can serve every activation of the same endpoint.
#[derive(Clone)]
pub struct StreamMetrics {
  pub(crate) next: Arc<dyn Counter>,
  pub(crate) complete: Arc<dyn Counter>,
  pub(crate) error: Arc<dyn Counter>,
  pub(crate) cancelled: Arc<dyn Counter>,
  pub(crate) timer: Arc<dyn DurationTimer>,
}

impl StreamMetrics {
  /// Creates a bundle from explicit instruments.
  ///
  /// # Arguments
  ///
  /// * `next` - Counter incremented once per delivered value.
  /// * `complete` - Counter incremented when completion wins the terminal race.
  /// * `error` - Counter incremented when an error wins the terminal race.
  /// * `cancelled` - Counter incremented when cancellation wins the terminal race.
  /// * `timer` - Timer receiving one activation-to-terminal duration per stream.
  pub fn new(
    next: Arc<dyn Counter>,
    complete: Arc<dyn Counter>,
    error: Arc<dyn Counter>,
    cancelled: Arc<dyn Counter>,
    timer: Arc<dyn DurationTimer>,
  ) -> Self {
    Self {
      next,
      complete,
      error,
      cancelled,
      timer,
    }
  }

  /// Creates a bundle backed by the `metrics` facade, labelled with the
  /// stream name.
  ///
  /// Feeds `streamgauge_next_total`, `streamgauge_complete_total`,
  /// `streamgauge_error_total` and `streamgauge_cancelled_total` counters and
  /// the `streamgauge_stream_duration_seconds` histogram, each with a
  /// `stream` label.
  pub fn for_stream(stream: &str) -> Self {
    Self {
      next: Arc::new(FacadeCounter(metrics::counter!(
        "streamgauge_next_total",
        "stream" => stream.to_string()
      ))),
      complete: Arc::new(FacadeCounter(metrics::counter!(
        "streamgauge_complete_total",
        "stream" => stream.to_string()
      ))),
      error: Arc::new(FacadeCounter(metrics::counter!(
        "streamgauge_error_total",
        "stream" => stream.to_string()
      ))),
      cancelled: Arc::new(FacadeCounter(metrics::counter!(
        "streamgauge_cancelled_total",
        "stream" => stream.to_string()
      ))),
      timer: Arc::new(FacadeTimer(metrics::histogram!(
        "streamgauge_stream_duration_seconds",
        "stream" => stream.to_string()
      ))),
    }
  }
}

/// Counter backed by the `metrics` facade.
struct FacadeCounter(metrics::Counter);

impl Counter for FacadeCounter {
  fn increment(&self) {
    self.0.increment(1);
  }
}

/// Duration timer backed by a `metrics` facade histogram, in seconds.
struct FacadeTimer(metrics::Histogram);

impl DurationTimer for FacadeTimer {
  fn record(&self, elapsed: Duration) {
    self.0.record(elapsed.as_secs_f64());
  }
}

/// Installs the Prometheus recorder as the global metrics recorder.
///
/// Spawns an HTTP server that serves Prometheus metrics at `GET /metrics` on
/// the default address. Call once at startup.
///
/// If not called, metrics recording is a no-op (metrics are dropped).
pub fn install_prometheus_recorder() {
  use metrics_exporter_prometheus::PrometheusBuilder;
  PrometheusBuilder::new()
    .install()
    .expect("failed to install Prometheus recorder");
}

/// Installs the Prometheus recorder and serves metrics on the given address.
///
/// Use when you need to configure the listen address.
pub fn install_prometheus_recorder_on(addr: SocketAddr) {
  use metrics_exporter_prometheus::PrometheusBuilder;
  PrometheusBuilder::new()
    .with_http_listener(addr)
    .install()
    .expect("failed to install Prometheus recorder");
}
