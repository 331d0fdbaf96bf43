//! Error vocabulary for the stream contract.
//!
//! The contract's signal methods have no error channel, so violations of the
//! protocol's rules are logged and the offending call dropped rather than
//! returned. Terminal failures reported by a producer travel as [`BoxError`]
//! payloads through `on_error`.

use thiserror::Error;

/// Boxed error payload carried by a terminal error signal.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A violation of the stream contract's activation or demand rules.
///
/// The offending call is rejected without affecting an already-active stream;
/// the violation is logged for diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
  /// A second subscription was offered to an already-active subscriber.
  #[error("subscription already set; duplicate activation rejected")]
  SubscriptionAlreadySet,
  /// Demand was requested before any subscription was established.
  #[error("demand requested before activation")]
  RequestBeforeSubscribe,
}
