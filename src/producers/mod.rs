//! Built-in publishers for driving instrumented streams.

pub mod stream_publisher;

pub use stream_publisher::{StreamPublisher, from_iter};
