//! Domain events runtime bridge for the web server.
//!
//! The server has no background work to trigger yet, so events are only
//! recorded in the trace log.

mod sink;

pub use sink::TracingDomainEventSink;
