//! Observability for the storage adapter
//!
//! - Structured logging (JSON lines)
//! - Per-adapter counters
//! - Typed events
//!
//! # Usage
//!
//! ```ignore
//! use docbridge::observability::{log_event_with_fields, AdapterMetrics, Event};
//!
//! log_event_with_fields(Event::FetchComplete, &[("type", "user"), ("count", "42")]);
//!
//! let metrics = AdapterMetrics::new();
//! metrics.record_fetch(42);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{AdapterMetrics, MetricsSnapshot};

/// Log an event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log an event with fields at its own severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(Event::AdapterReady);
        log_event(Event::FetchComplete);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::RemoveComplete, &[("type", "user"), ("count", "0")]);
    }
}
