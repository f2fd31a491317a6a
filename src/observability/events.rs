//! Observable adapter events
//!
//! Events are explicit and typed; the string form is the `event` key of
//! every log line.

use std::fmt;

use super::logger::Severity;

/// Observable events in the storage adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Adapter constructed and ready for calls
    AdapterReady,
    /// Fetch returned its records and count
    FetchComplete,
    /// Insert stored all records
    InsertComplete,
    /// Mutate applied every update item
    MutateComplete,
    /// Remove deleted matching documents
    RemoveComplete,
    /// Insert rejected on a duplicate key
    InsertConflict,
    /// Backend call failed
    BackendFailure,
    /// A stored binary value could not be decoded
    BinaryDecodeFailed,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::AdapterReady => "ADAPTER_READY",
            Event::FetchComplete => "FETCH_COMPLETE",
            Event::InsertComplete => "INSERT_COMPLETE",
            Event::MutateComplete => "MUTATE_COMPLETE",
            Event::RemoveComplete => "REMOVE_COMPLETE",
            Event::InsertConflict => "INSERT_CONFLICT",
            Event::BackendFailure => "BACKEND_FAILURE",
            Event::BinaryDecodeFailed => "BINARY_DECODE_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::AdapterReady => Severity::Info,
            Event::FetchComplete
            | Event::InsertComplete
            | Event::MutateComplete
            | Event::RemoveComplete => Severity::Trace,
            Event::InsertConflict => Severity::Warn,
            Event::BackendFailure | Event::BinaryDecodeFailed => Severity::Error,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::AdapterReady,
            Event::FetchComplete,
            Event::InsertComplete,
            Event::MutateComplete,
            Event::RemoveComplete,
            Event::InsertConflict,
            Event::BackendFailure,
            Event::BinaryDecodeFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_failure_events_are_errors() {
        assert_eq!(Event::BackendFailure.severity(), Severity::Error);
        assert_eq!(Event::BinaryDecodeFailed.severity(), Severity::Error);
        assert_eq!(Event::InsertConflict.severity(), Severity::Warn);
        assert_eq!(Event::FetchComplete.severity(), Severity::Trace);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::AdapterReady), "ADAPTER_READY");
    }
}
