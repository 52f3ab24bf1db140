//! Error types and the captured-failure record.

use std::fmt;
use std::time::SystemTime;

/// The error type returned by handlers and partial renderers. Failures are
/// absorbed by the navigation controller, never propagated to the caller.
pub type BoxError = Box<dyn std::error::Error>;

/// Represents errors that can occur when registering a new route.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum RouteError {
    /// Wildcard segments are only allowed at the end of a pattern.
    InvalidWildcard,
    /// Parameters must be registered with a name.
    UnnamedParam,
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWildcard => {
                write!(f, "wildcard segments are only allowed at the end of a pattern")
            }
            Self::UnnamedParam => write!(f, "parameters must be registered with a name"),
        }
    }
}

impl std::error::Error for RouteError {}

/// The dispatch phase a failure was captured in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    /// A partial renderer failed.
    Partial,
    /// A route handler failed.
    Route,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Partial => write!(f, "partial"),
            Self::Route => write!(f, "route"),
        }
    }
}

/// A captured failure.
///
/// Records are appended to the bounded error log, surfaced through the
/// `error` lifecycle event at capture time, and aggregated into the terminal
/// `500` status of the navigation that produced them.
#[derive(Clone, Debug)]
pub struct ErrorRecord {
    /// The failure message, as reported by the handler or renderer.
    pub message: String,
    /// The canonical URL of the navigation the failure occurred in.
    pub url: String,
    /// Whether the failure came from a partial renderer or a route handler.
    pub phase: Phase,
    /// Capture time.
    pub timestamp: SystemTime,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failure at {}: {}", self.phase, self.url, self.message)
    }
}
