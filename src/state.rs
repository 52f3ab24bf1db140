//! Navigation state.
//!
//! One `NavigationState` is constructed per [`App`](crate::App) and lives for
//! the application's lifetime. It is never global: handlers reach it through
//! the app context they are invoked with, which keeps reentrant navigation
//! and testing tractable.

use std::any::Any;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::error::ErrorRecord;
use crate::history::HistoryStack;
use crate::params::QueryParams;

/// Maximum number of captured failures retained; the oldest is evicted
/// first.
pub(crate) const ERROR_LOG_CAPACITY: usize = 100;

pub(crate) struct NavigationState {
    /// The last successfully normalized URL, in canonical form.
    pub(crate) current_url: String,
    /// Query snapshot of the current URL.
    pub(crate) params: QueryParams,
    /// Per-navigation scratch storage, cleared at the start of every
    /// navigation. Carries no identity across navigations.
    pub(crate) repository: HashMap<String, Rc<dyn Any>>,
    /// The model value handed to `redirect_with` for the current navigation.
    pub(crate) model: Option<Rc<dyn Any>>,
    pub(crate) history: HistoryStack,
    pub(crate) error_log: VecDeque<ErrorRecord>,
    /// Monotonically increasing count of navigations processed. Zero means
    /// the very first navigation has not happened yet, which is what the
    /// legacy back/forward detection keys on.
    pub(crate) navigation_count: u64,
    /// Canonical URL of the last programmatic push, consumed by the next
    /// native pop-style event to avoid a double navigation.
    pub(crate) suppress_next_pop: Option<String>,
}

impl NavigationState {
    pub(crate) fn new() -> NavigationState {
        NavigationState {
            current_url: String::new(),
            params: QueryParams::default(),
            repository: HashMap::new(),
            model: None,
            history: HistoryStack::default(),
            error_log: VecDeque::new(),
            navigation_count: 0,
            suppress_next_pop: None,
        }
    }

    pub(crate) fn log_error(&mut self, record: ErrorRecord) {
        self.error_log.push_back(record);
        if self.error_log.len() > ERROR_LOG_CAPACITY {
            self.error_log.pop_front();
        }
    }
}
