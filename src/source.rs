//! The navigation-source seam between the router and the environment.
//!
//! The controller is agnostic to how the environment reflects navigations:
//! it talks to one [`NavigationSource`], selected at startup. Two concrete
//! implementations cover capable and legacy environments, both layered over
//! a minimal [`AddressBar`] view of the location.

use std::time::Duration;

/// Minimal view of the environment's address bar.
pub trait AddressBar {
    /// The address the environment currently shows (path, query, or `#!`
    /// fragment — whatever the environment navigates by).
    fn address(&self) -> String;

    /// Attempts to push a new history entry natively. Returns `false` when
    /// the environment lacks a history API.
    fn push_state(&self, url: &str) -> bool;

    /// Assigns the legacy `#!` fragment.
    fn set_fragment(&self, url: &str);
}

/// How a programmatic navigation was applied by the source.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Applied {
    /// The URL is in place; the controller should dispatch immediately.
    Dispatched,
    /// The environment will report the change later (hash change or poll);
    /// the controller must not dispatch now.
    Deferred,
}

/// Translates programmatic navigations into environment effects.
pub trait NavigationSource {
    /// The address currently observed in the environment.
    fn observed(&self) -> String;

    /// Applies a programmatic navigation to the environment.
    fn apply(&self, url: &str) -> Applied;
}

/// Navigation source for environments with a native history API.
pub struct HistorySource<B: AddressBar> {
    bar: B,
}

impl<B: AddressBar> HistorySource<B> {
    pub fn new(bar: B) -> HistorySource<B> {
        HistorySource { bar }
    }
}

impl<B: AddressBar> NavigationSource for HistorySource<B> {
    fn observed(&self) -> String {
        self.bar.address()
    }

    fn apply(&self, url: &str) -> Applied {
        if self.bar.push_state(url) {
            Applied::Dispatched
        } else {
            // The environment refused the push after all; fall back to the
            // fragment so the change is still delivered.
            self.bar.set_fragment(url);
            Applied::Deferred
        }
    }
}

/// Navigation source for legacy environments without a history API or hash
/// change events. Programmatic navigations assign the `#!` fragment; the
/// environment adapter detects the drift by calling
/// [`App::poll`](crate::App::poll) at a fixed interval.
pub struct PollingSource<B: AddressBar> {
    bar: B,
}

impl<B: AddressBar> PollingSource<B> {
    /// The interval the environment adapter should drive
    /// [`App::poll`](crate::App::poll) at.
    pub const INTERVAL: Duration = Duration::from_millis(500);

    pub fn new(bar: B) -> PollingSource<B> {
        PollingSource { bar }
    }
}

impl<B: AddressBar> NavigationSource for PollingSource<B> {
    fn observed(&self) -> String {
        self.bar.address()
    }

    fn apply(&self, url: &str) -> Applied {
        self.bar.set_fragment(url);
        Applied::Deferred
    }
}
