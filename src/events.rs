//! Typed lifecycle events.
//!
//! Each lifecycle event kind has its own payload type and its own listener
//! list; there is no string-keyed emitter. Listeners receive the app context
//! alongside the payload, so a `location` listener can, for example, perform
//! a guard-and-redirect.

use std::cell::RefCell;
use std::rc::Rc;

use crate::app::App;
use crate::error::ErrorRecord;

/// Emitted when a navigation transitions to a new URL, before any handler of
/// that navigation runs.
#[derive(Clone, Debug)]
pub struct LocationEvent {
    pub url: String,
}

/// Emitted once, after [`App::start`](crate::App::start) dispatched the
/// initial navigation.
#[derive(Clone, Copy, Debug)]
pub struct ReadyEvent;

/// Emitted after a navigation settles, once all matched routes ran and the
/// terminal statuses were reported.
#[derive(Clone, Debug)]
pub struct LoadEvent {
    pub url: String,
}

/// Status class of a settled navigation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusCode {
    /// No structurally matching non-wildcard route.
    NotFound,
    /// At least one partial renderer or handler failed during dispatch.
    InternalError,
}

impl StatusCode {
    pub fn as_u16(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::InternalError => 500,
        }
    }
}

/// Terminal status of a navigation. A navigation can raise both a 404 (only
/// wildcards matched) and a 500 (a boundary captured a failure); the two are
/// reported independently.
#[derive(Clone, Debug)]
pub struct StatusEvent {
    pub code: StatusCode,
    pub url: String,
    /// The failures aggregated during dispatch; empty for a 404.
    pub failures: Vec<ErrorRecord>,
}

struct Hook<T> {
    callback: Rc<dyn Fn(&App, &T)>,
    once: bool,
}

/// A listener list for one event kind.
pub(crate) struct Hooks<T> {
    listeners: RefCell<Vec<Hook<T>>>,
}

impl<T> Hooks<T> {
    fn new() -> Hooks<T> {
        Hooks {
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn on(&self, callback: Rc<dyn Fn(&App, &T)>) {
        self.listeners.borrow_mut().push(Hook { callback, once: false });
    }

    pub(crate) fn once(&self, callback: Rc<dyn Fn(&App, &T)>) {
        self.listeners.borrow_mut().push(Hook { callback, once: true });
    }

    /// Invokes the current listeners. The list is snapshotted first and
    /// `once` listeners are removed before any callback runs, so a reentrant
    /// emit cannot re-fire them and listeners added during the emit are not
    /// invoked for it.
    pub(crate) fn emit(&self, app: &App, payload: &T) {
        let snapshot: Vec<Rc<dyn Fn(&App, &T)>> = {
            let mut listeners = self.listeners.borrow_mut();
            let snapshot = listeners.iter().map(|hook| Rc::clone(&hook.callback)).collect();
            listeners.retain(|hook| !hook.once);
            snapshot
        };

        for callback in snapshot {
            callback(app, payload);
        }
    }
}

pub(crate) struct Events {
    pub(crate) location: Hooks<LocationEvent>,
    pub(crate) error: Hooks<ErrorRecord>,
    pub(crate) status: Hooks<StatusEvent>,
    pub(crate) ready: Hooks<ReadyEvent>,
    pub(crate) load: Hooks<LoadEvent>,
}

impl Events {
    pub(crate) fn new() -> Events {
        Events {
            location: Hooks::new(),
            error: Hooks::new(),
            status: Hooks::new(),
            ready: Hooks::new(),
            load: Hooks::new(),
        }
    }
}
