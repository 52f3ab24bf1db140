//! The navigation controller.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::SystemTime;

use log::{debug, trace, warn};

use crate::error::{BoxError, ErrorRecord, Phase, RouteError};
use crate::events::{Events, LoadEvent, LocationEvent, ReadyEvent, StatusCode, StatusEvent};
use crate::params::QueryParams;
use crate::path;
use crate::route::{self, Route};
use crate::source::{Applied, NavigationSource};
use crate::state::NavigationState;

/// A route handler: receives the app context and the extracted parameter
/// values, in placeholder order.
pub type Handler = Rc<dyn Fn(&App, &[String]) -> Result<(), BoxError>>;

/// A partial renderer: receives the app context and the current URL.
pub type Renderer = Rc<dyn Fn(&App, &str) -> Result<(), BoxError>>;

/// Optional settings for a route registration.
#[derive(Clone, Debug, Default)]
pub struct RouteConfig {
    /// Named partial renderers invoked, in order, before the handler.
    pub partials: Vec<String>,
    /// A fire-once route is eligible to match at most one time; later
    /// matching navigations skip it silently.
    pub fire_once: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum NavigationKind {
    /// A regular navigation: the previous URL is pushed onto the history
    /// stack.
    Forward,
    /// A back-navigation: no history push, to avoid corrupting the stack.
    Back,
    /// A refresh of the current URL: no history push.
    Refresh,
}

/// The application router.
///
/// `App` owns the route table, the partial-renderer registry, the lifecycle
/// event listeners, and the navigation state. It is single-threaded; every
/// navigation runs synchronously to completion before the triggering call
/// returns, and a handler may itself trigger another navigation — each
/// navigation is an independent call frame that commits its state before
/// invoking any callback.
pub struct App {
    routes: RefCell<Vec<Rc<Route>>>,
    partials: RefCell<HashMap<String, Renderer>>,
    events: Events,
    state: RefCell<NavigationState>,
    source: RefCell<Option<Rc<dyn NavigationSource>>>,
    // Model handed to a deferred redirect, consumed by its later delivery.
    pending_model: RefCell<Option<Rc<dyn Any>>>,
    ready_fired: Cell<bool>,
}

impl App {
    pub fn new() -> App {
        App {
            routes: RefCell::new(Vec::new()),
            partials: RefCell::new(HashMap::new()),
            events: Events::new(),
            state: RefCell::new(NavigationState::new()),
            source: RefCell::new(None),
            pending_model: RefCell::new(None),
            ready_fired: Cell::new(false),
        }
    }

    /// Selects the navigation source. Expected to happen once, at startup,
    /// before [`start`](App::start).
    pub fn bind(&self, source: impl NavigationSource + 'static) {
        *self.source.borrow_mut() = Some(Rc::new(source));
    }

    // ---------------------------------------------------------------------
    // Registration
    // ---------------------------------------------------------------------

    /// Registers a route.
    ///
    /// ```
    /// # let app = waypoint::App::new();
    /// app.route("/blog/{category}/{post}", |_app, params| {
    ///     println!("{} / {}", params[0], params[1]);
    ///     Ok(())
    /// })?;
    /// # Ok::<(), waypoint::RouteError>(())
    /// ```
    pub fn route(
        &self,
        pattern: &str,
        handler: impl Fn(&App, &[String]) -> Result<(), BoxError> + 'static,
    ) -> Result<(), RouteError> {
        self.route_with(pattern, handler, RouteConfig::default())
    }

    /// Registers a route with partials and the fire-once flag.
    ///
    /// The table is re-sorted on every registration, descending by priority;
    /// routes of equal priority keep their registration order. Registration
    /// is a startup-path operation, not a navigation-path one.
    pub fn route_with(
        &self,
        pattern: &str,
        handler: impl Fn(&App, &[String]) -> Result<(), BoxError> + 'static,
        config: RouteConfig,
    ) -> Result<(), RouteError> {
        let route = Route::new(pattern, Rc::new(handler), config.partials, config.fire_once)?;
        debug!("registered route '{}' with priority {}", route.pattern(), route.priority());

        let mut routes = self.routes.borrow_mut();
        routes.push(Rc::new(route));
        routes.sort_by_key(|route| Reverse(route.priority()));
        Ok(())
    }

    /// Registers a named partial renderer.
    pub fn partial(&self, name: &str, renderer: impl Fn(&App, &str) -> Result<(), BoxError> + 'static) {
        self.partials.borrow_mut().insert(name.to_string(), Rc::new(renderer));
    }

    /// Registered patterns in match order, with their computed priorities.
    pub fn routes(&self) -> Vec<(String, i32)> {
        self.routes
            .borrow()
            .iter()
            .map(|route| (route.pattern().to_string(), route.priority()))
            .collect()
    }

    // ---------------------------------------------------------------------
    // Navigation triggers
    // ---------------------------------------------------------------------

    /// Navigates to a URL. A refresh navigation skips the history push.
    pub fn location(&self, url: &str, refresh: bool) {
        let kind = if refresh { NavigationKind::Refresh } else { NavigationKind::Forward };
        self.navigate(url, kind, None);
    }

    /// Programmatic redirect through the bound navigation source.
    ///
    /// On a capable source the URL is pushed natively and dispatched
    /// synchronously, with the next native pop for the same URL suppressed.
    /// On a legacy source the `#!` fragment is assigned instead and the
    /// navigation is delivered later by [`hash_change`](App::hash_change) or
    /// [`poll`](App::poll) — that split is deliberate. Without a source the
    /// navigation dispatches directly.
    pub fn redirect(&self, url: &str) {
        self.programmatic(url, NavigationKind::Forward, None);
    }

    /// Like [`redirect`](App::redirect), carrying a model value for the
    /// target navigation, readable through [`model`](App::model).
    pub fn redirect_with(&self, url: &str, model: impl Any + 'static) {
        self.programmatic(url, NavigationKind::Forward, Some(Rc::new(model)));
    }

    /// Pops the history stack (root fallback when empty) and redirects to
    /// the popped URL as a back-class navigation.
    pub fn back(&self) {
        let target = self.state.borrow_mut().history.pop();
        self.programmatic(&target, NavigationKind::Back, None);
    }

    /// Re-dispatches the current URL without touching the history stack.
    pub fn refresh(&self) {
        let current = self.state.borrow().current_url.clone();
        self.navigate(&current, NavigationKind::Refresh, None);
    }

    /// Initial load: navigates to the source's observed address (or the
    /// root, without a source) and emits `ready` once.
    pub fn start(&self) {
        let source = self.source.borrow().clone();
        let url = source.map(|source| source.observed()).unwrap_or_else(|| "/".to_string());
        self.navigate(&url, NavigationKind::Forward, None);

        if !self.ready_fired.replace(true) {
            self.events.ready.emit(self, &ReadyEvent);
        }
    }

    // ---------------------------------------------------------------------
    // Native event entry points (called by the environment adapter)
    // ---------------------------------------------------------------------

    /// A native back/forward event. Consumes the suppression flag set by the
    /// last programmatic push; if the URLs match, the event is the echo of
    /// that push and is dropped with no side effects.
    pub fn pop(&self, url: &str) {
        let canonical = path::canonical(url);
        let suppressed = self.state.borrow_mut().suppress_next_pop.take();
        if suppressed.as_deref() == Some(canonical.as_str()) {
            trace!("suppressed duplicate pop for {canonical}");
            return;
        }
        self.navigate(url, NavigationKind::Back, None);
    }

    /// A native hash-fragment change.
    pub fn hash_change(&self, url: &str) {
        self.deliver(url);
    }

    /// One polling tick: compares the source's observed address against the
    /// current URL and navigates on drift. The legacy adapter drives this at
    /// [`PollingSource::INTERVAL`](crate::PollingSource::INTERVAL).
    pub fn poll(&self) {
        let source = self.source.borrow().clone();
        let Some(source) = source else {
            return;
        };
        let observed = source.observed();
        if path::canonical(&observed) == self.state.borrow().current_url {
            return;
        }
        self.deliver(&observed);
    }

    // Delivery shared by hash changes and poll drift. The very first
    // navigation is forward-class; later drift is assumed to be the user
    // moving back or forward, which must not push onto the history stack.
    fn deliver(&self, url: &str) {
        let canonical = path::canonical(url);
        let suppressed = self.state.borrow_mut().suppress_next_pop.take();
        if suppressed.as_deref() == Some(canonical.as_str()) {
            trace!("suppressed duplicate navigation to {canonical}");
            return;
        }

        let kind = if self.state.borrow().navigation_count == 0 {
            NavigationKind::Forward
        } else {
            NavigationKind::Back
        };
        let model = self.pending_model.borrow_mut().take();
        self.navigate(url, kind, model);
    }

    fn programmatic(&self, url: &str, kind: NavigationKind, model: Option<Rc<dyn Any>>) {
        let source = self.source.borrow().clone();
        let Some(source) = source else {
            self.navigate(url, kind, model);
            return;
        };

        // Set immediately before the push so the echo event cannot race it.
        self.state.borrow_mut().suppress_next_pop = Some(path::canonical(url));

        match source.apply(url) {
            Applied::Dispatched => self.navigate(url, kind, model),
            Applied::Deferred => {
                // No pop will follow a fragment assignment; the hash change
                // or poll tick delivers this navigation instead.
                self.state.borrow_mut().suppress_next_pop = None;
                *self.pending_model.borrow_mut() = model;
                trace!("redirect to {url} deferred to the navigation source");
            }
        }
    }

    // ---------------------------------------------------------------------
    // The navigation state machine: Idle -> Matching -> Dispatching ->
    // Settled, run synchronously per navigation. Borrows of the shared
    // state are never held across a callback invocation, so a handler can
    // reentrantly start another navigation.
    // ---------------------------------------------------------------------

    fn navigate(&self, raw: &str, kind: NavigationKind, model: Option<Rc<dyn Any>>) {
        // Matching.
        let target = path::segments(raw);
        let url = path::canonical_of(&target);

        let (matched, found_non_wildcard) = {
            let routes = self.routes.borrow();
            route::match_path(&routes, &target)
        };
        trace!("navigating to {url} ({} matched)", matched.len());

        // Commit the full state update before any callback runs, so a
        // nested navigation never observes a half-updated frame.
        {
            let mut state = self.state.borrow_mut();
            if kind == NavigationKind::Forward && state.navigation_count > 0 {
                let previous = state.current_url.clone();
                state.history.push(&previous);
            }
            state.current_url = url.clone();
            state.params = QueryParams::parse(raw);
            state.repository.clear();
            state.model = model;
            state.navigation_count += 1;
        }

        self.events.location.emit(self, &LocationEvent { url: url.clone() });

        // Dispatching.
        let mut failures = Vec::new();
        for route in &matched {
            if route.fire_once() && route.match_count() > 0 {
                debug!("skipping exhausted fire-once route '{}'", route.pattern());
                continue;
            }
            route.bump_match_count();

            for name in route.partials() {
                self.invoke_partial(name, &url, &mut failures);
            }

            // A partial failure does not abort the owning route's handler,
            // and a handler failure does not stop later matched routes.
            let params = route.extract(&target);
            if let Err(err) = route.call(self, &params) {
                self.capture(&mut failures, Phase::Route, &url, err.to_string());
            }
        }

        // Settled. The 500 and 404 statuses are independent; both can fire
        // for the same navigation.
        if !failures.is_empty() {
            self.events.status.emit(
                self,
                &StatusEvent {
                    code: StatusCode::InternalError,
                    url: url.clone(),
                    failures,
                },
            );
        }
        if !found_non_wildcard {
            self.events.status.emit(
                self,
                &StatusEvent {
                    code: StatusCode::NotFound,
                    url: url.clone(),
                    failures: Vec::new(),
                },
            );
        }
        self.events.load.emit(self, &LoadEvent { url });
    }

    fn invoke_partial(&self, name: &str, url: &str, failures: &mut Vec<ErrorRecord>) {
        let renderer = self.partials.borrow().get(name).cloned();
        match renderer {
            Some(renderer) => {
                if let Err(err) = renderer(self, url) {
                    self.capture(failures, Phase::Partial, url, err.to_string());
                }
            }
            None => {
                self.capture(
                    failures,
                    Phase::Partial,
                    url,
                    format!("partial '{name}' is not registered"),
                );
            }
        }
    }

    fn capture(&self, failures: &mut Vec<ErrorRecord>, phase: Phase, url: &str, message: String) {
        warn!("{phase} failure at {url}: {message}");
        let record = ErrorRecord {
            message,
            url: url.to_string(),
            phase,
            timestamp: SystemTime::now(),
        };
        self.state.borrow_mut().log_error(record.clone());
        self.events.error.emit(self, &record);
        failures.push(record);
    }

    // ---------------------------------------------------------------------
    // Partials, outside a navigation
    // ---------------------------------------------------------------------

    /// Invokes a named partial renderer with the current URL. Failures are
    /// absorbed the same way as during dispatch: recorded and surfaced
    /// through the `error` event.
    pub fn render(&self, name: &str) {
        let url = self.state.borrow().current_url.clone();
        self.invoke_partial(name, &url, &mut Vec::new());
    }

    /// Invokes partial renderers by name, in the given order.
    pub fn render_all(&self, names: &[&str]) {
        for name in names {
            self.render(name);
        }
    }

    // ---------------------------------------------------------------------
    // Lifecycle event listeners
    // ---------------------------------------------------------------------

    pub fn on_location(&self, listener: impl Fn(&App, &LocationEvent) + 'static) {
        self.events.location.on(Rc::new(listener));
    }

    pub fn once_location(&self, listener: impl Fn(&App, &LocationEvent) + 'static) {
        self.events.location.once(Rc::new(listener));
    }

    pub fn on_error(&self, listener: impl Fn(&App, &ErrorRecord) + 'static) {
        self.events.error.on(Rc::new(listener));
    }

    pub fn once_error(&self, listener: impl Fn(&App, &ErrorRecord) + 'static) {
        self.events.error.once(Rc::new(listener));
    }

    pub fn on_status(&self, listener: impl Fn(&App, &StatusEvent) + 'static) {
        self.events.status.on(Rc::new(listener));
    }

    pub fn once_status(&self, listener: impl Fn(&App, &StatusEvent) + 'static) {
        self.events.status.once(Rc::new(listener));
    }

    pub fn on_ready(&self, listener: impl Fn(&App, &ReadyEvent) + 'static) {
        self.events.ready.on(Rc::new(listener));
    }

    pub fn once_ready(&self, listener: impl Fn(&App, &ReadyEvent) + 'static) {
        self.events.ready.once(Rc::new(listener));
    }

    pub fn on_load(&self, listener: impl Fn(&App, &LoadEvent) + 'static) {
        self.events.load.on(Rc::new(listener));
    }

    pub fn once_load(&self, listener: impl Fn(&App, &LoadEvent) + 'static) {
        self.events.load.once(Rc::new(listener));
    }

    // ---------------------------------------------------------------------
    // State accessors
    // ---------------------------------------------------------------------

    /// The last successfully normalized URL, in canonical form.
    pub fn current_url(&self) -> String {
        self.state.borrow().current_url.clone()
    }

    /// The first query-parameter value for a key.
    pub fn param(&self, key: &str) -> Option<String> {
        self.state.borrow().params.get(key).map(str::to_string)
    }

    /// Every query-parameter value for a key, in occurrence order.
    pub fn param_all(&self, key: &str) -> Vec<String> {
        let state = self.state.borrow();
        state.params.get_all(key).into_iter().map(str::to_string).collect()
    }

    /// Stores a value in the per-navigation scratch repository. The
    /// repository is cleared at the start of every navigation.
    pub fn stash(&self, key: &str, value: impl Any + 'static) {
        self.state.borrow_mut().repository.insert(key.to_string(), Rc::new(value));
    }

    /// Reads a value stashed during the current navigation.
    pub fn fetch<T: Any>(&self, key: &str) -> Option<Rc<T>> {
        let value = self.state.borrow().repository.get(key).cloned()?;
        value.downcast::<T>().ok()
    }

    /// The model handed to [`redirect_with`](App::redirect_with) for the
    /// current navigation.
    pub fn model<T: Any>(&self) -> Option<Rc<T>> {
        let value = self.state.borrow().model.clone()?;
        value.downcast::<T>().ok()
    }

    /// Snapshot of the history stack, oldest first.
    pub fn history(&self) -> Vec<String> {
        self.state.borrow().history.snapshot()
    }

    /// Snapshot of the bounded error log, oldest first.
    pub fn errors(&self) -> Vec<ErrorRecord> {
        self.state.borrow().error_log.iter().cloned().collect()
    }

    /// Number of navigations processed so far.
    pub fn navigation_count(&self) -> u64 {
        self.state.borrow().navigation_count
    }
}

impl Default for App {
    fn default() -> App {
        App::new()
    }
}
