//! A client-side router for single-page applications.
//!
//! `waypoint` maps URL paths to handler callbacks, tracks navigation history,
//! and coordinates partial-view re-rendering without full page reloads. It is
//! the routing core of an SPA runtime: the environment (a browser binding, or
//! a test harness) feeds it navigation events, and the router decides which
//! handlers run and in what order.
//!
//! A registered pattern can contain two types of dynamic segments:
//! ```ignore
//!  Syntax    Type
//!  {name}    named parameter, matches a single segment
//!  *         wildcard, matches the remaining path (tail position only)
//! ```
//!
//! Routes are matched in priority order: deeper patterns beat shallower ones,
//! literal segments beat parameters of equal depth, and wildcard catch-alls
//! run alongside everything else but never satisfy the "route found"
//! condition on their own — a navigation answered only by wildcards still
//! raises a 404 status.
//!
//! ```
//! use waypoint::App;
//!
//! let app = App::new();
//!
//! app.route("/user/{id}", |_app, params| {
//!     assert_eq!(params[0], "42");
//!     Ok(())
//! })?;
//!
//! app.on_status(|_app, status| {
//!     eprintln!("{} at {}", status.code.as_u16(), status.url);
//! });
//!
//! app.location("/user/42?tab=posts", false);
//! assert_eq!(app.current_url(), "/user/42");
//! assert_eq!(app.param("tab").as_deref(), Some("posts"));
//! # Ok::<(), waypoint::RouteError>(())
//! ```
//!
//! Handlers and partial renderers return `Result<(), Box<dyn Error>>`. The
//! router absorbs every failure: it is recorded in a bounded error log,
//! surfaced through the `error` lifecycle event, and aggregated into a
//! terminal `500` status — a misbehaving handler can never block subsequent
//! navigations.
//!
//! The router is single-threaded and event-driven, matching the environment
//! it is built for. Nothing in it is `Send`; callbacks are plain `Fn`
//! closures behind `Rc`.

#![deny(clippy::all)]
#![forbid(unsafe_code)]

pub mod app;
pub mod error;
pub mod events;
pub mod params;
pub mod path;
pub mod source;

mod history;
mod route;
mod state;

pub use app::{App, Handler, Renderer, RouteConfig};
pub use error::{BoxError, ErrorRecord, Phase, RouteError};
pub use events::{LoadEvent, LocationEvent, ReadyEvent, StatusCode, StatusEvent};
pub use params::{QueryParams, Value};
pub use source::{AddressBar, Applied, HistorySource, NavigationSource, PollingSource};
