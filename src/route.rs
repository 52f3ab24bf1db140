//! Route patterns and the matcher.

use std::cell::Cell;
use std::rc::Rc;

use crate::app::{App, Handler};
use crate::error::{BoxError, RouteError};
use crate::path;

/// Priority bonus for wildcard catch-alls. It deliberately sorts them ahead
/// of everything else; the matcher demotes them again by withholding the
/// "route found" signal from wildcard-only matches.
const WILDCARD_BONUS: i32 = 10;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
}

/// A registered pattern-to-handler binding with derived priority.
pub(crate) struct Route {
    pattern: String,
    segments: Vec<Segment>,
    priority: i32,
    param_positions: Vec<usize>,
    handler: Handler,
    partials: Vec<String>,
    fire_once: bool,
    match_count: Cell<u32>,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("segments", &self.segments)
            .field("priority", &self.priority)
            .field("param_positions", &self.param_positions)
            .field("partials", &self.partials)
            .field("fire_once", &self.fire_once)
            .field("match_count", &self.match_count)
            .finish_non_exhaustive()
    }
}

impl Route {
    pub(crate) fn new(
        pattern: &str,
        handler: Handler,
        partials: Vec<String>,
        fire_once: bool,
    ) -> Result<Route, RouteError> {
        let pattern = pattern.trim();
        let tokens = path::segments(pattern);

        let mut segments = Vec::with_capacity(tokens.len());
        let mut param_positions = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            if token == "*" {
                if i + 1 != tokens.len() {
                    return Err(RouteError::InvalidWildcard);
                }
                segments.push(Segment::Wildcard);
            } else if let Some(rest) = token.strip_prefix('{') {
                let name = rest.strip_suffix('}').unwrap_or(rest);
                if name.is_empty() {
                    return Err(RouteError::UnnamedParam);
                }
                param_positions.push(i);
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Literal(token.clone()));
            }
        }

        let has_wildcard = matches!(segments.last(), Some(Segment::Wildcard));
        let priority = pattern.matches('/').count() as i32
            + if has_wildcard { WILDCARD_BONUS } else { 0 }
            - param_positions.len() as i32;

        Ok(Route {
            pattern: pattern.to_string(),
            segments,
            priority,
            param_positions,
            handler,
            partials,
            fire_once,
            match_count: Cell::new(0),
        })
    }

    /// Compares a normalized path against this route.
    ///
    /// Non-wildcard routes require exactly equal segment counts. A wildcard
    /// segment short-circuits the remaining comparison as matched. A
    /// placeholder matches any segment — except at the root path, where
    /// placeholder skipping is disabled and strict comparison applies.
    pub(crate) fn matches(&self, target: &[String]) -> bool {
        let root = target.len() == 1 && target[0] == "/";

        if !self.has_wildcard() && self.segments.len() != target.len() {
            return false;
        }
        // A wildcard may match an empty tail, but every segment before it
        // still needs a counterpart in the path.
        if self.segments.len() > target.len() + 1 {
            return false;
        }

        for (i, got) in target.iter().enumerate() {
            let Some(segment) = self.segments.get(i) else {
                return false;
            };
            match segment {
                Segment::Wildcard => return true,
                Segment::Param(_) => {
                    if root {
                        return false;
                    }
                }
                Segment::Literal(literal) => {
                    if literal != got {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Extracts the placeholder values of a matched path, in placeholder
    /// order. The root marker maps to the empty string, as does a
    /// placeholder past the end of the path (possible under a wildcard
    /// match).
    pub(crate) fn extract(&self, target: &[String]) -> Vec<String> {
        self.param_positions
            .iter()
            .map(|&i| {
                target
                    .get(i)
                    .filter(|value| value.as_str() != "/")
                    .cloned()
                    .unwrap_or_default()
            })
            .collect()
    }

    pub(crate) fn call(&self, app: &App, params: &[String]) -> Result<(), BoxError> {
        (self.handler)(app, params)
    }

    pub(crate) fn has_wildcard(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::Wildcard))
    }

    pub(crate) fn pattern(&self) -> &str {
        &self.pattern
    }

    pub(crate) fn priority(&self) -> i32 {
        self.priority
    }

    pub(crate) fn partials(&self) -> &[String] {
        &self.partials
    }

    pub(crate) fn fire_once(&self) -> bool {
        self.fire_once
    }

    pub(crate) fn match_count(&self) -> u32 {
        self.match_count.get()
    }

    pub(crate) fn bump_match_count(&self) {
        self.match_count.set(self.match_count.get() + 1);
    }
}

/// Compares a normalized path against the route table, producing the ordered
/// set of matching routes plus the "found" flag, which stays false when
/// every structural match used a wildcard.
pub(crate) fn match_path(routes: &[Rc<Route>], target: &[String]) -> (Vec<Rc<Route>>, bool) {
    let mut matched = Vec::new();
    let mut found_non_wildcard = false;

    for route in routes {
        if route.matches(target) {
            if !route.has_wildcard() {
                found_non_wildcard = true;
            }
            matched.push(Rc::clone(route));
        }
    }

    (matched, found_non_wildcard)
}
