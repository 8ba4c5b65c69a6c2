//! Static route table.
//!
//! Routes bind an exact request target to a [`Handler`]. Matching is a linear
//! scan in registration order, case-sensitive, without wildcards; the first
//! registered match wins. Unmatched targets go to the not-found handler if one
//! was set, otherwise to a built-in `404 Not found`.
//!
//! Registration happens once, before serving starts. Running out of room is a
//! configuration mistake, so [`routes!`](crate::routes) turns any
//! registration error into a panic at setup time.
//!
//! ```rust
//! use ethttp::network::application::http::{Request, Response, RouteTable};
//! use ethttp::routes;
//!
//! fn root(_req: &Request) -> Response {
//!     Response::ok().with_body(b"Usage: /metrics").unwrap_or_default()
//! }
//!
//! fn blink(_req: &Request) -> Response {
//!     Response::ok().with_body(b"Blinking!").unwrap_or_default()
//! }
//!
//! let mut table: RouteTable<'_> = RouteTable::new();
//! routes!(table, ("/", root), ("/blink", blink));
//! assert!(table.matches("/blink"));
//! ```

use super::{MAX_ROUTE_TARGET, MAX_ROUTES, Request, Response};
use heapless::{String, Vec};

/// Maps a request to a response.
pub trait Handler {
    fn handle(&mut self, req: &Request) -> Response;
}

impl<F> Handler for F
where
    F: FnMut(&Request) -> Response,
{
    fn handle(&mut self, req: &Request) -> Response {
        self(req)
    }
}

/// A plain function handler.
pub type HandlerFn = fn(&Request) -> Response;

enum Target<'a> {
    Fn(HandlerFn),
    Dyn(&'a mut dyn Handler),
}

impl Target<'_> {
    fn handle(&mut self, req: &Request) -> Response {
        match self {
            Target::Fn(f) => f(req),
            Target::Dyn(h) => h.handle(req),
        }
    }
}

impl core::fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Target::Fn(_) => f.write_str("Fn"),
            Target::Dyn(_) => f.write_str("Dyn"),
        }
    }
}

/// An exact path bound to a handler.
#[derive(Debug)]
pub struct Route<'a> {
    path: String<MAX_ROUTE_TARGET>,
    handler: Target<'a>,
}

impl Route<'_> {
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Errors raised while building a route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    /// Every route slot is taken.
    TableFull,
    /// The path is longer than [`MAX_ROUTE_TARGET`].
    PathTooLong,
    /// The path is empty.
    InvalidPath,
}

#[cfg(feature = "defmt")]
impl defmt::Format for RouteError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            RouteError::TableFull => defmt::write!(f, "TableFull"),
            RouteError::PathTooLong => defmt::write!(f, "PathTooLong"),
            RouteError::InvalidPath => defmt::write!(f, "InvalidPath"),
        }
    }
}

/// Capacity-bounded, ordered route table.
///
/// Handlers are either plain functions or borrowed trait objects, so a
/// handler can hold on to sensors owned elsewhere for the table's lifetime.
#[derive(Debug)]
pub struct RouteTable<'a, const N: usize = MAX_ROUTES> {
    routes: Vec<Route<'a>, N>,
    not_found: Option<Target<'a>>,
}

impl<const N: usize> Default for RouteTable<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> RouteTable<'a, N> {
    /// Create an empty table without a not-found handler.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            not_found: None,
        }
    }

    /// Register a handler for `path`.
    ///
    /// On error the table is left exactly as it was.
    pub fn register(&mut self, path: &str, handler: &'a mut dyn Handler) -> Result<(), RouteError> {
        self.insert(path, Target::Dyn(handler))
    }

    /// Register a plain function for `path`.
    pub fn register_fn(&mut self, path: &str, handler: HandlerFn) -> Result<(), RouteError> {
        self.insert(path, Target::Fn(handler))
    }

    /// Handler for targets that match no route.
    pub fn set_not_found(&mut self, handler: &'a mut dyn Handler) {
        self.not_found = Some(Target::Dyn(handler));
    }

    pub fn set_not_found_fn(&mut self, handler: HandlerFn) {
        self.not_found = Some(Target::Fn(handler));
    }

    fn insert(&mut self, path: &str, handler: Target<'a>) -> Result<(), RouteError> {
        if path.is_empty() {
            return Err(RouteError::InvalidPath);
        }
        if self.routes.is_full() {
            return Err(RouteError::TableFull);
        }
        let path = String::try_from(path).map_err(|_| RouteError::PathTooLong)?;
        self.routes
            .push(Route { path, handler })
            .map_err(|_| RouteError::TableFull)
    }

    /// Index of the first route whose path equals `target`.
    pub fn find(&self, target: &str) -> Option<usize> {
        self.routes.iter().position(|r| r.path.as_str() == target)
    }

    pub fn matches(&self, target: &str) -> bool {
        self.find(target).is_some()
    }

    /// Registered routes in registration order.
    pub fn routes(&self) -> &[Route<'a>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Resolve `req` to a response.
    ///
    /// An unmatched target is not an error: it always produces a well-formed
    /// not-found response.
    pub fn dispatch(&mut self, req: &Request) -> Response {
        match self.find(&req.target) {
            Some(index) => self.routes[index].handler.handle(req),
            None => match self.not_found.as_mut() {
                Some(handler) => handler.handle(req),
                None => Response::not_found(),
            },
        }
    }
}

/// Register several routes at once, panicking on the first failure.
///
/// `(path, handler)` registers a plain function; `(path, &mut handler)`
/// registers a stateful [`Handler`]. Running out of route slots is a setup
/// bug, so it stops the program before serving begins rather than silently
/// dropping a route.
#[macro_export]
macro_rules! routes {
    (@route $table:expr, ($path:expr, &mut $handler:expr)) => {
        $table.register($path, &mut $handler).expect("Failed to register route")
    };
    (@route $table:expr, ($path:expr, $handler:expr)) => {
        $table.register_fn($path, $handler).expect("Failed to register route")
    };
    ($table:expr, $($route:tt),+ $(,)?) => {
        $(
            $crate::routes!(@route $table, $route);
        )+
    };
}
