//! Polling server loop.
//!
//! [`Server::poll`] is meant to be called from the firmware's main loop next
//! to its other periodic work (sensor sampling, display refresh, ...). Each
//! call services at most one connection and returns immediately when no
//! client is waiting.
//!
//! ```text
//!            accept() == None
//!          ┌──────────────────┐
//!          ▼                  │
//!      ┌──────┐  client   ┌──────────┐
//!      │ Idle │──────────▶│ Handling │── read ─ parse ─ dispatch ─ serialize ─ write ─ close
//!      └──────┘           └──────────┘                                          │
//!          ▲                                                                    │
//!          └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scratch buffers belong to the server value, and `poll` takes `&mut self`,
//! so a request can never be re-entered while one is in flight.

use super::{
    MAX_ROUTES, Parser, REQUEST_BUFFER_SIZE, RESPONSE_BUFFER_SIZE, Response, RouteTable,
    Serializer,
};
use crate::config::ServerConfig;
use crate::network::error::Error;
use crate::network::{Close, Connection, Listener, Read, Write};
use heapless::Vec;

/// Activity hook driven around every served request, typically an LED.
pub trait Indicator {
    fn set_active(&mut self, active: bool);
}

/// Server loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No connection in flight.
    Idle,
    /// One connection is being answered.
    Handling,
}

/// What a single [`Server::poll`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No client was ready.
    Idle,
    /// The network hardware is missing; nothing was serviced.
    NoHardware,
    /// The listener failed to hand out a connection.
    AcceptFailed,
    /// One request was answered with `status`.
    Served { status: u16 },
}

/// Counters kept across polls.
///
/// Failures on the connection are not surfaced from
/// [`Server::poll`]; they are counted here instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServerStats {
    pub served: u32,
    pub not_found: u32,
    /// Request bytes left unread because the request buffer was full.
    pub dropped_bytes: u32,
    pub read_errors: u32,
    pub write_errors: u32,
    pub close_errors: u32,
    /// Responses replaced by a 500 because they didn't fit the response
    /// scratch buffer.
    pub oversized_responses: u32,
    pub no_hardware: u32,
}

/// A non-blocking HTTP server over a [`Listener`].
///
/// `N` is the route capacity and `R` the size of the response scratch
/// buffer. The default `R` fits any [`Response`]; a smaller one trades RAM
/// for answering `500 Internal error` when a frame doesn't fit.
pub struct Server<
    'a,
    L: Listener,
    const N: usize = MAX_ROUTES,
    const R: usize = RESPONSE_BUFFER_SIZE,
> {
    listener: L,
    routes: RouteTable<'a, N>,
    parser: Parser,
    serializer: Serializer,
    indicator: Option<&'a mut dyn Indicator>,
    state: State,
    stats: ServerStats,
    request_buf: [u8; REQUEST_BUFFER_SIZE],
    response_buf: Vec<u8, R>,
}

impl<L: Listener, const N: usize, const R: usize> core::fmt::Debug for Server<'_, L, N, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Server")
            .field("routes", &self.routes.len())
            .field("state", &self.state)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, L: Listener, const N: usize, const R: usize> Server<'a, L, N, R> {
    /// Create a server with an empty route table and default configuration.
    pub fn new(listener: L) -> Self {
        Self::with_config(listener, ServerConfig::default())
    }

    pub fn with_config(listener: L, config: ServerConfig) -> Self {
        Self {
            listener,
            routes: RouteTable::new(),
            parser: Parser::with_config(config.parser),
            serializer: Serializer::new()
                .header_support(config.header_support)
                .line_ending(config.line_ending),
            indicator: None,
            state: State::Idle,
            stats: ServerStats::default(),
            request_buf: [0; REQUEST_BUFFER_SIZE],
            response_buf: Vec::new(),
        }
    }

    /// Route table, for registration before serving starts.
    pub fn routes_mut(&mut self) -> &mut RouteTable<'a, N> {
        &mut self.routes
    }

    pub fn routes(&self) -> &RouteTable<'a, N> {
        &self.routes
    }

    pub fn set_indicator(&mut self, indicator: &'a mut dyn Indicator) {
        self.indicator = Some(indicator);
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn stats(&self) -> &ServerStats {
        &self.stats
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Service at most one connection.
    ///
    /// Never waits: when no client is ready this returns
    /// [`PollOutcome::Idle`] straight away.
    pub fn poll(&mut self) -> PollOutcome {
        if !self.listener.hardware_present() {
            self.stats.no_hardware = self.stats.no_hardware.saturating_add(1);
            warn!("Ethernet hardware not found, skipping");
            return PollOutcome::NoHardware;
        }

        let mut conn = match self.listener.accept() {
            Ok(Some(conn)) => conn,
            Ok(None) => return PollOutcome::Idle,
            Err(_) => {
                warn!("accept failed");
                return PollOutcome::AcceptFailed;
            }
        };

        self.state = State::Handling;
        self.indicate(true);

        let status = self.handle(&mut conn);
        if conn.close().is_err() {
            self.stats.close_errors = self.stats.close_errors.saturating_add(1);
            warn!("close failed");
        }

        self.indicate(false);
        self.state = State::Idle;
        PollOutcome::Served { status }
    }

    fn handle<C: Connection>(&mut self, conn: &mut C) -> u16 {
        let len = self.read_request(conn);
        let status = match self.respond(len) {
            Ok(status) => status,
            Err(_) => {
                self.stats.oversized_responses = self.stats.oversized_responses.saturating_add(1);
                self.respond_internal_error()
            }
        };

        // The whole frame goes out before the next poll can accept anyone.
        if conn.write_all(&self.response_buf).is_err() || conn.flush().is_err() {
            self.stats.write_errors = self.stats.write_errors.saturating_add(1);
            warn!("write failed");
        }

        self.stats.served = self.stats.served.saturating_add(1);
        status
    }

    /// Parse the first `len` request bytes, dispatch and serialize.
    ///
    /// The request and response only live for this call, so a fallback
    /// response never shares the stack with them.
    #[inline(never)]
    fn respond(&mut self, len: usize) -> Result<u16, Error> {
        let req = self.parser.parse(&self.request_buf[..len]);
        debug!(
            "{} {} {}",
            req.method.as_str(),
            req.target.as_str(),
            req.protocol.as_str()
        );
        if req.truncated {
            warn!("request fields truncated");
        }

        if !self.routes.matches(&req.target) {
            self.stats.not_found = self.stats.not_found.saturating_add(1);
        }
        let resp = self.routes.dispatch(&req);

        match self.serializer.serialize(&resp, &mut self.response_buf) {
            Ok(_) => {
                info!("{} -> {}", req.target.as_str(), resp.code);
                Ok(resp.code)
            }
            Err(e) => {
                warn!("response for {} does not fit, sending 500", req.target.as_str());
                Err(e)
            }
        }
    }

    #[inline(never)]
    fn respond_internal_error(&mut self) -> u16 {
        let fallback = Response::internal_error();
        if self
            .serializer
            .serialize(&fallback, &mut self.response_buf)
            .is_err()
        {
            // Leaves the buffer empty: the client sees the connection close.
            error!("fallback response does not fit");
        }
        fallback.code
    }

    /// Read what is available right now, up to the request buffer capacity.
    fn read_request<C: Connection>(&mut self, conn: &mut C) -> usize {
        let available = conn.available();
        let wanted = available.min(REQUEST_BUFFER_SIZE);

        let mut len = 0;
        while len < wanted {
            match conn.read_byte() {
                Ok(byte) => {
                    self.request_buf[len] = byte;
                    len += 1;
                }
                Err(_) => {
                    self.stats.read_errors = self.stats.read_errors.saturating_add(1);
                    warn!("read failed after {} bytes", len);
                    break;
                }
            }
        }

        let dropped = available - wanted;
        if dropped > 0 {
            self.stats.dropped_bytes = self
                .stats
                .dropped_bytes
                .saturating_add(u32::try_from(dropped).unwrap_or(u32::MAX));
            warn!("request larger than buffer, dropped {} bytes", dropped);
        }

        len
    }

    fn indicate(&mut self, active: bool) {
        if let Some(indicator) = self.indicator.as_mut() {
            indicator.set_active(active);
        }
    }
}
