//! Prometheus text exposition for embedded sensors
//!
//! This module provides a small writer for the Prometheus text format and a
//! ready-made [`Handler`] that serves climate readings (temperature,
//! humidity, heat index) on a `/metrics` route. Readings are cached for a
//! configurable window so a scraper hitting the endpoint repeatedly doesn't
//! keep slow sensors busy.
//!
//! ```text
//! # HELP drybox_interior_humidity_percent Air humidity.
//! # TYPE drybox_interior_humidity_percent gauge
//! # UNIT drybox_interior_humidity_percent %
//! drybox_interior_humidity_percent 41.20
//! ```
//!
//! # Usage
//!
//! ```rust
//! use ethttp::metrics::{ClimateSensor, Clock, MetricsHandler};
//! use ethttp::network::application::http::{Handler, Parser};
//!
//! struct Dht22;
//! impl ClimateSensor for Dht22 {
//!     fn read(&mut self) -> Option<(f32, f32)> {
//!         Some((21.5, 40.0))
//!     }
//! }
//!
//! struct Uptime;
//! impl Clock for Uptime {
//!     fn now_ms(&self) -> u64 {
//!         0
//!     }
//! }
//!
//! let mut interior = Dht22;
//! let mut metrics = MetricsHandler::new("drybox", Uptime);
//! metrics.add_sensor("interior", &mut interior).unwrap();
//!
//! let resp = metrics.handle(&Parser::new().parse(b"GET /metrics HTTP/1.1\n\n"));
//! assert_eq!(resp.code, 200);
//! ```

use crate::network::application::http::{Handler, Request, Response};
use core::fmt::{self, Write};
use heapless::Vec;

/// Maximum number of sensors a [`MetricsHandler`] reports.
///
/// Three sensors' worth of gauges is what fits in one response body.
pub const MAX_SENSORS: usize = 3;

/// Default time a reading stays fresh.
pub const DEFAULT_REFRESH_MS: u64 = 10_000;

/// Writes Prometheus text-format gauges under a common namespace.
#[derive(Debug)]
pub struct Exposition<'w, W: Write> {
    out: &'w mut W,
    namespace: &'static str,
}

impl<'w, W: Write> Exposition<'w, W> {
    /// Create a writer prefixing every metric with `namespace`.
    pub fn new(out: &'w mut W, namespace: &'static str) -> Self {
        Self { out, namespace }
    }

    /// Write one gauge with its `HELP`, `TYPE` and `UNIT` lines.
    ///
    /// The metric is named `<namespace>_<subsystem>_<name>`, or
    /// `<namespace>_<name>` when `subsystem` is empty.
    pub fn gauge(
        &mut self,
        subsystem: &str,
        name: &str,
        help: &str,
        unit: &str,
        value: f32,
    ) -> fmt::Result {
        let metric = MetricName {
            namespace: self.namespace,
            subsystem,
            name,
        };
        writeln!(self.out, "# HELP {} {}", metric, help)?;
        writeln!(self.out, "# TYPE {} gauge", metric)?;
        writeln!(self.out, "# UNIT {} {}", metric, unit)?;
        writeln!(self.out, "{} {:.2}", metric, value)
    }
}

struct MetricName<'n> {
    namespace: &'n str,
    subsystem: &'n str,
    name: &'n str,
}

impl fmt::Display for MetricName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subsystem.is_empty() {
            write!(f, "{}_{}", self.namespace, self.name)
        } else {
            write!(f, "{}_{}_{}", self.namespace, self.subsystem, self.name)
        }
    }
}

/// One climate sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    /// Air temperature in °C.
    pub temperature_c: f32,
    /// Relative humidity in percent.
    pub humidity_percent: f32,
    /// Apparent temperature in °C, see [`heat_index_c`].
    pub heat_index_c: f32,
}

impl ClimateReading {
    /// Build a reading, deriving the heat index.
    pub fn new(temperature_c: f32, humidity_percent: f32) -> Self {
        Self {
            temperature_c,
            humidity_percent,
            heat_index_c: heat_index_c(temperature_c, humidity_percent),
        }
    }

    /// Write the three gauges for this reading under `subsystem`.
    pub fn expose<W: Write>(&self, out: &mut Exposition<'_, W>, subsystem: &str) -> fmt::Result {
        out.gauge(
            subsystem,
            "humidity_percent",
            "Air humidity.",
            "%",
            self.humidity_percent,
        )?;
        out.gauge(
            subsystem,
            "temperature_celsius",
            "Air temperature.",
            "\u{00B0}C",
            self.temperature_c,
        )?;
        out.gauge(
            subsystem,
            "heat_index_celsius",
            "Heat index.",
            "\u{00B0}C",
            self.heat_index_c,
        )
    }
}

/// Apparent temperature in °C (NWS heat index).
///
/// Uses the simple Steadman formula, switching to the Rothfusz regression
/// (with its low- and high-humidity adjustments) once the simple result
/// reaches 80 °F.
pub fn heat_index_c(temperature_c: f32, humidity_percent: f32) -> f32 {
    let t = temperature_c * 1.8 + 32.0;
    let rh = humidity_percent;

    let mut hi = 0.5 * (t + 61.0 + (t - 68.0) * 1.2 + rh * 0.094);
    if hi > 79.0 {
        hi = -42.379 + 2.049_015_2 * t + 10.143_331 * rh
            - 0.224_755_41 * t * rh
            - 0.006_837_83 * t * t
            - 0.054_817_17 * rh * rh
            + 0.001_228_74 * t * t * rh
            + 0.000_852_82 * t * rh * rh
            - 0.000_001_99 * t * t * rh * rh;

        if rh < 13.0 && (80.0..=112.0).contains(&t) {
            let spread = 17.0 - abs(t - 95.0);
            hi -= ((13.0 - rh) * 0.25) * sqrt(spread * 0.058_82);
        } else if rh > 85.0 && (80.0..=87.0).contains(&t) {
            hi += ((rh - 85.0) * 0.1) * ((87.0 - t) * 0.2);
        }
    }

    (hi - 32.0) / 1.8
}

fn abs(x: f32) -> f32 {
    if x < 0.0 { -x } else { x }
}

/// Newton's method; `core` has no float square root.
fn sqrt(x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    let mut guess = if x > 1.0 { x / 2.0 } else { 1.0 };
    for _ in 0..16 {
        guess = 0.5 * (guess + x / guess);
    }
    guess
}

/// A temperature/humidity sensor such as a DHT22.
pub trait ClimateSensor {
    /// `(temperature °C, relative humidity %)`, or `None` if the sensor
    /// didn't answer.
    fn read(&mut self) -> Option<(f32, f32)>;
}

/// Monotonic milliseconds since boot.
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary, fixed origin.
    fn now_ms(&self) -> u64;
}

/// Errors raised while configuring a [`MetricsHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsError {
    /// [`MAX_SENSORS`] sensors are already registered.
    TooManySensors,
}

#[cfg(feature = "defmt")]
impl defmt::Format for MetricsError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            MetricsError::TooManySensors => defmt::write!(f, "TooManySensors"),
        }
    }
}

struct Probe<'a> {
    label: &'static str,
    sensor: &'a mut dyn ClimateSensor,
}

struct Snapshot {
    taken_ms: u64,
    readings: Vec<ClimateReading, MAX_SENSORS>,
}

/// Serves labelled climate sensors as Prometheus gauges.
///
/// A fresh sample is taken on the first request and whenever the cached one
/// is older than the refresh window. If any sensor fails during a refresh the
/// request is answered with `500 Sensor error.` and the next request retries.
pub struct MetricsHandler<'a, C: Clock> {
    namespace: &'static str,
    clock: C,
    refresh_ms: u64,
    sensors: Vec<Probe<'a>, MAX_SENSORS>,
    cache: Option<Snapshot>,
}

impl<C: Clock> fmt::Debug for MetricsHandler<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsHandler")
            .field("namespace", &self.namespace)
            .field("refresh_ms", &self.refresh_ms)
            .field("sensors", &self.sensors.len())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl<'a, C: Clock> MetricsHandler<'a, C> {
    /// Create a handler with no sensors and the default refresh window.
    pub fn new(namespace: &'static str, clock: C) -> Self {
        Self {
            namespace,
            clock,
            refresh_ms: DEFAULT_REFRESH_MS,
            sensors: Vec::new(),
            cache: None,
        }
    }

    /// Change how long a reading is served from cache.
    pub fn with_refresh_ms(mut self, refresh_ms: u64) -> Self {
        self.refresh_ms = refresh_ms;
        self
    }

    /// Report `sensor` under `label` (e.g. `"interior"`).
    pub fn add_sensor(
        &mut self,
        label: &'static str,
        sensor: &'a mut dyn ClimateSensor,
    ) -> Result<(), MetricsError> {
        self.sensors
            .push(Probe { label, sensor })
            .map_err(|_| MetricsError::TooManySensors)
    }

    /// The readings currently cached, in registration order.
    pub fn cached(&self) -> Option<&[ClimateReading]> {
        self.cache.as_ref().map(|s| s.readings.as_slice())
    }

    fn is_fresh(&self, now: u64) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|s| now.saturating_sub(s.taken_ms) <= self.refresh_ms)
    }

    fn sample(&mut self, now: u64) -> Option<Snapshot> {
        let mut readings = Vec::new();
        for probe in self.sensors.iter_mut() {
            let (temperature, humidity) = probe.sensor.read()?;
            if temperature.is_nan() || humidity.is_nan() {
                return None;
            }
            // Cannot fail: one reading per registered sensor.
            let _ = readings.push(ClimateReading::new(temperature, humidity));
        }
        Some(Snapshot {
            taken_ms: now,
            readings,
        })
    }

    fn render(&self, resp: &mut Response) -> fmt::Result {
        let Some(snapshot) = self.cache.as_ref() else {
            return Ok(());
        };
        let mut body = resp.body_writer();
        let mut out = Exposition::new(&mut body, self.namespace);
        for (probe, reading) in self.sensors.iter().zip(snapshot.readings.iter()) {
            reading.expose(&mut out, probe.label)?;
        }
        Ok(())
    }
}

impl<C: Clock> Handler for MetricsHandler<'_, C> {
    fn handle(&mut self, _req: &Request) -> Response {
        let now = self.clock.now_ms();
        if !self.is_fresh(now) {
            match self.sample(now) {
                Some(snapshot) => self.cache = Some(snapshot),
                None => {
                    self.cache = None;
                    warn!("sensor read failed");
                    return Response::new(500, "Internal error")
                        .with_body(b"Sensor error.")
                        .unwrap_or_else(|_| Response::internal_error());
                }
            }
        }

        let mut resp = Response::ok();
        if self.render(&mut resp).is_err() {
            warn!("metrics exposition does not fit the response body");
            return Response::internal_error();
        }
        resp
    }
}
