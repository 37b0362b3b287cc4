#![deny(dead_code)]
#![deny(missing_docs)]
#![deny(unused)]
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]

//! Pull-based metric collection in the spirit of the Prometheus client
//! libraries. A [`Collector`](collector::Collector) produces a fresh snapshot
//! of [`MetricFamily`](metrics::family::MetricFamily) values every time it is
//! asked to, and a [`Registry`](registry::Registry) owned by the application
//! gathers all registered collectors on demand.
//!
//! Exposition (text format, HTTP endpoint) is left to the caller.
//!
//! # Examples
//!
//! ```
//! use prometheus_collector::custom::CustomCollector;
//! use prometheus_collector::registry::Registry;
//!
//! // The application owns its registry. There is no global default.
//! let mut registry = Registry::with_prefix("app");
//!
//! // Keep a handle to the collector state, hand the collector to the registry.
//! let collector = CustomCollector::default();
//! let my_gauge = collector.my_gauge().clone();
//! registry.register_collector(Box::new(collector));
//!
//! my_gauge.set(43.0);
//!
//! // On each scrape, gather a fresh snapshot.
//! let families = registry.gather().unwrap();
//! assert_eq!("app_my_gauge", families[0].name());
//! assert_eq!(43.0, families[0].samples()[0].value());
//! assert_eq!("app_my_other_gauge", families[1].name());
//! assert_eq!(2, families[1].samples().len());
//! ```

pub mod collector;
pub mod custom;
pub mod error;
pub mod metrics;
pub mod registry;
