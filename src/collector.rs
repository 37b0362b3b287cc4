//! Metric collector interface.
//!
//! See [`Collector`] for details.

use std::sync::Arc;

use crate::error::CollectionError;
use crate::metrics::family::MetricFamily;

/// Result of a single collection.
pub type Result<T, E = CollectionError> = std::result::Result<T, E>;

/// The [`Collector`] abstraction allows users to provide metrics on each
/// scrape by sampling whatever state they own at that moment.
///
/// An example use-case is an exporter that retrieves a set of device metrics
/// ad-hoc on each scrape.
///
/// Register a [`Collector`] with a [`Registry`](crate::registry::Registry) via
/// [`Registry::register_collector`](crate::registry::Registry::register_collector).
///
/// ```
/// # use prometheus_collector::collector::{Collector, Result};
/// # use prometheus_collector::metrics::family::MetricFamily;
/// #
/// #[derive(Debug)]
/// struct MyCollector {}
///
/// impl Collector for MyCollector {
///     fn collect(&self) -> Result<Vec<MetricFamily>> {
///         Ok(vec![MetricFamily::gauge("my_gauge", "some help", 42.0)?])
///     }
/// }
///
/// let families = MyCollector {}.collect().unwrap();
/// assert_eq!("my_gauge", families[0].name());
/// ```
pub trait Collector: std::fmt::Debug + Send + Sync + 'static {
    /// Once the [`Collector`] is registered, this method is called on each
    /// scrape, potentially from several threads at once.
    ///
    /// Implementations either return every family or an error, never a
    /// partial list.
    fn collect(&self) -> Result<Vec<MetricFamily>>;
}

impl<C: Collector + ?Sized> Collector for Box<C> {
    fn collect(&self) -> Result<Vec<MetricFamily>> {
        (**self).collect()
    }
}

impl<C: Collector + ?Sized> Collector for Arc<C> {
    fn collect(&self) -> Result<Vec<MetricFamily>> {
        (**self).collect()
    }
}

/// A [`Collector`] backed by a plain function.
///
/// Created through [`from_fn`].
pub struct FnCollector<F> {
    name: &'static str,
    f: F,
}

impl<F> std::fmt::Debug for FnCollector<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCollector")
            .field("name", &self.name)
            .finish()
    }
}

impl<F> Collector for FnCollector<F>
where
    F: Fn() -> Result<Vec<MetricFamily>> + Send + Sync + 'static,
{
    fn collect(&self) -> Result<Vec<MetricFamily>> {
        (self.f)()
    }
}

/// Turns a function into a [`Collector`]. `name` only shows up in debug
/// output and logs.
///
/// ```
/// # use prometheus_collector::collector::{from_fn, Collector};
/// # use prometheus_collector::metrics::family::MetricFamily;
/// let collector = from_fn("answer", || Ok(vec![MetricFamily::gauge("answer", "help", 42.0)?]));
/// assert_eq!(42.0, collector.collect().unwrap()[0].samples()[0].value());
/// ```
pub fn from_fn<F>(name: &'static str, f: F) -> FnCollector<F>
where
    F: Fn() -> Result<Vec<MetricFamily>> + Send + Sync + 'static,
{
    FnCollector { name, f }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fn_collector_debug_shows_name() {
        let collector = from_fn("empty", || Ok(vec![]));
        assert_eq!(r#"FnCollector { name: "empty" }"#, format!("{collector:?}"));
        assert!(collector.collect().unwrap().is_empty());
    }

    #[test]
    fn shared_collector_is_a_collector() {
        let collector = Arc::new(from_fn("one", || {
            Ok(vec![MetricFamily::gauge("one", "help", 1.0)?])
        }));
        let boxed: Box<dyn Collector> = Box::new(collector.clone());

        assert_eq!(collector.collect().unwrap(), boxed.collect().unwrap());
    }

    #[test]
    fn fn_collector_propagates_error() {
        let collector = from_fn("broken", || {
            Err(CollectionError::sampling(
                "broken",
                std::io::Error::new(std::io::ErrorKind::Other, "unreachable"),
            ))
        });

        assert!(matches!(
            collector.collect(),
            Err(CollectionError::Sampling { .. })
        ));
    }
}
