//! Reference collector exposing two gauge families.
//!
//! See [`CustomCollector`] for details.

use crate::collector::{Collector, Result};
use crate::metrics::family::MetricFamily;
use crate::metrics::gauge::Gauge;
use crate::metrics::MetricType;

/// Collector producing, on each scrape:
///
/// - `my_gauge`, a single unlabeled gauge, initially `42`.
/// - `my_other_gauge`, a gauge with one label `labelname`, initially
///   `{labelname="foo"} 4` and `{labelname="bar"} 5`.
///
/// Clones share their state, so the application can keep a clone (or a
/// [`Gauge`] handle) to update values after boxing the collector into a
/// [`Registry`](crate::registry::Registry).
///
/// ```
/// # use prometheus_collector::collector::Collector;
/// # use prometheus_collector::custom::CustomCollector;
/// let collector = CustomCollector::default();
/// collector.my_other_gauge("foo").unwrap().set(7.0);
///
/// let families = collector.collect().unwrap();
/// assert_eq!(7.0, families[1].samples()[0].value());
/// ```
#[derive(Debug, Clone)]
pub struct CustomCollector {
    my_gauge: Gauge,
    my_other_gauge: Vec<(&'static str, Gauge)>,
}

impl Default for CustomCollector {
    fn default() -> Self {
        Self {
            my_gauge: Gauge::new(42.0),
            my_other_gauge: vec![("foo", Gauge::new(4.0)), ("bar", Gauge::new(5.0))],
        }
    }
}

impl CustomCollector {
    /// Backing store of `my_gauge`.
    pub fn my_gauge(&self) -> &Gauge {
        &self.my_gauge
    }

    /// Backing store of the `my_other_gauge` sample labeled `label_value`.
    pub fn my_other_gauge(&self, label_value: &str) -> Option<&Gauge> {
        self.my_other_gauge
            .iter()
            .find(|(value, _)| *value == label_value)
            .map(|(_, gauge)| gauge)
    }
}

impl Collector for CustomCollector {
    fn collect(&self) -> Result<Vec<MetricFamily>> {
        tracing::debug!("collecting custom metrics");

        let my_gauge = MetricFamily::gauge("my_gauge", "help", self.my_gauge.get())?;

        let my_other_gauge = self
            .my_other_gauge
            .iter()
            .fold(
                MetricFamily::builder("my_other_gauge", "help", MetricType::Gauge)
                    .label_names(["labelname"]),
                |builder, (label_value, gauge)| builder.sample([*label_value], gauge.get()),
            )
            .build()?;

        Ok(vec![my_gauge, my_other_gauge])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn collects_two_families_in_order() {
        let families = CustomCollector::default().collect().unwrap();

        let names: Vec<_> = families.iter().map(|f| f.name()).collect();
        assert_eq!(vec!["my_gauge", "my_other_gauge"], names);
        assert!(families
            .iter()
            .all(|f| f.metric_type() == MetricType::Gauge && f.help() == "help"));
    }

    #[test]
    fn unlabeled_gauge_is_42() {
        let families = CustomCollector::default().collect().unwrap();

        let samples = families[0].samples();
        assert_eq!(1, samples.len());
        assert!(samples[0].labels().is_empty());
        assert_eq!(42.0, samples[0].value());
    }

    #[test]
    fn labeled_gauge_has_foo_and_bar() {
        let families = CustomCollector::default().collect().unwrap();

        let samples = families[1].samples();
        assert_eq!(2, samples.len());
        assert!(samples.iter().all(|s| s.labels().len() == 1));

        let values: BTreeMap<_, _> = samples
            .iter()
            .map(|s| (s.label("labelname").unwrap(), s.value()))
            .collect();
        assert_eq!(BTreeMap::from([("bar", 5.0), ("foo", 4.0)]), values);
    }

    #[test]
    fn updates_are_visible_through_clones() {
        let collector = CustomCollector::default();
        let handle = collector.clone();

        handle.my_gauge().set(1.0);
        handle.my_other_gauge("bar").unwrap().inc_by(1.0);
        assert!(handle.my_other_gauge("baz").is_none());

        let families = collector.collect().unwrap();
        assert_eq!(1.0, families[0].samples()[0].value());
        assert_eq!(6.0, families[1].samples()[1].value());
    }

    #[test]
    fn repeated_collections_are_identical() {
        let collector = CustomCollector::default();

        assert_eq!(collector.collect().unwrap(), collector.collect().unwrap());
    }
}
