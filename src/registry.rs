//! Collector registry implementation.
//!
//! See [`Registry`] for details.

use std::borrow::Cow;

use crate::collector::{Collector, Result};
use crate::metrics::family::MetricFamily;

/// A collector registry.
///
/// The application constructs a [`Registry`] at startup, registers each
/// [`Collector`] with it via [`Registry::register_collector`] and, whenever a
/// scrape comes in, calls [`Registry::gather`] to obtain a fresh snapshot of
/// every registered collector. There is no process-wide default registry.
///
/// A prefix and a set of constant labels can be attached to a [`Registry`] or
/// to any of its sub-registries. They are applied to every family gathered
/// from collectors registered at that level.
///
/// ```
/// # use prometheus_collector::collector::from_fn;
/// # use prometheus_collector::metrics::family::MetricFamily;
/// # use prometheus_collector::registry::Registry;
/// # use std::borrow::Cow;
/// #
/// let mut registry = Registry::with_labels(
///     [(Cow::Borrowed("instance"), Cow::Borrowed("phone-1"))].into_iter(),
/// );
///
/// registry.register_collector(Box::new(from_fn("uptime", || {
///     Ok(vec![MetricFamily::gauge("uptime_seconds", "Uptime in seconds", 12.0)?])
/// })));
///
/// let families = registry.gather().unwrap();
/// assert_eq!("uptime_seconds", families[0].name());
/// assert_eq!(Some("phone-1"), families[0].samples()[0].label("instance"));
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    prefix: Option<Prefix>,
    labels: Vec<(Cow<'static, str>, Cow<'static, str>)>,
    collectors: Vec<Box<dyn Collector>>,
    sub_registries: Vec<Registry>,
}

impl Registry {
    /// Creates a new default [`Registry`] with the given prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(Prefix(prefix.into())),
            ..Default::default()
        }
    }

    /// Creates a new default [`Registry`] with the given labels.
    pub fn with_labels(
        labels: impl Iterator<Item = (Cow<'static, str>, Cow<'static, str>)>,
    ) -> Self {
        Self {
            labels: labels.collect(),
            ..Default::default()
        }
    }

    /// Creates a new default [`Registry`] with the given prefix and labels.
    pub fn with_prefix_and_labels(
        prefix: impl Into<String>,
        labels: impl Iterator<Item = (Cow<'static, str>, Cow<'static, str>)>,
    ) -> Self {
        Self {
            prefix: Some(Prefix(prefix.into())),
            labels: labels.collect(),
            ..Default::default()
        }
    }

    /// Register a [`Collector`].
    ///
    /// Collectors are gathered in registration order.
    pub fn register_collector(&mut self, collector: Box<dyn Collector>) {
        tracing::debug!(?collector, "registering collector");
        self.collectors.push(collector);
    }

    /// Create a sub-registry to register collectors with a common prefix.
    ///
    /// The prefix is appended to this registry's own prefix, separated by
    /// `_`. Constant labels are inherited.
    ///
    /// ```
    /// # use prometheus_collector::custom::CustomCollector;
    /// # use prometheus_collector::registry::Registry;
    /// #
    /// let mut registry = Registry::with_prefix("android");
    /// let sub_registry = registry.sub_registry_with_prefix("custom");
    /// sub_registry.register_collector(Box::new(CustomCollector::default()));
    ///
    /// let families = registry.gather().unwrap();
    /// assert_eq!("android_custom_my_gauge", families[0].name());
    /// ```
    pub fn sub_registry_with_prefix<P: AsRef<str>>(&mut self, prefix: P) -> &mut Self {
        let sub_registry = Registry {
            prefix: Some(Prefix(
                self.prefix.clone().map(|p| p.0 + "_").unwrap_or_default() + prefix.as_ref(),
            )),
            labels: self.labels.clone(),
            ..Default::default()
        };

        self.priv_sub_registry(sub_registry)
    }

    /// Like [`Registry::sub_registry_with_prefix`] but with a label instead.
    pub fn sub_registry_with_label(
        &mut self,
        label: (Cow<'static, str>, Cow<'static, str>),
    ) -> &mut Self {
        self.sub_registry_with_labels(std::iter::once(label))
    }

    /// Like [`Registry::sub_registry_with_prefix`] but with multiple labels instead.
    ///
    /// A label already set on this registry takes the new value in the
    /// sub-registry.
    pub fn sub_registry_with_labels(
        &mut self,
        labels: impl Iterator<Item = (Cow<'static, str>, Cow<'static, str>)>,
    ) -> &mut Self {
        let mut new_labels = self.labels.clone();
        for (name, value) in labels {
            match new_labels.iter_mut().find(|(existing, _)| *existing == name) {
                Some((_, existing_value)) => *existing_value = value,
                None => new_labels.push((name, value)),
            }
        }

        let sub_registry = Registry {
            prefix: self.prefix.clone(),
            labels: new_labels,
            ..Default::default()
        };

        self.priv_sub_registry(sub_registry)
    }

    fn priv_sub_registry(&mut self, sub_registry: Self) -> &mut Self {
        self.sub_registries.push(sub_registry);
        let last = self.sub_registries.len() - 1;
        &mut self.sub_registries[last]
    }

    /// Collects every registered collector, this registry's own first, then
    /// each sub-registry depth first.
    ///
    /// Either all families are returned or, as soon as one collector fails,
    /// its error. Families collected before the failure are discarded.
    pub fn gather(&self) -> Result<Vec<MetricFamily>> {
        let mut families = Vec::new();
        self.gather_into(&mut families)?;
        tracing::debug!(families = families.len(), "gathered metric families");
        Ok(families)
    }

    fn gather_into(&self, families: &mut Vec<MetricFamily>) -> Result<()> {
        let prefix = self.prefix.as_ref().map(Prefix::as_str);

        for collector in &self.collectors {
            let collected = collector.collect().map_err(|error| {
                tracing::warn!(?collector, %error, "collector failed");
                error
            })?;

            for family in collected {
                families.push(family.enrich(prefix, &self.labels)?);
            }
        }

        for sub_registry in &self.sub_registries {
            sub_registry.gather_into(families)?;
        }

        Ok(())
    }
}

#[derive(Clone, Debug)]
struct Prefix(String);

impl Prefix {
    fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
