//! Module implementing a collected metric family.
//!
//! See [`MetricFamily`] for details.

use std::borrow::Cow;
use std::collections::BTreeMap;

use super::MetricType;
use crate::collector::Result;
use crate::error::CollectionError;

/// A single observation of a [`MetricFamily`]: a label set plus a value.
///
/// Labels are keyed by name, so two samples with the same labels compare equal
/// regardless of the order in which the labels were given.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    labels: BTreeMap<String, String>,
    value: f64,
}

impl Sample {
    /// Label names mapped to label values.
    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    /// Value of the label `name`, if the sample carries it.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    /// The sampled value.
    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Representation of the OpenMetrics *MetricFamily* data type.
///
/// A [`MetricFamily`] is a set of samples with the same name, help text and
/// type, differentiated by their label values. Every sample carries exactly the
/// label names declared on the family.
///
/// Families are created fresh on each collection through
/// [`MetricFamily::builder`] (or the [`MetricFamily::gauge`] and
/// [`MetricFamily::counter`] shortcuts) and cannot be modified afterwards.
///
/// ```
/// # use prometheus_collector::metrics::family::MetricFamily;
/// # use prometheus_collector::metrics::MetricType;
/// let family = MetricFamily::builder("my_other_gauge", "help", MetricType::Gauge)
///     .label_names(["labelname"])
///     .sample(["foo"], 4.0)
///     .sample(["bar"], 5.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(Some("bar"), family.samples()[1].label("labelname"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MetricFamily {
    name: String,
    help: String,
    metric_type: MetricType,
    label_names: Vec<String>,
    samples: Vec<Sample>,
}

impl MetricFamily {
    /// Starts building a family.
    pub fn builder(
        name: impl Into<String>,
        help: impl Into<String>,
        metric_type: MetricType,
    ) -> MetricFamilyBuilder {
        MetricFamilyBuilder {
            name: name.into(),
            help: help.into(),
            metric_type,
            label_names: Vec::new(),
            samples: Vec::new(),
        }
    }

    /// A gauge family with one unlabeled sample.
    pub fn gauge(name: impl Into<String>, help: impl Into<String>, value: f64) -> Result<Self> {
        Self::builder(name, help, MetricType::Gauge)
            .sample(std::iter::empty::<String>(), value)
            .build()
    }

    /// A counter family with one unlabeled sample.
    pub fn counter(name: impl Into<String>, help: impl Into<String>, value: f64) -> Result<Self> {
        Self::builder(name, help, MetricType::Counter)
            .sample(std::iter::empty::<String>(), value)
            .build()
    }

    /// Returns the name of the family.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the help text of the family.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Returns the metric type of the family.
    pub fn metric_type(&self) -> MetricType {
        self.metric_type
    }

    /// Returns the label names every sample of the family carries, in
    /// declaration order.
    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    /// Returns the samples in insertion order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Prepends `prefix` to the name and attaches `labels` to every sample.
    pub(crate) fn enrich(
        mut self,
        prefix: Option<&str>,
        labels: &[(Cow<'static, str>, Cow<'static, str>)],
    ) -> Result<Self> {
        if let Some(prefix) = prefix {
            self.name.insert(0, '_');
            self.name.insert_str(0, prefix);
            if !is_valid_metric_name(&self.name) {
                return Err(CollectionError::InvalidMetricName(self.name));
            }
        }

        for (label, value) in labels {
            if !is_valid_label_name(label) {
                return Err(CollectionError::InvalidLabelName(label.to_string()));
            }
            if self.label_names.iter().any(|l| l == label) {
                return Err(CollectionError::ConstLabelConflict {
                    family: self.name,
                    label: label.to_string(),
                });
            }
            self.label_names.push(label.to_string());
            for sample in &mut self.samples {
                sample.labels.insert(label.to_string(), value.to_string());
            }
        }

        Ok(self)
    }
}

/// Builder for [`MetricFamily`].
///
/// Nothing is validated until [`MetricFamilyBuilder::build`], which either
/// returns the complete family or the first violation found.
#[derive(Debug)]
pub struct MetricFamilyBuilder {
    name: String,
    help: String,
    metric_type: MetricType,
    label_names: Vec<String>,
    samples: Vec<(Vec<String>, f64)>,
}

impl MetricFamilyBuilder {
    /// Declares the label names of the family.
    pub fn label_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.label_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a sample. `label_values` are matched positionally against the
    /// declared label names.
    pub fn sample<I, S>(mut self, label_values: I, value: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.samples
            .push((label_values.into_iter().map(Into::into).collect(), value));
        self
    }

    /// Validates names, label arity and values, and builds the family.
    pub fn build(self) -> Result<MetricFamily> {
        let MetricFamilyBuilder {
            name,
            help,
            metric_type,
            label_names,
            samples,
        } = self;

        if !is_valid_metric_name(&name) {
            return Err(CollectionError::InvalidMetricName(name));
        }

        for (i, label) in label_names.iter().enumerate() {
            if !is_valid_label_name(label) {
                return Err(CollectionError::InvalidLabelName(label.clone()));
            }
            if label_names[..i].contains(label) {
                return Err(CollectionError::DuplicateLabelName {
                    family: name,
                    label: label.clone(),
                });
            }
        }

        let mut built = Vec::with_capacity(samples.len());
        for (values, value) in samples {
            if values.len() != label_names.len() {
                return Err(CollectionError::LabelMismatch {
                    family: name,
                    expected: label_names.len(),
                    actual: values.len(),
                });
            }
            if metric_type == MetricType::Counter && (value.is_nan() || value < 0.0) {
                return Err(CollectionError::InvalidValue {
                    family: name,
                    value,
                });
            }
            built.push(Sample {
                labels: label_names.iter().cloned().zip(values).collect(),
                value,
            });
        }

        Ok(MetricFamily {
            name,
            help,
            metric_type,
            label_names,
            samples: built,
        })
    }
}

fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn is_valid_label_name(name: &str) -> bool {
    if name.starts_with("__") {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
