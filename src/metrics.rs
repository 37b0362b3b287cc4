//! Metric data model and value stores.

pub mod family;
pub mod gauge;

/// OpenMetrics metric type of a [`MetricFamily`](family::MetricFamily).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum MetricType {
    Counter,
    Gauge,
    Info,
    Unknown,
    // Histogram and Summary samples carry more than a single value and are
    // not expressible as a family of plain samples.
}

impl MetricType {
    /// Returns the given metric type's str representation.
    pub fn as_str(&self) -> &str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
            MetricType::Info => "info",
            MetricType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
