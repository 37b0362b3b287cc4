//! Collection error type.

use thiserror::Error;

/// Boxed underlying cause of a sampling failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Reasons a collection can fail.
///
/// A failed collection never yields partial output: either every
/// [`MetricFamily`](crate::metrics::family::MetricFamily) of a scrape is
/// returned, or one of these errors.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The data source backing a collector could not be sampled.
    #[error("sampling {origin} failed")]
    Sampling {
        /// Name of the source that failed.
        origin: String,
        /// Underlying failure.
        #[source]
        cause: BoxError,
    },
    /// Metric name does not match `[a-zA-Z_:][a-zA-Z0-9_:]*`.
    #[error("invalid metric name {0:?}")]
    InvalidMetricName(String),
    /// Label name does not match `[a-zA-Z_][a-zA-Z0-9_]*` or uses the
    /// reserved `__` prefix.
    #[error("invalid label name {0:?}")]
    InvalidLabelName(String),
    /// The same label name was declared twice on one family.
    #[error("label {label:?} declared twice on {family}")]
    DuplicateLabelName {
        /// Family name.
        family: String,
        /// Repeated label name.
        label: String,
    },
    /// A sample carries a different number of label values than the family
    /// declares label names.
    #[error("{family} declares {expected} label(s), sample has {actual}")]
    LabelMismatch {
        /// Family name.
        family: String,
        /// Number of declared label names.
        expected: usize,
        /// Number of label values on the offending sample.
        actual: usize,
    },
    /// A registry constant label collides with a label of the family.
    #[error("constant label {label:?} already present on {family}")]
    ConstLabelConflict {
        /// Family name.
        family: String,
        /// Conflicting label name.
        label: String,
    },
    /// The value is not allowed for the family's metric type, e.g. a negative
    /// counter.
    #[error("invalid value {value} for {family}")]
    InvalidValue {
        /// Family name.
        family: String,
        /// Offending value.
        value: f64,
    },
}

impl CollectionError {
    /// Wraps a source failure into [`CollectionError::Sampling`].
    pub fn sampling<E>(origin: impl Into<String>, cause: E) -> Self
    where
        E: Into<BoxError>,
    {
        CollectionError::Sampling {
            origin: origin.into(),
            cause: cause.into(),
        }
    }
}
