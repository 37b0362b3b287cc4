//! Module implementing a concurrently readable gauge value.
//!
//! See [`Gauge`] for details.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Single increasing, decreasing or constant `f64` value, shared by all of its
/// clones.
///
/// Collectors keep their mutable state in [`Gauge`]s so that concurrent scrapes
/// read each value with one atomic load and never see a torn update.
///
/// ```
/// # use prometheus_collector::metrics::gauge::Gauge;
/// let gauge = Gauge::new(42.0);
/// let handle = gauge.clone();
/// handle.inc_by(0.5);
/// assert_eq!(42.5, gauge.get());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Gauge {
    // f64 bits.
    value: Arc<AtomicU64>,
}

impl Gauge {
    /// Creates a [`Gauge`] starting at `v`.
    pub fn new(v: f64) -> Self {
        Self {
            value: Arc::new(AtomicU64::new(v.to_bits())),
        }
    }

    /// Sets the [`Gauge`] to `v`, returning the previous value.
    pub fn set(&self, v: f64) -> f64 {
        f64::from_bits(self.value.swap(v.to_bits(), Ordering::Relaxed))
    }

    /// Get the current value of the [`Gauge`].
    pub fn get(&self) -> f64 {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }

    /// Increase the [`Gauge`] by `v`, returning the previous value.
    pub fn inc_by(&self, v: f64) -> f64 {
        self.update(|old| old + v)
    }

    /// Decrease the [`Gauge`] by `v`, returning the previous value.
    pub fn dec_by(&self, v: f64) -> f64 {
        self.update(|old| old - v)
    }

    fn update(&self, f: impl Fn(f64) -> f64) -> f64 {
        let mut old_u64 = self.value.load(Ordering::Relaxed);
        loop {
            let old_f64 = f64::from_bits(old_u64);
            let new = f(old_f64).to_bits();
            match self
                .value
                .compare_exchange_weak(old_u64, new, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return old_f64,
                Err(x) => old_u64 = x,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inc_dec_and_get() {
        let gauge = Gauge::default();
        assert_eq!(0.0, gauge.inc_by(1.5));
        assert_eq!(1.5, gauge.get());

        assert_eq!(1.5, gauge.dec_by(1.0));
        assert_eq!(0.5, gauge.get());

        assert_eq!(0.5, gauge.set(10.0));
        assert_eq!(10.0, gauge.get());
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let gauge = Gauge::default();

        std::thread::scope(|s| {
            for _ in 0..4 {
                let gauge = gauge.clone();
                s.spawn(move || {
                    for _ in 0..1000 {
                        gauge.inc_by(1.0);
                    }
                });
            }
        });

        assert_eq!(4000.0, gauge.get());
    }
}
