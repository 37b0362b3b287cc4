use std::collections::BTreeSet;
use std::sync::Arc;

use prometheus_collector::collector::{from_fn, Collector};
use prometheus_collector::custom::CustomCollector;
use prometheus_collector::error::CollectionError;
use prometheus_collector::metrics::family::MetricFamily;
use prometheus_collector::registry::Registry;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn label_name_sets(family: &MetricFamily) -> BTreeSet<Vec<&str>> {
    family
        .samples()
        .iter()
        .map(|s| s.labels().keys().map(String::as_str).collect())
        .collect()
}

#[test]
fn every_family_has_uniform_label_names() {
    init_tracing();

    for family in CustomCollector::default().collect().unwrap() {
        assert_eq!(1, label_name_sets(&family).len(), "{}", family.name());
    }
}

#[test]
fn concurrent_collections_match_sequential_ones() {
    init_tracing();

    let collector = Arc::new(CustomCollector::default());
    let sequential = collector.collect().unwrap();

    let concurrent: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let collector = collector.clone();
                s.spawn(move || collector.collect().unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for families in concurrent {
        assert_eq!(sequential, families);
    }
}

#[test]
fn concurrent_gathers_never_see_torn_values() {
    init_tracing();

    let collector = CustomCollector::default();
    let my_gauge = collector.my_gauge().clone();
    let mut registry = Registry::default();
    registry.register_collector(Box::new(collector));

    std::thread::scope(|s| {
        s.spawn(|| {
            for i in 0..1000 {
                my_gauge.set(if i % 2 == 0 { 1.0 } else { -1.0 });
            }
        });

        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..100 {
                    let families = registry.gather().unwrap();
                    let value = families[0].samples()[0].value();
                    assert!([42.0, 1.0, -1.0].contains(&value), "torn value {value}");
                }
            });
        }
    });
}

#[test]
fn registry_shares_collector_with_application() {
    init_tracing();

    let collector = Arc::new(CustomCollector::default());
    let mut registry = Registry::with_prefix("android");
    registry.register_collector(Box::new(collector.clone()));

    collector.my_other_gauge("foo").unwrap().set(10.0);

    let families = registry.gather().unwrap();
    assert_eq!("android_my_other_gauge", families[1].name());
    assert_eq!(Some("foo"), families[1].samples()[0].label("labelname"));
    assert_eq!(10.0, families[1].samples()[0].value());
}

#[test]
fn broken_collector_yields_no_output() {
    init_tracing();

    let mut registry = Registry::default();
    registry.register_collector(Box::new(CustomCollector::default()));
    registry.register_collector(Box::new(from_fn("temperature", || {
        Ok(vec![MetricFamily::gauge(
            "android_system_temperature_celsius{where}` - ",
            "Temperature on the device",
            30.0,
        )?])
    })));

    match registry.gather() {
        Err(CollectionError::InvalidMetricName(name)) => {
            assert!(name.starts_with("android_system_temperature_celsius"))
        }
        other => panic!("unexpected gather result {other:?}"),
    }
}
