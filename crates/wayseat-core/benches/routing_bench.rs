//! Criterion benchmarks for device rule matching.
//!
//! Rule evaluation runs on every device hotplug and on every seat removal
//! (re-routing the orphaned devices), so compile and match costs stay worth
//! watching even though the rule counts are small in practice.
//!
//! Run with:
//! ```bash
//! cargo bench --package wayseat-core --bench routing_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wayseat_core::rules::{DeviceRule, RuleMap};

// ── Fixtures ──────────────────────────────────────────────────────────────────

const DEVICE_NAMES: &[&str] = &[
    "Logitech USB Mouse",
    "AT Translated Set 2 Keyboard",
    "Wacom Intuos Pro Pen",
    "Generic Gaming Pad",
    "SynPS/2 Synaptics TouchPad",
];

fn make_rule_map(seats: usize, rules_per_seat: usize) -> RuleMap {
    let mut map = RuleMap::new();
    for seat in 0..seats {
        for rule in 0..rules_per_seat {
            let pattern = format!("^Vendor{seat}-Device{rule}.*");
            map.add(
                &format!("seat{seat}"),
                DeviceRule::parse(&pattern).expect("valid pattern"),
            );
        }
    }
    map
}

// ── Benches ───────────────────────────────────────────────────────────────────

fn bench_rule_compile(c: &mut Criterion) {
    c.bench_function("rule_compile_anchored", |b| {
        b.iter(|| DeviceRule::parse(black_box("^Logitech.*")).expect("valid pattern"))
    });
}

fn bench_rule_match(c: &mut Criterion) {
    let rule = DeviceRule::parse("^Logitech.*").expect("valid pattern");
    c.bench_function("rule_match_device_names", |b| {
        b.iter(|| {
            for name in DEVICE_NAMES {
                black_box(rule.is_match(black_box(name)));
            }
        })
    });
}

fn bench_rule_map_scan(c: &mut Criterion) {
    // Worst case: the device matches no rule and every seat's list is walked.
    let map = make_rule_map(8, 4);
    c.bench_function("rule_map_scan_no_match", |b| {
        b.iter(|| {
            for seat in 0..8 {
                let seat_name = format!("seat{seat}");
                for rule in map.rules_for(&seat_name) {
                    black_box(rule.is_match(black_box("Unmatched Device")));
                }
            }
        })
    });
}

criterion_group!(benches, bench_rule_compile, bench_rule_match, bench_rule_map_scan);
criterion_main!(benches);
