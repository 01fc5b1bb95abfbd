//! Loop instrumentation with a report normalized per iteration of the outer
//! loop.
//!
//! Run with: `cargo run --example timebudget_report`.

use std::time::Duration;

/// Pseudo-random decision without pulling in a random number generator for a
/// demo: alternate on a counter.
fn sometimes(n: u32) -> bool {
    n % 5 < 3
}

fn possibly_slow() {
    std::thread::sleep(Duration::from_millis(30));
}

fn should_be_fast() {
    std::thread::sleep(Duration::from_millis(3));
}

fn outer_loop(n: u32) {
    if sometimes(n) {
        timebudget::time("possibly_slow", possibly_slow);
    }
    timebudget::time("should_be_fast", should_be_fast);
    timebudget::time("should_be_fast", should_be_fast);
}

fn main() {
    timebudget::set_quiet(true);

    for n in 0..100 {
        timebudget::time("outer_loop", || outer_loop(n));
    }

    timebudget::report_with(&timebudget::ReportOptions::new().reference("outer_loop"))
        .expect("outer_loop was recorded above");
}
