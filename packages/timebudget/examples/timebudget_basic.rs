//! Basic `timebudget` usage: wrapped callables with immediate printing and a
//! summary report on exit.
//!
//! Run with: `cargo run --example timebudget_basic`.

use std::time::Duration;

fn possibly_slow() {
    println!("slow");
    std::thread::sleep(Duration::from_millis(600));
}

fn should_be_fast() {
    println!("quick");
    std::thread::sleep(Duration::from_millis(300));
}

fn main() {
    let _report = timebudget::report_at_exit(None);

    let mut possibly_slow = timebudget::annotate("possibly_slow", possibly_slow);
    let mut should_be_fast = timebudget::annotate("should_be_fast", should_be_fast);

    possibly_slow.call();
    possibly_slow.call();
    should_be_fast.call();
    should_be_fast.call();
    possibly_slow.call();
} // the summary report prints here
