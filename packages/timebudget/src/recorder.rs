//! The recorder that owns all mutable timing state.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::warn;

use crate::ERR_POISONED_LOCK;
use crate::block_guard::BlockGuard;
use crate::block_stats::{BlockStats, BlockSummary};
use crate::format::{duration_as_ms, ms_format};
use crate::pal::{Clock, ClockFacade};
use crate::report::{self, ReportError, ReportOptions, ReportRow};
use crate::sink::{Sink, StdoutSink};
use crate::timed_fn::{Instrumented, Target, TimedFn};

/// Accumulates elapsed-time statistics for named blocks of code.
///
/// A recorder tracks which named timers are currently open, accumulates
/// per-name totals and counts as timers close, optionally prints each
/// measurement as it completes, and renders a sorted summary report on
/// demand.
///
/// Most programs use the process-wide default recorder through the
/// module-level functions ([`block()`](crate::block),
/// [`report()`](crate::report), ...) and never construct one of these.
/// Construct a recorder explicitly when you need isolation, for example in
/// tests or inside a library:
///
/// ```
/// use timebudget::{MemorySink, Recorder};
///
/// let sink = MemorySink::new();
/// let recorder = Recorder::with_sink(sink.clone());
///
/// {
///     let _timer = recorder.time_block("load file");
///     // ... work being timed ...
/// }
///
/// recorder.report();
/// assert!(sink.lines().contains(&"timebudget report...".to_string()));
/// ```
///
/// # Misuse
///
/// Starting a name that is already open, or ending a name that is not,
/// emits a non-fatal warning and continues; see the crate-level
/// documentation. These paths never panic.
#[derive(Debug)]
pub struct Recorder {
    state: Mutex<RecorderState>,
    quiet_mode: AtomicBool,
    clock: ClockFacade,
    sink: Mutex<Box<dyn Sink>>,
}

#[derive(Debug, Default)]
struct RecorderState {
    /// Clock reading taken at `start` for every block whose timer is
    /// currently open. A name is present here only between `start` and the
    /// matching `end`.
    open_timers: HashMap<String, Duration>,

    /// Accumulated statistics for every block that has completed at least one
    /// timing. Grows monotonically between resets.
    stats: HashMap<String, BlockStats>,
}

impl Recorder {
    /// Creates a recorder that prints to standard output.
    #[expect(
        clippy::new_without_default,
        reason = "to avoid ambiguity with the notion of the 'default recorder', which this is not"
    )]
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(StdoutSink::new())
    }

    /// Creates a recorder that writes all of its output to the given sink.
    #[must_use]
    pub fn with_sink(sink: impl Sink + 'static) -> Self {
        Self::with_clock_and_sink(ClockFacade::real(), sink)
    }

    /// Creates a recorder with a specific clock; tests use this to control
    /// time.
    pub(crate) fn with_clock_and_sink(clock: ClockFacade, sink: impl Sink + 'static) -> Self {
        Self {
            state: Mutex::new(RecorderState::default()),
            quiet_mode: AtomicBool::new(false),
            clock,
            sink: Mutex::new(Box::new(sink)),
        }
    }

    /// Replaces the output sink.
    ///
    /// All subsequent recorder-originated text goes to the new sink.
    pub fn set_sink(&self, sink: impl Sink + 'static) {
        *self.sink.lock().expect(ERR_POISONED_LOCK) = Box::new(sink);
    }

    /// Sets the default quiet decision: when quiet, [`end()`][Self::end] does
    /// not print individual measurements.
    ///
    /// The per-call `quiet` argument of `end` overrides this default.
    pub fn set_quiet(&self, quiet: bool) {
        self.quiet_mode.store(quiet, Ordering::Relaxed);
    }

    /// Whether individual measurements are currently suppressed by default.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet_mode.load(Ordering::Relaxed)
    }

    /// Opens a timer for the named block.
    ///
    /// Starting a name that is already open is a usage error: it is reported
    /// as a non-fatal warning and the previous start reading is overwritten,
    /// because instrumentation must never crash the host program.
    pub fn start(&self, name: impl Into<String>) {
        let name = name.into();
        let now = self.clock.now();

        let mut state = self.state.lock().expect(ERR_POISONED_LOCK);
        if state.open_timers.insert(name.clone(), now).is_some() {
            // end() removes the entry, so a second start means the matching
            // end never ran (or two callers are timing the same name at once).
            warn!("timebudget is confused: start({name}) without end");
        }
    }

    /// Closes the timer for the named block and returns the elapsed time in
    /// milliseconds.
    ///
    /// Ending a name that has no open timer is reported as a non-fatal
    /// warning and returns [`f64::NAN`] without touching the aggregate
    /// statistics. This path must never panic: `end` typically runs in
    /// cleanup paths (guard drops) where a fresh panic would mask whatever
    /// error the timed code itself raised.
    ///
    /// The `quiet` argument overrides the recorder-wide default for this call
    /// only. When the effective decision is not quiet, a line in the form
    /// `<name> took <elapsed>` is written to the output sink.
    pub fn end(&self, name: &str, quiet: Option<bool>) -> f64 {
        let quiet = quiet.unwrap_or_else(|| self.is_quiet());
        let now = self.clock.now();

        let elapsed = {
            let mut state = self.state.lock().expect(ERR_POISONED_LOCK);

            let Some(started) = state.open_timers.remove(name) else {
                drop(state);
                warn!("timebudget is confused: end({name}) without start");
                return f64::NAN;
            };

            let elapsed = now.saturating_sub(started);
            let discovered = state.stats.len();
            state
                .stats
                .entry(name.to_string())
                .or_insert_with(|| BlockStats::new(discovered))
                .add(elapsed);
            elapsed
        };

        let elapsed_ms = duration_as_ms(elapsed);
        if !quiet {
            self.write_line(&format!("{name} took {}", ms_format(elapsed_ms)));
        }
        elapsed_ms
    }

    /// Clears all open timers and aggregate statistics.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect(ERR_POISONED_LOCK);
        state.open_timers.clear();
        state.stats.clear();
    }

    /// Whether the named block currently has an open timer.
    #[must_use]
    pub fn is_open(&self, name: &str) -> bool {
        self.state
            .lock()
            .expect(ERR_POISONED_LOCK)
            .open_timers
            .contains_key(name)
    }

    /// Returns a snapshot of the aggregate statistics, keyed by block name.
    ///
    /// This is the programmatic view of the same data
    /// [`report()`][Self::report] prints.
    #[must_use]
    pub fn stats(&self) -> BTreeMap<String, BlockSummary> {
        self.state
            .lock()
            .expect(ERR_POISONED_LOCK)
            .stats
            .iter()
            .map(|(name, stats)| (name.clone(), BlockSummary::new(stats.total, stats.count)))
            .collect()
    }

    /// Writes an absolute-time summary report to the output sink.
    ///
    /// One line per block, sorted by total elapsed time descending; see
    /// [`report_with()`][Self::report_with] for the relative mode and the
    /// reset-after-reporting option.
    pub fn report(&self) {
        self.report_with(&ReportOptions::new())
            .expect("absolute reports have no failure modes");
    }

    /// Writes a summary report to the output sink, honoring the given options.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::UnknownReference`] when a relative report is
    /// requested against a reference block with no recorded completions; the
    /// normalization would be meaningless, so this is not silently ignored.
    pub fn report_with(&self, options: &ReportOptions) -> Result<(), ReportError> {
        let lines = {
            let mut state = self.state.lock().expect(ERR_POISONED_LOCK);

            let lines = report::render(&sorted_rows(&state), options.reference.as_deref())?;

            // Only a successfully rendered report consumes the statistics.
            if options.reset {
                state.stats.clear();
            }
            lines
        };

        for line in &lines {
            self.write_line(line);
        }
        Ok(())
    }

    /// Times a named block until the returned guard is dropped.
    ///
    /// The guard closes the timer on every exit path, including unwinding.
    pub fn time_block(&self, name: impl Into<String>) -> BlockGuard<'_> {
        BlockGuard::new(self, name.into())
    }

    /// Runs `body` bracketed by `start`/`end` of the named block and returns
    /// its result.
    ///
    /// If `body` panics, the timer is still closed and the panic propagates
    /// unchanged.
    pub fn time<F, R>(&self, name: impl Into<String>, body: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = self.time_block(name);
        body()
    }

    /// Wraps a callable so that every invocation is timed under `name`.
    ///
    /// ```
    /// let recorder = timebudget::Recorder::new();
    /// recorder.set_quiet(true);
    ///
    /// let mut fetch = recorder.annotate("fetch", || 21 * 2);
    /// assert_eq!(fetch.call(), 42);
    /// ```
    pub fn annotate<F>(&self, name: impl Into<String>, body: F) -> TimedFn<'_, F> {
        TimedFn::new(self, name.into(), body)
    }

    /// Builds the call-site adapter for a [`Target`].
    ///
    /// [`Target::Function`] produces a reusable wrapped callable and
    /// [`Target::Block`] a live scope guard; both bracket execution with
    /// `start`/`end` on all exit paths.
    pub fn instrument<F>(&self, target: Target<F>) -> Instrumented<'_, F> {
        match target {
            Target::Function { name, body } => Instrumented::Function(self.annotate(name, body)),
            Target::Block(name) => Instrumented::Block(self.time_block(name)),
        }
    }

    fn write_line(&self, line: &str) {
        self.sink.lock().expect(ERR_POISONED_LOCK).write_line(line);
    }
}

impl fmt::Display for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().expect(ERR_POISONED_LOCK);
        let lines = report::render(&sorted_rows(&state), None)
            .expect("absolute reports have no failure modes");
        drop(state);

        for line in lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Builds the report rows: descending by total elapsed time, ties broken by
/// the order in which blocks first completed a timing.
fn sorted_rows(state: &RecorderState) -> Vec<ReportRow> {
    let mut rows: Vec<(usize, ReportRow)> = state
        .stats
        .iter()
        .map(|(name, stats)| {
            (
                stats.discovered,
                ReportRow {
                    name: name.clone(),
                    total: stats.total,
                    count: stats.count,
                },
            )
        })
        .collect();

    rows.sort_by(|(a_discovered, a), (b_discovered, b)| {
        b.total.cmp(&a.total).then(a_discovered.cmp(b_discovered))
    });

    rows.into_iter().map(|(_, row)| row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pal::FakeClock;
    use crate::sink::MemorySink;

    fn test_recorder() -> (Recorder, FakeClock, MemorySink) {
        let clock = FakeClock::new();
        let sink = MemorySink::new();
        let recorder = Recorder::with_clock_and_sink(ClockFacade::fake(clock.clone()), sink.clone());
        (recorder, clock, sink)
    }

    #[test]
    fn start_then_end_records_and_closes() {
        let (recorder, clock, _sink) = test_recorder();

        recorder.start("work");
        assert!(recorder.is_open("work"));

        clock.advance(Duration::from_millis(10));
        let elapsed = recorder.end("work", None);

        assert_eq!(elapsed, 10.0);
        assert!(!recorder.is_open("work"));

        let stats = recorder.stats();
        assert_eq!(stats["work"].count(), 1);
        assert_eq!(stats["work"].total(), Duration::from_millis(10));
    }

    #[test]
    fn end_without_start_returns_nan_without_recording() {
        let (recorder, _clock, sink) = test_recorder();

        let elapsed = recorder.end("never started", None);

        assert!(elapsed.is_nan());
        assert!(recorder.stats().is_empty());
        // The anomaly goes to the warning channel, not the output sink.
        assert!(sink.is_empty());
    }

    #[test]
    fn reentrant_start_overwrites_the_open_timer() {
        let (recorder, clock, _sink) = test_recorder();

        recorder.start("work");
        clock.advance(Duration::from_millis(100));

        // Usage error: warns and restarts the timer from here.
        recorder.start("work");
        clock.advance(Duration::from_millis(10));

        let elapsed = recorder.end("work", None);
        assert_eq!(elapsed, 10.0);

        let stats = recorder.stats();
        assert_eq!(stats["work"].count(), 1);
    }

    #[test]
    fn immediate_output_formats_the_elapsed_time() {
        let (recorder, clock, sink) = test_recorder();

        recorder.start("work");
        clock.advance(Duration::from_millis(5));
        recorder.end("work", None);

        assert_eq!(sink.lines(), vec!["work took 5.00ms".to_string()]);
    }

    #[test]
    fn quiet_mode_suppresses_immediate_output() {
        let (recorder, clock, sink) = test_recorder();
        recorder.set_quiet(true);

        recorder.start("work");
        clock.advance(Duration::from_millis(5));
        recorder.end("work", None);

        assert!(sink.is_empty());
    }

    #[test]
    fn per_call_quiet_overrides_the_default() {
        let (recorder, clock, sink) = test_recorder();

        // Quiet default, loud call.
        recorder.set_quiet(true);
        recorder.start("loud");
        clock.advance(Duration::from_millis(1));
        recorder.end("loud", Some(false));
        assert_eq!(sink.lines().len(), 1);

        // Loud default, quiet call.
        recorder.set_quiet(false);
        recorder.start("silent");
        clock.advance(Duration::from_millis(1));
        recorder.end("silent", Some(true));
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn statistics_accumulate_across_timings() {
        let (recorder, clock, _sink) = test_recorder();
        recorder.set_quiet(true);

        for _ in 0..3 {
            recorder.start("step");
            clock.advance(Duration::from_millis(20));
            recorder.end("step", None);
        }

        let stats = recorder.stats();
        assert_eq!(stats["step"].count(), 3);
        assert_eq!(stats["step"].total(), Duration::from_millis(60));
        assert_eq!(stats["step"].average_ms(), 20.0);
    }

    #[test]
    fn faster_blocks_average_below_slower_ones() {
        let (recorder, clock, _sink) = test_recorder();
        recorder.set_quiet(true);

        recorder.start("fast");
        clock.advance(Duration::from_millis(10));
        recorder.end("fast", None);

        recorder.start("slow");
        clock.advance(Duration::from_millis(100));
        recorder.end("slow", None);

        let stats = recorder.stats();
        assert!(stats["fast"].average_ms() < stats["slow"].average_ms());
    }

    #[test]
    fn reset_clears_everything_and_is_idempotent() {
        let (recorder, clock, sink) = test_recorder();
        recorder.set_quiet(true);

        recorder.start("open");
        recorder.start("done");
        clock.advance(Duration::from_millis(5));
        recorder.end("done", None);

        recorder.reset();
        assert!(!recorder.is_open("open"));
        assert!(recorder.stats().is_empty());

        recorder.reset();
        assert!(recorder.stats().is_empty());

        // A report on an empty recorder is just the header line.
        recorder.report();
        assert_eq!(sink.lines(), vec!["timebudget report...".to_string()]);
    }

    #[test]
    fn report_sorts_by_total_descending() {
        let (recorder, clock, sink) = test_recorder();
        recorder.set_quiet(true);

        recorder.start("small");
        clock.advance(Duration::from_millis(10));
        recorder.end("small", None);

        recorder.start("large");
        clock.advance(Duration::from_millis(200));
        recorder.end("large", None);

        recorder.report();

        let lines = sink.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("large"));
        assert!(lines[2].contains("small"));
    }

    #[test]
    fn report_breaks_total_ties_by_discovery_order() {
        let (recorder, clock, sink) = test_recorder();
        recorder.set_quiet(true);

        for name in ["second", "first", "third"] {
            recorder.start(name);
            clock.advance(Duration::from_millis(50));
            recorder.end(name, None);
        }

        recorder.report();

        let lines = sink.lines();
        assert!(lines[1].contains("second"));
        assert!(lines[2].contains("first"));
        assert!(lines[3].contains("third"));
    }

    #[test]
    fn relative_report_normalizes_against_reference() {
        let (recorder, clock, sink) = test_recorder();
        recorder.set_quiet(true);

        // Reference "cycle": 2 completions totaling 100ms.
        // Child "step": 2 completions totaling 40ms.
        for (cycle_ms, step_ms) in [(60, 15), (40, 25)] {
            recorder.start("cycle");
            recorder.start("step");
            clock.advance(Duration::from_millis(step_ms));
            recorder.end("step", None);
            clock.advance(Duration::from_millis(cycle_ms - step_ms));
            recorder.end("cycle", None);
        }

        recorder
            .report_with(&ReportOptions::new().reference("cycle"))
            .unwrap();

        let lines = sink.lines();
        assert_eq!(lines[0], "timebudget report per cycle cycle...");
        assert_eq!(
            lines[1],
            "                    cycle: 100.0%    50.00ms/cyc @     1.0 calls/cyc"
        );
        assert_eq!(
            lines[2],
            "                     step:  40.0%    20.00ms/cyc @     1.0 calls/cyc"
        );
    }

    #[test]
    fn relative_report_with_unknown_reference_fails_and_keeps_stats() {
        let (recorder, clock, sink) = test_recorder();
        recorder.set_quiet(true);

        recorder.start("step");
        clock.advance(Duration::from_millis(10));
        recorder.end("step", None);

        let result = recorder.report_with(&ReportOptions::new().reference("cycle").reset(true));

        assert!(result.is_err());
        // The failed report neither printed nor consumed anything.
        assert!(sink.is_empty());
        assert_eq!(recorder.stats()["step"].count(), 1);
    }

    #[test]
    fn report_reset_clears_stats_but_not_open_timers() {
        let (recorder, clock, _sink) = test_recorder();
        recorder.set_quiet(true);

        recorder.start("done");
        clock.advance(Duration::from_millis(5));
        recorder.end("done", None);
        recorder.start("still open");

        recorder
            .report_with(&ReportOptions::new().reset(true))
            .unwrap();

        assert!(recorder.stats().is_empty());
        assert!(recorder.is_open("still open"));
    }

    #[test]
    fn display_renders_the_absolute_report() {
        let (recorder, clock, _sink) = test_recorder();
        recorder.set_quiet(true);

        recorder.start("work");
        clock.advance(Duration::from_millis(10));
        recorder.end("work", None);

        let rendered = recorder.to_string();
        assert!(rendered.starts_with("timebudget report...\n"));
        assert!(rendered.contains("work"));
    }

    #[test]
    fn set_sink_redirects_subsequent_output() {
        let (recorder, clock, original) = test_recorder();

        let replacement = MemorySink::new();
        recorder.set_sink(replacement.clone());

        recorder.start("work");
        clock.advance(Duration::from_millis(1));
        recorder.end("work", None);

        assert!(original.is_empty());
        assert_eq!(replacement.lines().len(), 1);
    }

    // The recorder is shareable across threads (timing the same name from two
    // threads at once remains a documented usage error).
    static_assertions::assert_impl_all!(Recorder: Send, Sync);
}
