//! The process-wide default recorder and its zero-ceremony surface.
//!
//! Most programs do not want to thread a [`Recorder`] through every call
//! site; these module-level functions operate on one shared instance that is
//! lazily constructed on first use and lives until the process exits.

use std::sync::LazyLock;

use tracing::warn;

use crate::block_guard::BlockGuard;
use crate::recorder::Recorder;
use crate::report::{ReportError, ReportOptions};
use crate::timed_fn::TimedFn;

static DEFAULT_RECORDER: LazyLock<Recorder> = LazyLock::new(Recorder::new);

/// Returns the process-wide default recorder, constructing it on first use.
///
/// All module-level convenience functions operate on this instance. Code that
/// needs isolation - tests, libraries embedded in a larger program - should
/// create and own an explicit [`Recorder`] instead of mutating this one.
#[must_use]
pub fn default_recorder() -> &'static Recorder {
    &DEFAULT_RECORDER
}

/// Times a named block on the default recorder until the returned guard
/// drops.
///
/// ```
/// # timebudget::set_quiet(true);
/// {
///     let _timer = timebudget::block("load file");
///     // ... work being timed ...
/// }
/// ```
pub fn block(name: impl Into<String>) -> BlockGuard<'static> {
    default_recorder().time_block(name)
}

/// Runs `body` on the default recorder, bracketed by `start`/`end`, and
/// returns its result.
pub fn time<F, R>(name: impl Into<String>, body: F) -> R
where
    F: FnOnce() -> R,
{
    default_recorder().time(name, body)
}

/// Wraps a callable so that every invocation is timed on the default
/// recorder.
///
/// ```
/// # timebudget::set_quiet(true);
/// let mut step = timebudget::annotate("simulation step", || {
///     // ... possibly slow work ...
/// });
/// step.call();
/// ```
pub fn annotate<F>(name: impl Into<String>, body: F) -> TimedFn<'static, F> {
    default_recorder().annotate(name, body)
}

/// Sets the default quiet decision on the default recorder: when quiet,
/// individual measurements are saved for the report instead of printed.
pub fn set_quiet(quiet: bool) {
    default_recorder().set_quiet(quiet);
}

/// Writes an absolute-time summary report from the default recorder to its
/// output sink.
pub fn report() {
    default_recorder().report();
}

/// Writes a summary report from the default recorder, honoring the given
/// options.
///
/// # Errors
///
/// Returns [`ReportError::UnknownReference`] when a relative report is
/// requested against a reference block with no recorded completions.
pub fn report_with(options: &ReportOptions) -> Result<(), ReportError> {
    default_recorder().report_with(options)
}

/// Clears the default recorder's open timers and aggregate statistics.
pub fn reset() {
    default_recorder().reset();
}

/// Arranges for a summary report when the process shuts down normally.
///
/// There is no reliable exit hook in the standard library, so registration
/// is expressed as a guard: hold the returned [`ExitReport`] for the
/// lifetime of `main` and the report is written when it drops.
///
/// ```no_run
/// fn main() {
///     let _report = timebudget::report_at_exit(None);
///     timebudget::set_quiet(true);
///
///     // ... the program ...
/// } // summary report prints here
/// ```
pub fn report_at_exit(reference: Option<&str>) -> ExitReport {
    let mut options = ReportOptions::new();
    if let Some(name) = reference {
        options = options.reference(name);
    }

    ExitReport { options }
}

/// Guard that writes a summary report from the default recorder when
/// dropped.
///
/// Created by [`report_at_exit()`].
#[derive(Debug)]
#[must_use = "the report is written when this guard is dropped"]
pub struct ExitReport {
    options: ReportOptions,
}

impl Drop for ExitReport {
    fn drop(&mut self) {
        // A missing reference block must not panic during drop; report the
        // problem on the warning channel and move on.
        if let Err(error) = default_recorder().report_with(&self.options) {
            warn!("timebudget exit report failed: {error}");
        }
    }
}
