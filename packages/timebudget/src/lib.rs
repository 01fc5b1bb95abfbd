//! Stupidly-simple timing instrumentation for finding out where a program
//! spends its wall-clock time.
//!
//! Mark named regions of code and the library accumulates elapsed time per
//! name. Two main ways to mark a region:
//!
//! 1) Put the code to measure under a scope guard:
//!
//! ```
//! # timebudget::set_quiet(true);
//! use timebudget::block;
//!
//! {
//!     let _timer = block("load file");
//!     // ... read and parse the file ...
//! } // elapsed time is recorded (and printed) here
//! ```
//!
//! 2) Wrap a callable so that every invocation is measured:
//!
//! ```
//! # timebudget::set_quiet(true);
//! use timebudget::annotate;
//!
//! let mut step = annotate("simulation step", || {
//!     // ... possibly slow work ...
//! });
//!
//! step.call();
//! step.call();
//! ```
//!
//! By default every measurement prints immediately. For longer-running
//! programs, suppress the per-measurement output and ask for a summary
//! instead:
//!
//! ```
//! timebudget::set_quiet(true); // stop printing each measurement
//! timebudget::report(); // print a summary of everything measured
//! ```
//!
//! A summary can also be normalized against one reference block, showing
//! every other block as a percentage of it:
//!
//! ```
//! use timebudget::ReportOptions;
//!
//! # timebudget::set_quiet(true);
//! # { let _cycle = timebudget::block("main loop"); }
//! timebudget::report_with(&ReportOptions::new().reference("main loop"))?;
//! # Ok::<(), timebudget::ReportError>(())
//! ```
//!
//! # The default recorder
//!
//! The module-level functions above operate on one process-wide [`Recorder`]
//! that is lazily constructed on first use. Code that needs isolation (tests,
//! libraries embedded in larger programs) should create and own an explicit
//! [`Recorder`] instead; every module-level function has a counterpart method
//! on it.
//!
//! # Misuse never panics
//!
//! Instrumentation bugs must not crash or mask the behavior of the program
//! being measured. Starting a name that is already being timed, or ending a
//! name that was never started, emits a non-fatal `tracing` warning and
//! continues; [`Recorder::end()`] returns [`f64::NAN`] in the latter case so
//! callers can detect the anomaly programmatically.
//!
//! # Threading
//!
//! A [`Recorder`] is internally synchronized and can be shared across
//! threads, but two threads timing the *same* name simultaneously overwrite
//! each other's start reading (with a warning). Timing the same name
//! concurrently is not a supported mode; distinct names are fine.

mod block_guard;
mod block_stats;
mod constants;
mod format;
mod global;
mod pal;
mod recorder;
mod report;
mod sink;
mod timed_fn;

pub use block_guard::BlockGuard;
pub use block_stats::BlockSummary;
pub use format::ms_format;
pub use global::{
    ExitReport, annotate, block, default_recorder, report, report_at_exit, report_with, reset,
    set_quiet, time,
};
pub use recorder::Recorder;
pub use report::{ReportError, ReportOptions};
pub use sink::{MemorySink, Sink, StdoutSink};
pub use timed_fn::{Instrumented, Target, TimedFn};

pub(crate) use constants::ERR_POISONED_LOCK;
