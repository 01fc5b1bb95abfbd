//! Reusable wrapped callables and the dual-mode instrumentation entry point.

use std::fmt;

use crate::block_guard::BlockGuard;
use crate::recorder::Recorder;

/// A callable wrapped so that every invocation is timed under a fixed name.
///
/// Created by [`Recorder::annotate()`] or the module-level
/// [`annotate()`](crate::annotate) function. Each [`call()`][Self::call]
/// brackets the wrapped body with `start`/`end`; the timer is closed even if
/// the body panics, and the panic then propagates unchanged.
///
/// # Examples
///
/// ```
/// let recorder = timebudget::Recorder::new();
/// recorder.set_quiet(true);
///
/// let mut fibonacci = {
///     let mut pair = (0_u64, 1_u64);
///     recorder.annotate("fibonacci step", move || {
///         pair = (pair.1, pair.0 + pair.1);
///         pair.0
///     })
/// };
///
/// fibonacci.call();
/// fibonacci.call();
/// assert_eq!(fibonacci.call(), 2);
/// assert_eq!(recorder.stats()["fibonacci step"].count(), 3);
/// ```
#[must_use = "the wrapped callable does nothing until called"]
pub struct TimedFn<'a, F> {
    recorder: &'a Recorder,
    name: String,
    quiet: Option<bool>,
    body: F,
}

impl<'a, F> TimedFn<'a, F> {
    pub(crate) fn new(recorder: &'a Recorder, name: String, body: F) -> Self {
        Self {
            recorder,
            name,
            quiet: None,
            body,
        }
    }

    /// Overrides the recorder-wide quiet default for this callable's `end`
    /// calls.
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = Some(quiet);
        self
    }

    /// The name invocations are timed under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unwraps the original callable, discarding the instrumentation.
    pub fn into_inner(self) -> F {
        self.body
    }
}

impl<F, R> TimedFn<'_, F>
where
    F: FnMut() -> R,
{
    /// Invokes the wrapped callable, timing the invocation.
    ///
    /// If the body panics, the timer is still closed and the panic
    /// propagates unchanged.
    pub fn call(&mut self) -> R {
        let mut guard = self.recorder.time_block(self.name.as_str());
        if let Some(quiet) = self.quiet {
            guard = guard.quiet(quiet);
        }

        let _guard = guard;
        (self.body)()
    }
}

impl<F> fmt::Debug for TimedFn<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedFn")
            .field("name", &self.name)
            .field("quiet", &self.quiet)
            .finish_non_exhaustive()
    }
}

/// A call site to instrument: either a named function body or a bare block
/// name.
///
/// This is the statically typed rendition of "hand either a function or a
/// name to one entry point": the two accepted shapes are spelled out as
/// variants, and anything else simply does not construct. Consumed by
/// [`Recorder::instrument()`].
///
/// # Examples
///
/// ```
/// use timebudget::{Instrumented, Target};
///
/// let recorder = timebudget::Recorder::new();
/// recorder.set_quiet(true);
///
/// match recorder.instrument(Target::function("answer", || 42)) {
///     Instrumented::Function(mut wrapped) => assert_eq!(wrapped.call(), 42),
///     Instrumented::Block(_) => unreachable!(),
/// }
/// ```
#[expect(
    clippy::exhaustive_enums,
    reason = "the two call-site shapes are the whole point of this type"
)]
pub enum Target<F> {
    /// Wrap a function body, timing each invocation under `name`.
    Function {
        /// The name invocations are timed under.
        name: String,
        /// The function body to wrap.
        body: F,
    },

    /// Time a named block via a scope guard.
    Block(String),
}

impl<F> Target<F> {
    /// Shorthand for the [`Function`][Self::Function] variant.
    pub fn function(name: impl Into<String>, body: F) -> Self {
        Self::Function {
            name: name.into(),
            body,
        }
    }
}

impl Target<fn()> {
    /// Shorthand for the [`Block`][Self::Block] variant.
    #[must_use]
    pub fn block(name: impl Into<String>) -> Self {
        Self::Block(name.into())
    }
}

impl<F> fmt::Debug for Target<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function { name, .. } => f
                .debug_struct("Function")
                .field("name", name)
                .finish_non_exhaustive(),
            Self::Block(name) => f.debug_tuple("Block").field(name).finish(),
        }
    }
}

/// The call-site adapter produced by [`Recorder::instrument()`] for a
/// [`Target`].
#[expect(
    clippy::exhaustive_enums,
    reason = "mirrors the two Target shapes; callers match on it"
)]
#[must_use = "the adapter does nothing unless called or held in scope"]
pub enum Instrumented<'a, F> {
    /// A reusable wrapped callable, from [`Target::Function`].
    Function(TimedFn<'a, F>),

    /// A live scope guard, from [`Target::Block`].
    Block(BlockGuard<'a>),
}

impl<F> fmt::Debug for Instrumented<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(timed) => f.debug_tuple("Function").field(timed).finish(),
            Self::Block(guard) => f.debug_tuple("Block").field(guard).finish(),
        }
    }
}
