//! Scope guard that times a named block.

use crate::recorder::Recorder;

/// Times a named block from creation until drop.
///
/// Created by [`Recorder::time_block()`] or the module-level
/// [`block()`](crate::block) function. The timer is closed in `Drop`, which
/// runs on every exit path - including unwinding - so a panic inside the
/// block still records the timing and then continues to propagate.
///
/// # Examples
///
/// ```
/// let recorder = timebudget::Recorder::new();
/// {
///     let _timer = recorder.time_block("load file");
///     // ... work being timed ...
/// } // elapsed time is recorded (and printed) here
/// ```
#[derive(Debug)]
#[must_use = "timing ends when the guard is dropped"]
pub struct BlockGuard<'a> {
    recorder: &'a Recorder,
    name: String,
    quiet: Option<bool>,
}

impl<'a> BlockGuard<'a> {
    pub(crate) fn new(recorder: &'a Recorder, name: String) -> Self {
        recorder.start(name.as_str());

        Self {
            recorder,
            name,
            quiet: None,
        }
    }

    /// Overrides the recorder-wide quiet default for this block's `end` call.
    ///
    /// ```
    /// let recorder = timebudget::Recorder::new();
    /// let _timer = recorder.time_block("bookkeeping").quiet(true);
    /// ```
    #[must_use]
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = Some(quiet);
        self
    }

    /// The name this guard is timing.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for BlockGuard<'_> {
    fn drop(&mut self) {
        // end() never panics, even when the timer is somehow already closed,
        // so dropping during unwind cannot mask the original panic.
        self.recorder.end(&self.name, self.quiet);
    }
}
