//! Output sinks for recorder-originated text.

use std::fmt::Debug;
use std::io::Write;
use std::sync::{Arc, Mutex};

use crate::ERR_POISONED_LOCK;

/// A writable text destination for everything a [`Recorder`](crate::Recorder)
/// prints.
///
/// The default destination is standard output. Substituting a [`MemorySink`]
/// lets tests capture and inspect the exact lines written.
pub trait Sink: Debug + Send {
    /// Writes a single line of text, terminated by a newline.
    ///
    /// Writes are synchronous: once this returns, the line has been handed to
    /// the destination (and flushed, where the destination buffers).
    fn write_line(&self, line: &str);
}

/// Sink that writes to standard output, flushing after every line.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    /// Creates a new stdout sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StdoutSink {
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    fn write_line(&self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        // If stdout itself is broken there is nowhere left to report that to.
        drop(writeln!(stdout, "{line}"));
        drop(stdout.flush());
    }
}

/// Sink that captures written lines in memory.
///
/// Clones share the same underlying buffer, so a test can keep one clone to
/// inspect while a recorder writes through another:
///
/// ```
/// use timebudget::{MemorySink, Recorder, Sink};
///
/// let sink = MemorySink::new();
/// let recorder = Recorder::with_sink(sink.clone());
///
/// recorder.start("work");
/// recorder.end("work", None);
///
/// assert_eq!(sink.lines().len(), 1);
/// assert!(sink.lines()[0].starts_with("work took "));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Creates a new, empty capture sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all lines written so far.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect(ERR_POISONED_LOCK).clone()
    }

    /// Whether nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.lock().expect(ERR_POISONED_LOCK).is_empty()
    }

    /// Discards everything captured so far.
    pub fn clear(&self) {
        self.lines.lock().expect(ERR_POISONED_LOCK).clear();
    }
}

impl Sink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .expect(ERR_POISONED_LOCK)
            .push(line.to_string());
    }
}
