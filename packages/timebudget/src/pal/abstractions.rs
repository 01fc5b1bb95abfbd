//! Clock abstraction trait definitions.

use std::fmt::Debug;
use std::time::Duration;

/// Provides the monotonic clock readings used to time blocks.
///
/// This trait abstracts the underlying time source, allowing for both a real
/// implementation (reading the operating system monotonic clock) and a fake
/// implementation (for testing).
pub(crate) trait Clock: Debug + Send + Sync + 'static {
    /// Gets the current clock reading, expressed as the time elapsed since the
    /// clock's epoch.
    ///
    /// Readings are only meaningful relative to other readings from the same
    /// clock; the epoch itself is arbitrary.
    fn now(&self) -> Duration;
}
