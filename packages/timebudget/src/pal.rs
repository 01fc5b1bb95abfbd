//! Platform abstraction layer for the time source.
//!
//! This module provides a clock abstraction that allows switching between the
//! real operating system monotonic clock and a fake implementation whose
//! readings are controlled by tests.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::Clock;
pub(crate) use facade::ClockFacade;
#[cfg(test)]
pub(crate) use fake::FakeClock;
