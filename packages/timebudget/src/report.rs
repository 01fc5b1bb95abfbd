//! Summary report rendering.
//!
//! The line formats here are a compatibility contract: fixed column widths,
//! right-justified names, and the exact header wording are part of the public
//! output surface and are asserted on by tests.

use std::time::Duration;

use thiserror::Error;

use crate::format::duration_as_ms;

/// Options controlling how [`Recorder::report_with()`](crate::Recorder::report_with)
/// renders the summary.
///
/// # Examples
///
/// ```
/// use timebudget::{Recorder, ReportOptions};
///
/// let recorder = Recorder::new();
/// recorder.set_quiet(true);
/// # { let _cycle = recorder.time_block("cycle"); }
///
/// // Show every block as a percentage of "cycle", then start fresh.
/// recorder.report_with(&ReportOptions::new().reference("cycle").reset(true))?;
/// # Ok::<(), timebudget::ReportError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReportOptions {
    pub(crate) reference: Option<String>,
    pub(crate) reset: bool,
}

impl ReportOptions {
    /// Creates options for a plain absolute-time report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes the report against the named reference block.
    ///
    /// Every block is then shown as a percentage of the reference's total time
    /// and as a per-reference-cycle average, rather than in absolute terms.
    #[must_use]
    pub fn reference(mut self, name: impl Into<String>) -> Self {
        self.reference = Some(name.into());
        self
    }

    /// Clears all aggregate statistics after the report is emitted.
    ///
    /// Open timers are unaffected; only [`Recorder::reset()`](crate::Recorder::reset)
    /// clears those.
    #[must_use]
    pub fn reset(mut self, reset: bool) -> Self {
        self.reset = reset;
        self
    }
}

/// Error rendering a summary report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    /// A relative report was requested against a reference block with no
    /// recorded completions, so the normalization is undefined.
    #[error("can't generate report for unrecognized block {name}")]
    UnknownReference {
        /// The reference block name that was requested.
        name: String,
    },
}

/// One row of a summary report.
///
/// Rows are handed to [`render()`] already sorted: descending by total elapsed
/// time, ties broken by discovery order.
#[derive(Clone, Debug)]
pub(crate) struct ReportRow {
    pub(crate) name: String,
    pub(crate) total: Duration,
    pub(crate) count: u64,
}

/// Renders the report lines (header first) for the given rows.
pub(crate) fn render(
    rows: &[ReportRow],
    reference: Option<&str>,
) -> Result<Vec<String>, ReportError> {
    match reference {
        None => Ok(render_absolute(rows)),
        Some(name) => render_relative(rows, name),
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "timing counts are far below the precision limit of f64"
)]
fn render_absolute(rows: &[ReportRow]) -> Vec<String> {
    let mut lines = vec!["timebudget report...".to_string()];

    for row in rows {
        let avg = duration_as_ms(row.total) / row.count as f64;
        lines.push(format!(
            "{:>25}:{avg:8.2} ms for {:6} calls",
            row.name, row.count
        ));
    }

    lines
}

#[expect(
    clippy::cast_precision_loss,
    reason = "timing counts are far below the precision limit of f64"
)]
fn render_relative(rows: &[ReportRow], reference: &str) -> Result<Vec<String>, ReportError> {
    let anchor = rows
        .iter()
        .find(|row| row.name == reference && row.count > 0)
        .ok_or_else(|| ReportError::UnknownReference {
            name: reference.to_string(),
        })?;

    let reference_total = duration_as_ms(anchor.total);
    let reference_count = anchor.count as f64;

    let mut lines = vec![format!("timebudget report per {reference} cycle...")];

    for row in rows {
        let total = duration_as_ms(row.total);
        let avg = total / reference_count;
        let percent = 100.0 * total / reference_total;
        let calls_per_cycle = row.count as f64 / reference_count;
        lines.push(format!(
            "{:>25}:{percent:6.1}% {avg:8.2}ms/cyc @{calls_per_cycle:8.1} calls/cyc",
            row.name
        ));
    }

    Ok(lines)
}
