//! Progress reporting for long-running document analysis.

/// Receives the completed fraction (`0.0..=1.0`) after each paragraph or page.
///
/// Any `Fn(f64)` closure is a sink:
///
/// ```
/// use std::cell::Cell;
/// use morphmark::progress::ProgressSink;
///
/// let last = Cell::new(0.0);
/// let sink = |fraction: f64| last.set(fraction);
/// sink.report(0.5);
/// assert_eq!(last.get(), 0.5);
/// ```
pub trait ProgressSink {
    fn report(&self, fraction: f64);
}

impl<F: Fn(f64)> ProgressSink for F {
    fn report(&self, fraction: f64) {
        self(fraction)
    }
}

/// A sink that discards progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _fraction: f64) {}
}

/// Report `done / total`, treating an empty job as complete.
pub(crate) fn report_step(sink: &dyn ProgressSink, done: usize, total: usize) {
    let fraction = if total == 0 {
        1.0
    } else {
        done as f64 / total as f64
    };
    sink.report(fraction.clamp(0.0, 1.0));
}
