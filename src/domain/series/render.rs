//! Rendering collaborator for the chart sink.

use super::{Sample, Series};

/// A user-visible status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Confirmation text returned by the device.
    Info(String),
    /// A failed device action.
    Error(String),
}

/// The chart widget (and the page around it) as seen from the SDK.
///
/// `redraw` swaps categories and data together; `push_point` extends both by
/// one and must not re-render the existing points.
pub trait ChartRenderer {
    fn redraw(&mut self, series: &Series);

    fn push_point(&mut self, sample: &Sample);

    fn notice(&mut self, notice: Notice) {
        let _ = notice;
    }

    /// Offer downloaded CSV to the user as a file.
    fn save_file(&mut self, file_name: &str, contents: &str) {
        let _ = (file_name, contents);
    }
}

/// Renders nothing. Useful for headless consumers that only read the series.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl ChartRenderer for NullRenderer {
    fn redraw(&mut self, _series: &Series) {}

    fn push_point(&mut self, _sample: &Sample) {}
}

impl<R: ChartRenderer + ?Sized> ChartRenderer for Box<R> {
    fn redraw(&mut self, series: &Series) {
        (**self).redraw(series)
    }

    fn push_point(&mut self, sample: &Sample) {
        (**self).push_point(sample)
    }

    fn notice(&mut self, notice: Notice) {
        (**self).notice(notice)
    }

    fn save_file(&mut self, file_name: &str, contents: &str) {
        (**self).save_file(file_name, contents)
    }
}
