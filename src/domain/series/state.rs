//! Chart sink — app-owned series state, SDK-provided update logic.

use super::render::{ChartRenderer, NullRenderer};
use super::wire::{self, ParseReport};
use super::Series;
use crate::error::RowError;

/// Owns the displayed series and keeps the renderer in step with it.
///
/// Bulk loads redraw everything; live rows only push one point.
#[derive(Debug, Default)]
pub struct ChartSink<R = NullRenderer> {
    series: Series,
    renderer: R,
}

impl<R: ChartRenderer> ChartSink<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            series: Series::new(),
            renderer,
        }
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Replace the whole series from a header-plus-rows CSV dump.
    ///
    /// Malformed rows are dropped; the rest still load.
    pub fn bulk_replace(&mut self, raw_text: &str) -> ParseReport {
        let (samples, report) = wire::parse_table(raw_text);
        self.series.replace(samples);
        self.renderer.redraw(&self.series);
        report
    }

    /// Append one live `label,value` row.
    ///
    /// A malformed row leaves the series and the chart untouched.
    pub fn append_one(&mut self, raw_row: &str) -> Result<(), RowError> {
        let sample = wire::parse_row(raw_row)?;
        self.renderer.push_point(&sample);
        self.series.push(sample);
        Ok(())
    }

    /// Empty the series and redraw.
    pub fn clear(&mut self) {
        self.series.clear();
        self.renderer.redraw(&self.series);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::{Notice, Sample};

    #[derive(Default)]
    struct RecordingRenderer {
        redraws: Vec<usize>,
        pushed: Vec<Sample>,
        notices: Vec<Notice>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn redraw(&mut self, series: &Series) {
            self.redraws.push(series.len());
        }

        fn push_point(&mut self, sample: &Sample) {
            self.pushed.push(sample.clone());
        }

        fn notice(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
    }

    const TABLE: &str = "date,temp\n2024-01-01,21.5\n2024-01-02,22.0\n";

    #[test]
    fn test_bulk_replace() {
        let mut sink = ChartSink::new(RecordingRenderer::default());
        let report = sink.bulk_replace(TABLE);

        assert_eq!(report.accepted, 2);
        assert_eq!(
            sink.series().samples(),
            &[Sample::new("2024-01-01", 21.5), Sample::new("2024-01-02", 22.0)]
        );
        assert_eq!(sink.renderer().redraws, vec![2]);
    }

    #[test]
    fn test_bulk_replace_discards_previous_series() {
        let mut sink = ChartSink::new(RecordingRenderer::default());
        sink.bulk_replace(TABLE);
        sink.append_one("2024-01-03,19.8").unwrap();
        sink.bulk_replace("Time,Temperature\n2024-02-01,5.0\n");

        assert_eq!(sink.series().len(), 1);
        assert_eq!(sink.series().samples()[0].label, "2024-02-01");
    }

    #[test]
    fn test_bulk_replace_header_only_is_empty() {
        let mut sink = ChartSink::new(RecordingRenderer::default());
        sink.bulk_replace(TABLE);
        let report = sink.bulk_replace("Time,Temperature\n");

        assert!(sink.series().is_empty());
        assert_eq!(report, ParseReport::default());
        assert_eq!(sink.renderer().redraws, vec![2, 0]);
    }

    #[test]
    fn test_append_after_bulk() {
        let mut sink = ChartSink::new(RecordingRenderer::default());
        sink.bulk_replace(TABLE);
        let before = sink.series().samples().to_vec();

        sink.append_one("2024-01-03,19.8").unwrap();

        let samples = sink.series().samples();
        assert_eq!(samples.len(), 3);
        assert_eq!(&samples[..2], before.as_slice());
        assert_eq!(samples[2], Sample::new("2024-01-03", 19.8));
    }

    #[test]
    fn test_append_is_incremental() {
        let mut sink = ChartSink::new(RecordingRenderer::default());
        sink.bulk_replace(TABLE);
        sink.append_one("2024-01-03,19.8").unwrap();
        sink.append_one("2024-01-04,18.1").unwrap();

        // only the initial load redraws everything
        assert_eq!(sink.renderer().redraws, vec![2]);
        assert_eq!(sink.renderer().pushed.len(), 2);
        assert_eq!(sink.renderer().pushed[1].label, "2024-01-04");
    }

    #[test]
    fn test_append_malformed_row_is_dropped() {
        let mut sink = ChartSink::new(RecordingRenderer::default());
        sink.bulk_replace(TABLE);

        let result = sink.append_one("2024-01-01");

        assert_eq!(result, Err(RowError::ColumnCount(1)));
        assert_eq!(sink.series().len(), 2);
        assert!(sink.renderer().pushed.is_empty());
    }

    #[test]
    fn test_append_to_empty_sink() {
        let mut sink = ChartSink::new(NullRenderer);
        sink.append_one("2024-01-01 00:00:05,20.0").unwrap();
        assert_eq!(sink.series().len(), 1);
    }

    #[test]
    fn test_clear_redraws_empty() {
        let mut sink = ChartSink::new(RecordingRenderer::default());
        sink.bulk_replace(TABLE);
        sink.clear();
        assert!(sink.series().is_empty());
        assert_eq!(sink.renderer().redraws, vec![2, 0]);
        assert!(sink.renderer().notices.is_empty());
    }
}
