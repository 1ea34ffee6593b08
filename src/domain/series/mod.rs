//! Series domain — samples, the displayed series, and the chart sink that owns it.

#[cfg(feature = "http")]
pub mod client;
pub mod render;
pub mod state;
pub mod wire;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub use render::{ChartRenderer, Notice, NullRenderer};
pub use state::ChartSink;
pub use wire::ParseReport;

/// One temperature reading.
///
/// `value` is always finite: rows that would produce NaN or infinity are
/// rejected by [`wire::parse_row`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Timestamp exactly as the device wrote it.
    pub label: String,
    /// Temperature in °C.
    pub value: f64,
}

impl Sample {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }

    /// Interpret the label as a device timestamp.
    ///
    /// Accepts `YYYY-MM-DD HH:MM:SS`, the ISO `T` separator, or a bare date
    /// (taken as midnight).
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let label = self.label.trim();
        NaiveDateTime::parse_from_str(label, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(label, "%Y-%m-%dT%H:%M:%S"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(label, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }
}

/// Ordered samples; insertion order is chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Category axis labels, in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.samples.iter().map(|s| s.label.as_str())
    }

    /// Data points, in order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }

    /// Coldest sample (first one on ties).
    pub fn min(&self) -> Option<&Sample> {
        self.samples
            .iter()
            .reduce(|best, s| if s.value < best.value { s } else { best })
    }

    /// Warmest sample (first one on ties).
    pub fn max(&self) -> Option<&Sample> {
        self.samples
            .iter()
            .reduce(|best, s| if s.value > best.value { s } else { best })
    }

    pub(crate) fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub(crate) fn replace(&mut self, samples: Vec<Sample>) {
        self.samples = samples;
    }

    pub(crate) fn clear(&mut self) {
        self.samples.clear();
    }
}

impl FromIterator<Sample> for Series {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}
