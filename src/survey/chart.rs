//! Histogram data and the sinks that display it.

use serde::Serialize;
use std::io::{self, Write};

/// Counts per category, ready to be drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bins: Vec<(String, usize)>,
}

impl Histogram {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        bins: Vec<(String, usize)>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: "Respondents".to_string(),
            bins,
        }
    }
}

/// Somewhere histograms are shown. Nothing is read back.
pub trait ChartSink {
    fn render(&mut self, chart: &Histogram) -> io::Result<()>;
}

/// Draws histograms as horizontal text bars.
///
/// ```rust
/// use cluster_feedback::survey::{ChartSink, Histogram, TextChart};
///
/// let mut out = Vec::new();
/// TextChart::new(&mut out, 4)
///     .render(&Histogram::new("Pets", "Pet", vec![("Dogs".into(), 2), ("Cats".into(), 1)]))
///     .unwrap();
///
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.contains("Dogs | #### 2"));
/// assert!(text.contains("Cats | ## 1"));
/// ```
#[derive(Debug)]
pub struct TextChart<W: Write> {
    out: W,
    width: usize,
}

impl<W: Write> TextChart<W> {
    /// `width` is the bar length of the largest bin.
    pub fn new(out: W, width: usize) -> Self {
        Self { out, width }
    }
}

impl<W: Write> ChartSink for TextChart<W> {
    fn render(&mut self, chart: &Histogram) -> io::Result<()> {
        writeln!(self.out, "{}", chart.title)?;
        writeln!(self.out, "  ({} / {})", chart.x_label, chart.y_label)?;

        if chart.bins.is_empty() {
            writeln!(self.out, "  (no respondents)")?;
            return Ok(());
        }

        let label_width = chart
            .bins
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        let max = chart.bins.iter().map(|(_, count)| *count).max().unwrap_or(0);

        for (label, count) in &chart.bins {
            let bar = if max == 0 {
                0
            } else {
                // Round up so every non-empty bin shows at least one mark.
                (count * self.width).div_ceil(max)
            };
            let padding = label_width - label.chars().count();
            writeln!(
                self.out,
                "  {}{} | {} {}",
                label,
                " ".repeat(padding),
                "#".repeat(bar),
                count
            )?;
        }
        writeln!(self.out)
    }
}
