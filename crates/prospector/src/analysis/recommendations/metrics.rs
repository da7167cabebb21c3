use serde::{Deserialize, Serialize};

/// How audit metric display strings are compared against their thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricComparison {
    /// Parse the display value into a number before comparing. Values that
    /// cannot be parsed never exceed a threshold.
    #[default]
    Numeric,
    /// Byte-wise comparison of the display string against the threshold
    /// literal, matching records produced by earlier releases of the tool.
    Lexicographic,
}

/// Unit a threshold is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetricUnit {
    Milliseconds,
    Unitless,
}

/// Upper bound for a web-vital metric.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MetricThreshold {
    pub(crate) limit: f64,
    pub(crate) unit: MetricUnit,
    pub(crate) literal: &'static str,
}

pub(crate) const LARGEST_CONTENTFUL_PAINT: MetricThreshold = MetricThreshold {
    limit: 2_500.0,
    unit: MetricUnit::Milliseconds,
    literal: "2.5s",
};

pub(crate) const TOTAL_BLOCKING_TIME: MetricThreshold = MetricThreshold {
    limit: 300.0,
    unit: MetricUnit::Milliseconds,
    literal: "300ms",
};

pub(crate) const CUMULATIVE_LAYOUT_SHIFT: MetricThreshold = MetricThreshold {
    limit: 0.1,
    unit: MetricUnit::Unitless,
    literal: "0.1",
};

impl MetricComparison {
    pub(crate) fn exceeds(&self, display: Option<&str>, threshold: &MetricThreshold) -> bool {
        let Some(display) = display else {
            return false;
        };

        match self {
            MetricComparison::Lexicographic => display > threshold.literal,
            MetricComparison::Numeric => parse_display_value(display, threshold.unit)
                .map(|value| value > threshold.limit)
                .unwrap_or(false),
        }
    }
}

/// Parse an audit display value such as `"2.7 s"`, `"1,230 ms"` or `"0.05"`.
/// Durations come back in milliseconds; a unit that does not match the
/// expected kind yields `None`.
pub(crate) fn parse_display_value(display: &str, expected: MetricUnit) -> Option<f64> {
    let cleaned: String = display
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let split = cleaned
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(cleaned.len());
    let (number, unit) = cleaned.split_at(split);
    let value: f64 = number.parse().ok()?;

    match (expected, unit.to_ascii_lowercase().as_str()) {
        (MetricUnit::Milliseconds, "ms") => Some(value),
        (MetricUnit::Milliseconds, "s") => Some(value * 1_000.0),
        (MetricUnit::Unitless, "") => Some(value),
        _ => None,
    }
}
