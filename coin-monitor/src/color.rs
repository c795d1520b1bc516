//! Trend color of a rate.

use crate::config::DisplayColor;

/// Color of a rate given the previous cycle and the baseline.
///
/// Movement since the previous cycle wins; when the rate did not move the baseline decides,
/// and yellow means no change against either.
pub fn color_for(current: f64, previous: f64, baseline: f64) -> DisplayColor {
    if current > previous {
        DisplayColor::Green
    } else if current < previous {
        DisplayColor::Red
    } else if current > baseline {
        DisplayColor::Green
    } else if current < baseline {
        DisplayColor::Red
    } else {
        DisplayColor::Yellow
    }
}
