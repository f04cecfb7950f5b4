//! compact text meters, drawn from the change between two samples.
//!
//! the meters are pure: each takes the trend left behind by the previous tick and returns the
//! text for this tick along with the trend for the next one.

use std::iter::repeat_n;

/// tracks virtual memory use from one tick to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MemoryTrend {
    /// virtual memory used at the previous tick, in gigabytes.
    previous: f64,
}

/// tracks cpu usage from one tick to the next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CpuTrend {
    /// the running bar count. this may fall below zero, in which case no bars are drawn.
    bars: i64,
    /// cpu usage at the previous tick, as a percentage.
    previous: f64,
}

// === impl MemoryTrend ===

impl MemoryTrend {
    const LEAD: &str = "   |";
    const STEADY_RISE: &str = "o ";
    const STEADY_FALL: &str = "@ ";
    const RISE: char = '#';
    const RISE_CAP: &str = "* ";
    const FALL: char = ':';
    const FALL_CAP: &str = "@ ";

    /// changes smaller than this, in gigabytes, are drawn as a single flat glyph.
    const FLAT: f64 = 0.01;

    /// returns the glyph text for this tick, and the trend for the next one.
    ///
    /// the first tick has no predecessor, so its change is zero.
    pub fn render(self, tick: usize, used: f64) -> (String, Self) {
        let Self { previous } = self;

        let delta = if tick == 0 { 0.0 } else { used - previous };

        let mut line = String::from(Self::LEAD);
        line.push_str(&Self::glyph(delta));
        line.push_str(&format!("{delta:.2} ({used:.2})"));

        (line, Self { previous: used })
    }

    fn glyph(delta: f64) -> String {
        if (0.0..Self::FLAT).contains(&delta) {
            return Self::STEADY_RISE.to_owned();
        }
        if delta < 0.0 && delta > -Self::FLAT {
            return Self::STEADY_FALL.to_owned();
        }

        let run = Self::run(delta);
        let (mark, cap) = if delta < 0.0 {
            (Self::FALL, Self::FALL_CAP)
        } else {
            (Self::RISE, Self::RISE_CAP)
        };

        repeat_n(mark, run).chain(cap.chars()).collect()
    }

    /// the first two decimal digits of the change, as a count of glyphs.
    fn run(delta: f64) -> usize {
        let fraction = delta - delta.trunc();
        ((fraction + 0.005) * 100.0).trunc().abs() as usize
    }
}

// === impl CpuTrend ===

impl Default for CpuTrend {
    fn default() -> Self {
        Self {
            bars: Self::BASELINE,
            previous: 0.0,
        }
    }
}

impl CpuTrend {
    const LEAD: &str = "         ";
    const BAR: char = '|';

    /// the bar count drawn for the first tick.
    const BASELINE: i64 = 3;

    /// returns the bar graph row for this tick, and the trend for the next one.
    ///
    /// the bar count moves by whole percentage points only: a change within the same whole
    /// percent leaves it in place.
    pub fn render(self, tick: usize, usage: f64) -> (String, Self) {
        let Self { bars, previous } = self;

        let bars = if tick == 0 {
            Self::BASELINE
        } else {
            bars + (usage.floor() as i64 - previous.floor() as i64)
        };

        let drawn = usize::try_from(bars).unwrap_or(0);
        let mut line = String::from(Self::LEAD);
        line.extend(repeat_n(Self::BAR, drawn));
        line.push_str(&format!("{usage:.2}"));

        (
            line,
            Self {
                bars,
                previous: usage,
            },
        )
    }

    /// the running bar count.
    pub fn bars(&self) -> i64 {
        self.bars
    }
}
