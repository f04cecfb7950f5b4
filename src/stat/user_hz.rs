use std::{ops::Add, str::FromStr};

/// a count of clock ticks, as reported by `/proc/stat`.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct UserHz(u64);

// === impl UserHz ===

impl UserHz {
    /// returns the signed difference `self - earlier`, as a float.
    ///
    /// counters such as iowait may decrease between two readings, so this does not assume that
    /// `self >= earlier`.
    pub fn since(self, earlier: Self) -> f64 {
        let (Self(now), Self(then)) = (self, earlier);
        now as f64 - then as f64
    }
}

impl From<u64> for UserHz {
    fn from(hz: u64) -> Self {
        Self(hz)
    }
}

impl FromStr for UserHz {
    type Err = <u64 as FromStr>::Err;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Add for UserHz {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        let (Self(lhs), Self(rhs)) = (self, rhs);
        Self(lhs.saturating_add(rhs))
    }
}
