use super::*;

/// how the cpus have spent their time since boot.
///
/// this holds the first seven columns of a `cpu` line. newer kernels append steal, guest and
/// guest_nice columns, and may append more; these are accepted by the parser but not retained.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CpuTime {
    /// time spent in user mode.
    pub user: UserHz,
    /// time spent in user mode with low priority (nice).
    pub nice: UserHz,
    /// time spent in system mode.
    pub system: UserHz,
    /// time spent in the idle task.
    pub idle: UserHz,
    /// time waiting for i/o to complete.
    ///
    /// this value is not reliable, and may decrease in certain conditions.
    pub iowait: UserHz,
    /// time servicing interrupts.
    pub irq: UserHz,
    /// time servicing softirqs.
    pub softirq: UserHz,
}

/// an error computing cpu usage from two [`CpuTime`]s.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UsageError {
    /// the counters did not advance between the two readings.
    ZeroInterval,
}

// === impl CpuTime ===

impl CpuTime {
    /// time spent idle, including time waiting on i/o.
    pub fn idle(&self) -> UserHz {
        let Self { idle, iowait, .. } = *self;
        idle + iowait
    }

    /// time spent doing work.
    pub fn busy(&self) -> UserHz {
        let Self {
            user,
            nice,
            system,
            irq,
            softirq,
            idle: _,
            iowait: _,
        } = *self;

        user + nice + system + irq + softirq
    }

    pub fn total(&self) -> UserHz {
        self.idle() + self.busy()
    }

    /// returns the percentage of cpu time spent working between `prev` and `cur`.
    ///
    /// this is `((1000 * busy_fraction) + 1) / 10`, clamped to `[0, 100]`. the `+ 1` bias is part
    /// of the reported figure and must be kept for the numbers to line up with older output.
    pub fn usage(prev: &Self, cur: &Self) -> Result<f64, UsageError> {
        let total = cur.total().since(prev.total());
        let idle = cur.idle().since(prev.idle());

        if total == 0.0 {
            return Err(UsageError::ZeroInterval);
        }

        let percent = ((1000.0 * ((total - idle) / total)) + 1.0) / 10.0;
        Ok(percent.clamp(0.0, 100.0))
    }
}

impl TryFrom<Vec<UserHz>> for CpuTime {
    type Error = EntryParseError;
    fn try_from(times: Vec<UserHz>) -> Result<Self, Self::Error> {
        let [user, nice, system, idle, iowait, irq, softirq, ..] = times.as_slice() else {
            return Err(EntryParseError::CpuTime);
        };

        Ok(Self {
            user: *user,
            nice: *nice,
            system: *system,
            idle: *idle,
            iowait: *iowait,
            irq: *irq,
            softirq: *softirq,
        })
    }
}

impl From<[u64; 7]> for CpuTime {
    fn from(times: [u64; 7]) -> Self {
        let [user, nice, system, idle, iowait, irq, softirq] = times.map(UserHz::from);
        Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
        }
    }
}

// === impl UsageError ===

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInterval => f.write_str("cpu counters did not advance between samples"),
        }
    }
}

impl std::error::Error for UsageError {}

#[cfg(test)]
mod usage_tests {
    use super::*;

    #[test]
    fn half_busy() {
        let prev = CpuTime::from([100, 0, 100, 200, 0, 0, 0]);
        let cur = CpuTime::from([150, 0, 150, 300, 0, 0, 0]);
        // 100 busy out of 200: ((1000 * 0.5) + 1) / 10.
        assert_eq!(CpuTime::usage(&prev, &cur), Ok(50.1));
    }

    #[test]
    fn iowait_counts_as_idle() {
        let prev = CpuTime::from([0, 0, 0, 0, 0, 0, 0]);
        let cur = CpuTime::from([0, 0, 0, 50, 50, 0, 0]);
        assert_eq!(CpuTime::usage(&prev, &cur), Ok(0.1));
    }

    #[test]
    fn fully_busy_is_clamped() {
        let prev = CpuTime::from([0, 0, 0, 0, 0, 0, 0]);
        let cur = CpuTime::from([10, 10, 10, 0, 0, 10, 10]);
        assert_eq!(CpuTime::usage(&prev, &cur), Ok(100.0));
    }

    #[test]
    fn zero_interval() {
        let time = CpuTime::from([1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(
            CpuTime::usage(&time, &time),
            Err(UsageError::ZeroInterval)
        );
    }

    #[test]
    fn within_bounds() {
        let samples = [
            ([0, 0, 0, 0, 0, 0, 0], [1, 0, 0, 0, 0, 0, 0]),
            ([0, 0, 0, 0, 0, 0, 0], [0, 0, 0, 1, 0, 0, 0]),
            ([5, 1, 9, 40, 3, 0, 2], [17, 1, 12, 97, 4, 1, 2]),
            (
                [10132153, 290696, 3084719, 46828483, 16683, 0, 25195],
                [10132253, 290696, 3084739, 46828583, 16683, 0, 25197],
            ),
            // iowait went backwards.
            ([0, 0, 0, 10, 50, 0, 0], [20, 0, 0, 10, 40, 0, 0]),
        ];

        for (prev, cur) in samples {
            let (prev, cur) = (CpuTime::from(prev), CpuTime::from(cur));
            let usage = CpuTime::usage(&prev, &cur).unwrap();
            assert!((0.0..=100.0).contains(&usage), "{usage} out of range");
        }
    }
}
