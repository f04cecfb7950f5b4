use {
    crate::{
        source::{ProcStatFile, StatsSource},
        stat::{self, CpuTime, StatReadError, UsageError},
    },
    log::{trace, warn},
};

/// observes kernel statistics.
///
/// each tick, the sentinel is armed with a baseline snapshot, and later observes how much of the
/// time since then the cpus spent working.
pub struct Sentinel<S = ProcStatFile> {
    /// the underlying source of kernel statistics.
    source: S,
    inner: Inner,
}

enum Inner {
    Idle {
        /// the last usage reported.
        last: f64,
    },
    Armed {
        /// the snapshot taken when the sentinel was armed.
        baseline: CpuTime,
        /// the last usage reported.
        last: f64,
    },
}

// === impl Sentinel ===

impl<S: StatsSource + Default> Default for Sentinel<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Sentinel<S>
where
    S: StatsSource,
{
    /// creates a new [`Sentinel`].
    pub fn new(source: S) -> Self {
        Self {
            source,
            inner: Inner::Idle { last: 0.0 },
        }
    }

    /// takes the baseline snapshot for this tick, replacing any earlier one.
    pub fn arm(&mut self) -> Result<(), StatReadError> {
        let Self { source, inner } = self;

        let baseline = stat::read(&*source)?;
        let last = inner.last();
        *inner = Inner::Armed { baseline, last };

        Ok(())
    }

    /// returns the cpu usage, as a percentage, since the sentinel was armed.
    ///
    /// NB: if the counters did not move, or the sentinel was never armed, there is nothing to
    /// compare against and the last usage is reported again. that is zero on the first tick.
    pub fn observe(&mut self) -> Result<f64, StatReadError> {
        let Self { source, inner } = self;

        let current = stat::read(&*source)?;
        let usage = match inner {
            Inner::Idle { last } => *last,
            Inner::Armed { baseline, last } => match CpuTime::usage(baseline, &current) {
                Ok(usage) => usage,
                Err(UsageError::ZeroInterval) => {
                    warn!("cpu counters did not advance; reusing the last usage");
                    *last
                }
            },
        };

        trace!("observed cpu usage of {usage:.2}%");
        *inner = Inner::Idle { last: usage };

        Ok(usage)
    }
}

// === impl Inner ===

impl Inner {
    fn last(&self) -> f64 {
        match self {
            Self::Idle { last } | Self::Armed { last, .. } => *last,
        }
    }
}
