use {
    crate::source::StatsSource,
    log::trace,
    std::{
        fmt::{self, Display},
        io::{self, BufRead, BufReader},
        str::FromStr,
    },
};

pub use self::{
    cpu_time::{CpuTime, UsageError},
    user_hz::UserHz,
};

mod cpu_time;
mod user_hz;


/// an entry in the `/proc/stat` kernel statistics table.
///
/// see `proc_stat(5)` for more information.
#[derive(Debug, Eq, PartialEq)]
pub enum Entry {
    /// the amount of time that the system ("cpu" line) spent in various states.
    AllCpu { time: CpuTime },
    /// the amount of time that a specific cpu ("cpuN" line) spent in various states.
    Cpu { id: CpuId, time: CpuTime },
    /// the number of pages the system paged in and the number that were paged out (from disk).
    Page,
    /// the number of swap pages that have been brought in and out.
    Swap,
    /// this line shows counts of interrupts serviced since boot time.
    Intr,
    DiskIo,
    /// the number of context switches that the system underwent.
    Ctxt,
    Btime,
    /// the number of forks since boot.
    Processes,
    /// the number of processes in runnable state.  (linux 2.5.45 onward.)
    ProcsRunning,
    /// the number of processes blocked waiting for i/o to complete.
    ProcsBlocked,
    /// this line shows the number of softirq for all cpus.
    SoftIrq,
}

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct CpuId(u16);

#[derive(Debug, Eq, PartialEq)]
pub enum EntryParseError {
    Empty,
    UnrecognizedEntry { kind: String },
    CpuIdParse(<u16 as FromStr>::Err),
    UserHzParse(<UserHz as FromStr>::Err),
    CpuTime,
}

#[derive(Debug)]
pub enum StatReadError {
    Io(io::Error),
    Entry(EntryParseError),
    /// the table had no aggregate `cpu` line.
    MissingAggregate,
}

enum Either<'a> {
    Cpu(&'a str),
    Entry(Entry),
}

/// reads the aggregate cpu times from the given source.
///
/// line kinds this parser does not know about are skipped, so newer kernels can add them.
pub fn read(stats: &impl StatsSource) -> Result<CpuTime, StatReadError> {
    let reader = stats.open().map_err(StatReadError::Io)?;

    let mut system = None;
    for line in BufReader::new(reader).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Entry>() {
            Ok(Entry::AllCpu { time }) => {
                system.get_or_insert(time);
            }
            Ok(_) => {}
            Err(EntryParseError::UnrecognizedEntry { kind }) => {
                trace!("skipping unrecognized entry {kind:?}");
            }
            Err(error) => return Err(error.into()),
        }
    }

    system.ok_or(StatReadError::MissingAggregate)
}

// === impl Entry ===

impl FromStr for Entry {
    type Err = EntryParseError;
    fn from_str(entry: &str) -> Result<Self, Self::Err> {
        let tokens = entry
            .split_ascii_whitespace()
            .collect::<Vec<_>>();
        let [kind, tokens @ ..] = tokens.as_slice() else {
            return Err(EntryParseError::Empty);
        };

        let id = match Self::parse_entry_kind(kind) {
            Either::Cpu(cpu) => Self::parse_cpu_id(cpu)?,
            Either::Entry(entry) => return Ok(entry),
        };

        let time = tokens
            .iter()
            .map(|t| t.parse::<UserHz>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(EntryParseError::UserHzParse)
            .and_then(CpuTime::try_from)?;

        Ok(if let Some(id) = id {
            Self::Cpu { id, time }
        } else {
            Self::AllCpu { time }
        })
    }
}

impl Entry {
    fn parse_entry_kind(kind: &str) -> Either<'_> {
        use Entry::*;

        match kind {
            "page" => Either::Entry(Page),
            "swap" => Either::Entry(Swap),
            "intr" => Either::Entry(Intr),
            "disk_io" => Either::Entry(DiskIo),
            "ctxt" => Either::Entry(Ctxt),
            "btime" => Either::Entry(Btime),
            "processes" => Either::Entry(Processes),
            "procs_running" => Either::Entry(ProcsRunning),
            "procs_blocked" => Either::Entry(ProcsBlocked),
            "softirq" => Either::Entry(SoftIrq),
            cpu => Either::Cpu(cpu),
        }
    }

    fn parse_cpu_id(token: &str) -> Result<Option<CpuId>, EntryParseError> {
        use EntryParseError::{CpuIdParse, UnrecognizedEntry};

        // strip the token of its "cpu" prefix.
        let suffix = token.strip_prefix("cpu").ok_or_else(|| UnrecognizedEntry {
            kind: token.to_owned(),
        })?;

        // if there is no suffix, this is the aggregate line.
        if suffix.is_empty() {
            return Ok(None);
        }

        suffix
            .parse::<u16>()
            .map(CpuId)
            .map(Some)
            .map_err(CpuIdParse)
    }
}

// === impl StatReadError ===

impl std::error::Error for StatReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(io) => Some(io),
            Self::Entry(entry) => Some(entry),
            Self::MissingAggregate => None,
        }
    }
}

impl Display for StatReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(io) => f.write_fmt(format_args!("could not read cpu statistics: {io}")),
            Self::Entry(entry) => f.write_fmt(format_args!("malformed cpu statistics: {entry}")),
            Self::MissingAggregate => f.write_str("cpu statistics have no aggregate cpu line"),
        }
    }
}

impl From<EntryParseError> for StatReadError {
    fn from(entry: EntryParseError) -> Self {
        Self::Entry(entry)
    }
}

impl From<io::Error> for StatReadError {
    fn from(io: io::Error) -> Self {
        Self::Io(io)
    }
}

// === impl EntryParseError ===

impl fmt::Display for EntryParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EntryParseError::*;
        match self {
            Empty => f.write_str("empty entry"),
            UnrecognizedEntry { kind } => {
                f.write_fmt(format_args!("unrecognized entry kind: {kind}"))
            }
            CpuIdParse(error) => f.write_fmt(format_args!("invalid cpu id: {error}")),
            UserHzParse(error) => f.write_fmt(format_args!("invalid time value: {error}")),
            CpuTime => f.write_str("wrong number of cpu time columns"),
        }
    }
}

impl std::error::Error for EntryParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use EntryParseError::*;

        match self {
            CpuIdParse(error) => Some(error),
            UserHzParse(error) => Some(error),
            Empty | UnrecognizedEntry { kind: _ } | CpuTime => None,
        }
    }
}
