//! providers of raw host metrics.
//!
//! each read is one-shot: nothing here holds a handle across calls.

use {
    crate::{memory::MemoryReading, session::SessionRecord},
    std::{
        cell::RefCell,
        collections::VecDeque,
        fmt::{self, Display},
        fs::File,
        io::{self, BufReader, Cursor, Read},
        time::Duration,
    },
};

pub use self::{clock::*, host::*, stats::*};

mod clock {
    use super::*;

    /// waits between samples.
    pub trait Clock {
        fn pause(&self, duration: Duration);
    }

    #[derive(Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn pause(&self, duration: Duration) {
            std::thread::sleep(duration);
        }
    }

    impl<C: Clock + ?Sized> Clock for &C {
        fn pause(&self, duration: Duration) {
            (**self).pause(duration)
        }
    }

    /// a mock clock, which records pauses instead of sleeping.
    #[derive(Default)]
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockClock {
        pauses: RefCell<Vec<Duration>>,
    }

    impl Clock for MockClock {
        fn pause(&self, duration: Duration) {
            let MockClock { pauses } = self;
            pauses.borrow_mut().push(duration);
        }
    }

    #[allow(dead_code, reason = "this is a testing utility.")]
    impl MockClock {
        /// returns the pauses requested so far.
        pub fn pauses(&self) -> Vec<Duration> {
            self.pauses.borrow().clone()
        }
    }
}

/// abstracts over providers of statistics.
mod stats {
    use super::*;

    /// a source of kernel statistics.
    pub trait StatsSource {
        /// returns a reader.
        fn open(&self) -> io::Result<impl Read>;
    }

    /// stats backed by `/proc/stat`.
    #[derive(Default)]
    pub struct ProcStatFile;

    /// a mock stat source.
    ///
    /// each call to [`StatsSource::open()`] yields the next table. once exhausted, opening fails
    /// as though the file were missing.
    #[derive(Default)]
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockStatFile {
        stats: RefCell<VecDeque<String>>,
    }

    // === impl ProcStatFile ===

    impl StatsSource for ProcStatFile {
        fn open(&self) -> io::Result<impl Read> {
            File::open(Self::STAT).map(BufReader::new)
        }
    }

    impl ProcStatFile {
        const STAT: &str = "/proc/stat";
    }

    // === impl MockStatFile ===

    #[allow(dead_code, reason = "this is a testing utility.")]
    impl MockStatFile {
        pub fn new<S: Into<String>>(stats: impl IntoIterator<Item = S>) -> Self {
            let stats = stats.into_iter().map(Into::into).collect();
            Self {
                stats: RefCell::new(stats),
            }
        }
    }

    impl StatsSource for MockStatFile {
        fn open(&self) -> io::Result<impl Read> {
            let Self { stats } = self;

            stats
                .borrow_mut()
                .pop_front()
                .map(Cursor::new)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "mock stats are exhausted"))
        }
    }
}

/// abstracts over the operating system's introspection facilities.
mod host {
    use {
        super::*,
        crate::{memory::RawMemory, session::SessionKind},
        libc::c_char,
        sysinfo::System,
    };

    /// a source of host metrics, other than cpu time.
    pub trait HostSource {
        /// reads physical and virtual memory use.
        fn memory(&self) -> Result<MemoryReading, HostError>;
        /// lists the records of the login accounting database.
        fn sessions(&self) -> Vec<SessionRecord>;
        /// the number of online processors.
        fn cores(&self) -> usize;
        /// describes the machine and its operating system.
        fn identity(&self) -> Result<Identity, HostError>;
        /// the maximum resident set size of this process, in kilobytes.
        fn resident_kb(&self) -> Option<u64>;
    }

    /// the machine's identity, as reported by `uname(2)`.
    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    pub struct Identity {
        pub system_name: String,
        pub node_name: String,
        pub version: String,
        pub release: String,
        pub machine: String,
    }

    #[derive(Debug)]
    pub enum HostError {
        /// memory totals could not be read.
        Memory,
        /// the operating system could not be identified.
        Identity(io::Error),
    }

    /// the running host.
    #[derive(Default)]
    pub struct Host;

    /// a mock host.
    ///
    /// each call to [`HostSource::memory()`] yields the next reading. once exhausted, reading
    /// memory fails.
    #[derive(Default)]
    #[allow(dead_code, reason = "this is a testing utility.")]
    pub struct MockHost {
        memory: RefCell<VecDeque<MemoryReading>>,
        pub sessions: Vec<SessionRecord>,
        pub cores: usize,
        pub identity: Option<Identity>,
        pub resident_kb: Option<u64>,
    }

    // === impl Host ===

    impl HostSource for Host {
        fn memory(&self) -> Result<MemoryReading, HostError> {
            let mut system = System::new();
            system.refresh_memory();

            let raw = RawMemory {
                ram_total: system.total_memory(),
                ram_free: system.free_memory(),
                swap_total: system.total_swap(),
                swap_free: system.free_swap(),
            };

            if raw.ram_total == 0 {
                return Err(HostError::Memory);
            }

            Ok(MemoryReading::from(raw))
        }

        fn sessions(&self) -> Vec<SessionRecord> {
            let mut records = Vec::new();

            // SAFETY: the utmp stream is only touched from this thread, and each record is copied
            // out before the next call to `getutxent` overwrites it.
            unsafe {
                libc::setutxent();
                loop {
                    let entry = libc::getutxent();
                    let Some(entry) = entry.as_ref() else {
                        break;
                    };
                    records.push(SessionRecord {
                        kind: SessionKind::from(entry.ut_type),
                        user: Self::field(&entry.ut_user),
                        line: Self::field(&entry.ut_line),
                        host: Self::field(&entry.ut_host),
                    });
                }
                libc::endutxent();
            }

            records
        }

        fn cores(&self) -> usize {
            let mut system = System::new();
            system.refresh_cpu_all();
            system.cpus().len()
        }

        fn identity(&self) -> Result<Identity, HostError> {
            // SAFETY: `utsname` is plain old data, and `uname` fills it in.
            let name = unsafe {
                let mut name = std::mem::zeroed::<libc::utsname>();
                if libc::uname(&mut name) != 0 {
                    return Err(HostError::Identity(io::Error::last_os_error()));
                }
                name
            };

            Ok(Identity {
                system_name: Self::field(&name.sysname),
                node_name: Self::field(&name.nodename),
                version: Self::field(&name.version),
                release: Self::field(&name.release),
                machine: Self::field(&name.machine),
            })
        }

        fn resident_kb(&self) -> Option<u64> {
            // SAFETY: `rusage` is plain old data, and `getrusage` fills it in.
            let usage = unsafe {
                let mut usage = std::mem::zeroed::<libc::rusage>();
                if libc::getrusage(libc::RUSAGE_SELF, &mut usage) != 0 {
                    return None;
                }
                usage
            };

            // linux reports this in kilobytes.
            u64::try_from(usage.ru_maxrss).ok()
        }
    }

    impl Host {
        /// reads a fixed-size, possibly unterminated, c string.
        fn field(field: &[c_char]) -> String {
            let bytes = field
                .iter()
                .take_while(|c| **c != 0)
                .map(|c| *c as u8)
                .collect::<Vec<_>>();
            String::from_utf8_lossy(&bytes).into_owned()
        }
    }

    // === impl MockHost ===

    #[allow(dead_code, reason = "this is a testing utility.")]
    impl MockHost {
        pub fn new(memory: impl IntoIterator<Item = MemoryReading>) -> Self {
            Self {
                memory: RefCell::new(memory.into_iter().collect()),
                ..Self::default()
            }
        }
    }

    impl HostSource for MockHost {
        fn memory(&self) -> Result<MemoryReading, HostError> {
            self.memory
                .borrow_mut()
                .pop_front()
                .ok_or(HostError::Memory)
        }

        fn sessions(&self) -> Vec<SessionRecord> {
            self.sessions.clone()
        }

        fn cores(&self) -> usize {
            self.cores
        }

        fn identity(&self) -> Result<Identity, HostError> {
            self.identity.clone().ok_or_else(|| {
                HostError::Identity(io::Error::new(io::ErrorKind::NotFound, "no mock identity"))
            })
        }

        fn resident_kb(&self) -> Option<u64> {
            self.resident_kb
        }
    }

    // === impl HostError ===

    impl Display for HostError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Memory => f.write_str("could not read memory totals"),
                Self::Identity(io) => {
                    f.write_fmt(format_args!("could not identify the operating system: {io}"))
                }
            }
        }
    }

    impl std::error::Error for HostError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match self {
                Self::Memory => None,
                Self::Identity(io) => Some(io),
            }
        }
    }

}
