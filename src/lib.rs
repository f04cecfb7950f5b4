//! a compact system statistics monitor.

use {
    self::{
        history::Histories,
        meter::{CpuTrend, MemoryTrend},
        sentinel::Sentinel,
        source::{Clock, Host, HostError, HostSource, ProcStatFile, StatsSource, SystemClock},
        stat::StatReadError,
        window::Window,
    },
    log::{debug, info},
    std::{
        fmt::{self, Display},
        io::{self, Write},
    },
};

pub use self::config::{Args, Config, DisplayMode, Sections};

pub mod config;
pub mod history;
pub mod memory;
pub mod meter;
pub mod sentinel;
pub mod session;
pub mod source;
pub mod window;

/// kernel statistics facilities.
///
/// this file provides tools to interact with `/proc/stat`.
pub mod stat;

/// samples the host a fixed number of times, drawing each sample as it is taken.
pub struct App<S = ProcStatFile, H = Host, C = SystemClock> {
    config: Config,
    sentinel: Sentinel<S>,
    host: H,
    clock: C,
}

/// the state of one run of an [`App`].
struct Run<'a, S, H, C, W> {
    config: &'a Config,
    sentinel: Sentinel<S>,
    host: &'a H,
    clock: &'a C,
    histories: Histories,
    window: Window<'a, W>,
}

/// what a run carries from one tick to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Trends {
    memory: MemoryTrend,
    cpu: CpuTrend,
}

#[derive(Debug)]
pub enum Error {
    /// cpu statistics could not be read.
    Stat(StatReadError),
    /// some other host metric could not be read.
    Host(HostError),
    /// output could not be written.
    Io(io::Error),
}

/// === impl App ===

impl App {
    /// initializes a new application, observing the running host.
    pub fn new(config: Config) -> Self {
        Self::with_sources(config, ProcStatFile, Host, SystemClock)
    }
}

impl<S, H, C> App<S, H, C>
where
    S: StatsSource,
    H: HostSource,
    C: Clock,
{
    /// initializes a new application with the given metric sources.
    pub fn with_sources(config: Config, stats: S, host: H, clock: C) -> Self {
        Self {
            config,
            sentinel: Sentinel::new(stats),
            host,
            clock,
        }
    }

    /// runs the application, drawing onto the given writer.
    ///
    /// this returns once every sample has been taken, or as soon as a metric cannot be read.
    pub fn run(self, out: impl Write) -> Result<(), Error> {
        let Self {
            config,
            sentinel,
            host,
            clock,
        } = self;

        info!(
            "taking {} samples, {}s apart",
            config.samples,
            config.delay.as_secs()
        );

        let mut run = Run {
            config: &config,
            sentinel,
            host: &host,
            clock: &clock,
            histories: Histories::new(config.samples),
            window: Window::new(out, &config),
        };

        let mut trends = Trends::default();
        for tick in 0..config.samples {
            trends = run.sample(tick, trends)?;
            run.window.flush()?;
        }

        let Run { mut window, .. } = run;
        let identity = host.identity()?;
        window.rule()?;
        window.identity(&identity)?;
        window.rule()?;
        window.flush()?;

        Ok(())
    }
}

// === impl Run ===

impl<S, H, C, W> Run<'_, S, H, C, W>
where
    S: StatsSource,
    H: HostSource,
    C: Clock,
    W: Write,
{
    /// takes and draws one sample, returning the trends for the next tick.
    fn sample(&mut self, tick: usize, trends: Trends) -> Result<Trends, Error> {
        let Self {
            config,
            sentinel,
            host,
            clock,
            histories,
            window,
        } = self;
        let Trends { memory, cpu } = trends;

        sentinel.arm()?;
        clock.pause(config.delay);

        window.header(tick, host.resident_kb())?;

        if !config.sections.system {
            window.rule()?;
            window.sessions(&host.sessions())?;
            window.rule()?;
            return Ok(trends);
        }

        window.rule()?;
        let reading = host.memory()?;
        histories.memory.write(tick, reading.to_string());
        let memory = if config.graphics {
            let (glyph, memory) = memory.render(tick, reading.virtual_used);
            histories.memory.append(tick, &glyph);
            memory
        } else {
            memory
        };
        window.memory(tick, &histories.memory)?;

        if config.sections.sessions {
            window.rule()?;
            window.sessions(&host.sessions())?;
            window.rule()?;
        }

        window.cores(host.cores())?;

        let usage = sentinel.observe()?;
        window.cpu_usage(usage)?;

        let cpu = if config.graphics {
            let (row, cpu) = cpu.render(tick, usage);
            histories.cpu.write(tick, row);
            window.cpu_graph(tick, &histories.cpu)?;
            cpu
        } else {
            cpu
        };

        debug!(
            "tick {tick}: {usage:.2}% cpu, {:.2} GB virtual memory, {} bars",
            reading.virtual_used,
            cpu.bars()
        );

        Ok(Trends { memory, cpu })
    }
}

// === impl Error ===

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Stat(stat) => Some(stat),
            Self::Host(host) => Some(host),
            Self::Io(io) => Some(io),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stat(stat) => Display::fmt(stat, f),
            Self::Host(host) => Display::fmt(host, f),
            Self::Io(io) => f.write_fmt(format_args!("could not write output: {io}")),
        }
    }
}

impl From<StatReadError> for Error {
    fn from(stat: StatReadError) -> Self {
        Self::Stat(stat)
    }
}

impl From<HostError> for Error {
    fn from(host: HostError) -> Self {
        Self::Host(host)
    }
}

impl From<io::Error> for Error {
    fn from(io: io::Error) -> Self {
        Self::Io(io)
    }
}
