//! run configuration, built once from the command line.

use {
    clap::Parser,
    log::{debug, warn},
    std::{ffi::OsString, str::FromStr, time::Duration},
};

/// command line arguments.
#[derive(Debug, Default, Parser)]
#[command(name = "sysstats", version, about = "samples and displays host resource use")]
pub struct Args {
    /// show system metrics (memory and cpu).
    #[arg(short, long)]
    pub system: bool,
    /// show logged in sessions.
    #[arg(short, long)]
    pub user: bool,
    /// draw memory and cpu changes as text graphics.
    #[arg(short, long)]
    pub graphics: bool,
    /// print each sample below the last, instead of redrawing the screen.
    #[arg(short = 'q', long)]
    pub sequential: bool,
    /// the number of samples to take.
    #[arg(short = 'n', long, value_name = "N", num_args = 0..=1, require_equals = true)]
    pub samples: Option<Option<String>>,
    /// the number of seconds between samples.
    #[arg(short = 't', long, value_name = "T", num_args = 0..=1, require_equals = true)]
    pub tdelay: Option<Option<String>>,
    /// the sample count, then the delay. these take precedence over flags.
    #[arg(value_name = "SAMPLES TDELAY")]
    pub positional: Vec<String>,
}

/// how each tick is presented.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DisplayMode {
    /// each tick is printed below the last, with only its own row filled in.
    Sequential,
    /// the screen is cleared and every row seen so far is redrawn.
    #[default]
    Refresh,
}

/// which blocks are printed each tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Sections {
    /// memory, core count, and cpu usage.
    pub system: bool,
    /// the logged in sessions.
    pub sessions: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub samples: usize,
    pub delay: Duration,
    pub sections: Sections,
    pub graphics: bool,
    pub mode: DisplayMode,
}

// === impl Args ===

impl Args {
    /// parses the process's arguments.
    pub fn from_env() -> Self {
        Self::parse_from(Self::attach_values(std::env::args_os()))
    }

    /// rewrites `-nN` and `-tT` as `--samples=N` and `--tdelay=T`.
    ///
    /// a short option's value must be attached to it. the rest of its cluster is the value, so
    /// `-gn5` is `-g --samples=5`, and a separate word after `-n` is a positional.
    pub fn attach_values(args: impl IntoIterator<Item = impl Into<OsString>>) -> Vec<OsString> {
        let mut attached: Vec<OsString> = Vec::new();
        let mut options = true;

        for arg in args.into_iter().map(Into::<OsString>::into) {
            let cluster = arg
                .to_str()
                .filter(|_| options)
                .and_then(|arg| arg.strip_prefix('-'))
                .filter(|cluster| !cluster.is_empty() && !cluster.starts_with('-'));
            let split = cluster.and_then(|c| c.find(['n', 't']).map(|at| c.split_at(at)));
            let Some((flags, rest)) = split else {
                options &= arg.as_os_str() != "--";
                attached.push(arg);
                continue;
            };

            let (option, value) = rest.split_at(1);
            let long = if option == "n" { "--samples" } else { "--tdelay" };
            if !flags.is_empty() {
                attached.push(format!("-{flags}").into());
            }
            attached.push(if value.is_empty() {
                long.into()
            } else {
                format!("{long}={value}").into()
            });
        }

        attached
    }
}

// === impl Sections ===

impl Sections {
    /// asking for both, or neither, shows everything.
    pub fn from_flags(system: bool, user: bool) -> Self {
        Self {
            system: !user || system,
            sessions: user || !system,
        }
    }
}

// === impl Config ===

impl Default for Config {
    fn default() -> Self {
        Self {
            samples: Self::SAMPLES,
            delay: Duration::from_secs(Self::TDELAY),
            sections: Sections::from_flags(false, false),
            graphics: false,
            mode: DisplayMode::default(),
        }
    }
}

impl Config {
    const SAMPLES: usize = 10;
    const TDELAY: u64 = 1;

    /// a value that is not an unsigned integer falls back to the default for that parameter.
    fn number<T: FromStr>(name: &str, raw: &str, default: T) -> T {
        raw.trim().parse().unwrap_or_else(|_| {
            warn!("{name} value {raw:?} is not a whole number; using the default");
            default
        })
    }
}

impl From<Args> for Config {
    fn from(
        Args {
            system,
            user,
            graphics,
            sequential,
            samples: samples_flag,
            tdelay: tdelay_flag,
            positional,
        }: Args,
    ) -> Self {
        let mut samples = Self::SAMPLES;
        let mut tdelay = Self::TDELAY;

        // a flag given without a value leaves the parameter as it is.
        if let Some(Some(raw)) = samples_flag {
            samples = Self::number("samples", &raw, Self::SAMPLES);
        }
        if let Some(Some(raw)) = tdelay_flag {
            tdelay = Self::number("tdelay", &raw, Self::TDELAY);
        }

        let mut positional = positional.into_iter();
        if let Some(raw) = positional.next() {
            samples = Self::number("samples", &raw, Self::SAMPLES);
        }
        if let Some(raw) = positional.next() {
            tdelay = Self::number("tdelay", &raw, Self::TDELAY);
        }
        for ignored in positional {
            debug!("ignoring extra argument {ignored:?}");
        }

        Self {
            samples,
            delay: Duration::from_secs(tdelay),
            sections: Sections::from_flags(system, user),
            graphics,
            mode: if sequential {
                DisplayMode::Sequential
            } else {
                DisplayMode::Refresh
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Config {
        let args = std::iter::once("sysstats").chain(args.iter().copied());
        Args::try_parse_from(Args::attach_values(args))
            .map(Config::from)
            .unwrap()
    }

    #[test]
    fn defaults() {
        assert_eq!(config(&[]), Config::default());
        assert_eq!(Config::default().samples, 10);
        assert_eq!(Config::default().delay, Duration::from_secs(1));
        assert_eq!(Config::default().mode, DisplayMode::Refresh);
    }

    #[test]
    fn flags() {
        let config = config(&["-g", "--sequential"]);
        assert!(config.graphics);
        assert_eq!(config.mode, DisplayMode::Sequential);
    }

    #[test]
    fn sections() {
        let both = Sections {
            system: true,
            sessions: true,
        };
        assert_eq!(config(&[]).sections, both);
        assert_eq!(config(&["-s", "-u"]).sections, both);
        assert_eq!(
            config(&["--system"]).sections,
            Sections {
                system: true,
                sessions: false,
            }
        );
        assert_eq!(
            config(&["--user"]).sections,
            Sections {
                system: false,
                sessions: true,
            }
        );
    }

    #[test]
    fn attached_values() {
        let config = config(&["-n5", "--tdelay=3"]);
        assert_eq!(config.samples, 5);
        assert_eq!(config.delay, Duration::from_secs(3));
    }

    #[test]
    fn flags_without_values() {
        let config = config(&["--samples", "-t"]);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn positionals_win() {
        let config = config(&["--samples=5", "--tdelay=3", "7", "2"]);
        assert_eq!(config.samples, 7);
        assert_eq!(config.delay, Duration::from_secs(2));
    }

    #[test]
    fn extra_positionals_are_ignored() {
        let config = config(&["4", "0", "99"]);
        assert_eq!(config.samples, 4);
        assert_eq!(config.delay, Duration::ZERO);
    }

    #[test]
    fn malformed_values_fall_back() {
        let lots = config(&["--samples=lots", "-tx"]);
        assert_eq!(lots.samples, 10);
        assert_eq!(lots.delay, Duration::from_secs(1));

        let many = config(&["-n3", "many"]);
        assert_eq!(many.samples, 10);
    }

    #[test]
    fn separated_words_are_positional() {
        let short = config(&["-n", "5", "2"]);
        assert_eq!(short.samples, 5);
        assert_eq!(short.delay, Duration::from_secs(2));

        let long = config(&["--tdelay", "3", "7"]);
        assert_eq!(long.samples, 3);
        assert_eq!(long.delay, Duration::from_secs(7));
    }

    #[test]
    fn clustered_short_options() {
        let config = config(&["-gqn4", "-t2"]);
        assert!(config.graphics);
        assert_eq!(config.mode, DisplayMode::Sequential);
        assert_eq!(config.samples, 4);
        assert_eq!(config.delay, Duration::from_secs(2));
    }

    #[test]
    fn attach_values() {
        let attached = Args::attach_values(["sysstats", "-sn5", "-t", "--", "-n3"]);
        assert_eq!(
            attached,
            ["sysstats", "-s", "--samples=5", "--tdelay", "--", "-n3"].map(OsString::from)
        );
    }
}
