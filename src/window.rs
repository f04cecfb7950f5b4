use {
    crate::{
        config::{Config, DisplayMode},
        history::History,
        session::SessionRecord,
        source::Identity,
    },
    crossterm::{QueueableCommand, cursor, terminal},
    std::io::{self, Write},
};

/// separates the blocks of a tick.
const RULE: &str = "---------------------------------------";

/// draws each tick onto a terminal, or any other writer.
pub struct Window<'c, W> {
    out: W,
    config: &'c Config,
}

// === impl Window ===

impl<'c, W: Write> Window<'c, W> {
    pub fn new(out: W, config: &'c Config) -> Self {
        Self { out, config }
    }

    /// returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// prints the header for a tick.
    ///
    /// in refresh mode, this clears the screen first.
    pub fn header(&mut self, tick: usize, resident_kb: Option<u64>) -> io::Result<()> {
        let Self { out, config } = self;

        match config.mode {
            DisplayMode::Sequential => writeln!(out, ">>> iteration {tick}")?,
            DisplayMode::Refresh => {
                Self::clear(out)?;
                writeln!(
                    out,
                    "Nbr of samples: {} -- every {} secs",
                    config.samples,
                    config.delay.as_secs()
                )?;
            }
        }

        if let Some(kb) = resident_kb {
            writeln!(out, " Memory usage: {kb} kilobytes")?;
        }

        Ok(())
    }

    /// prints a horizontal rule.
    pub fn rule(&mut self) -> io::Result<()> {
        writeln!(self.out, "{RULE}")
    }

    pub fn memory(&mut self, tick: usize, history: &History) -> io::Result<()> {
        writeln!(
            self.out,
            "### Memory ### (Phys.Used/Tot -- Virtual Used/Tot)"
        )?;
        self.rows(tick, history)
    }

    /// prints the logged in sessions, skipping any other accounting records.
    pub fn sessions(&mut self, records: &[SessionRecord]) -> io::Result<()> {
        let Self { out, .. } = self;

        writeln!(out, "### Sessions/users ###")?;
        for record in records.iter().filter(|r| r.is_active()) {
            writeln!(out, "{record}")?;
        }

        Ok(())
    }

    pub fn cores(&mut self, cores: usize) -> io::Result<()> {
        writeln!(self.out, "Number of cores: {cores}")
    }

    pub fn cpu_usage(&mut self, usage: f64) -> io::Result<()> {
        writeln!(self.out, " total cpu use: {usage:.2}%")
    }

    pub fn cpu_graph(&mut self, tick: usize, history: &History) -> io::Result<()> {
        self.rows(tick, history)
    }

    pub fn identity(&mut self, identity: &Identity) -> io::Result<()> {
        let Self { out, .. } = self;
        let Identity {
            system_name,
            node_name,
            version,
            release,
            machine,
        } = identity;

        writeln!(out, "### System Information ###")?;
        writeln!(out, " System Name = {system_name}")?;
        writeln!(out, " Machine Name = {node_name}")?;
        writeln!(out, " Version = {version}")?;
        writeln!(out, " Release = {release}")?;
        writeln!(out, " Architecture = {machine}")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// prints a history, one line per tick.
    ///
    /// in sequential mode only the current tick's row is filled in; in refresh mode every row so
    /// far is. either way the block is padded out to the full sample count.
    fn rows(&mut self, tick: usize, history: &History) -> io::Result<()> {
        let Self { out, config } = self;

        match config.mode {
            DisplayMode::Sequential => {
                for row in 0..history.len() {
                    match history.get(row) {
                        Some(text) if row == tick => writeln!(out, "{text}")?,
                        _ => writeln!(out)?,
                    }
                }
            }
            DisplayMode::Refresh => {
                let written = history.through(tick);
                for text in written {
                    writeln!(out, "{text}")?;
                }
                for _ in written.len()..history.len() {
                    writeln!(out)?;
                }
            }
        }

        Ok(())
    }

    /// clears the screen, and moves the cursor to the top-left corner.
    fn clear(out: &mut W) -> io::Result<()> {
        out.queue(cursor::MoveTo(0, 0))?
            .queue(terminal::Clear(terminal::ClearType::All))
            .map(drop)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{config::Sections, session::SessionKind},
        std::time::Duration,
    };

    fn config(mode: DisplayMode) -> Config {
        Config {
            samples: 3,
            delay: Duration::from_secs(2),
            sections: Sections::from_flags(false, false),
            graphics: true,
            mode,
        }
    }

    fn history() -> History {
        let mut history = History::new(3);
        history.write(0, "zero".to_owned());
        history.write(1, "one".to_owned());
        history
    }

    fn draw(config: &Config, f: impl FnOnce(&mut Window<'_, Vec<u8>>) -> io::Result<()>) -> String {
        let mut window = Window::new(Vec::new(), config);
        f(&mut window).unwrap();
        String::from_utf8(window.into_inner()).unwrap()
    }

    #[test]
    fn sequential_header() {
        let config = config(DisplayMode::Sequential);
        let out = draw(&config, |w| w.header(4, Some(2048)));
        assert_eq!(out, ">>> iteration 4\n Memory usage: 2048 kilobytes\n");
    }

    #[test]
    fn refresh_header_clears() {
        let config = config(DisplayMode::Refresh);
        let out = draw(&config, |w| w.header(0, None));
        assert!(out.contains("\x1b[2J"), "{out:?}");
        assert!(out.ends_with("Nbr of samples: 3 -- every 2 secs\n"), "{out:?}");
        assert!(!out.contains("Memory usage"));
    }

    #[test]
    fn rule() {
        let config = config(DisplayMode::Sequential);
        let out = draw(&config, |w| w.rule());
        assert_eq!(out, format!("{}\n", "-".repeat(39)));
    }

    #[test]
    fn sequential_rows() {
        let config = config(DisplayMode::Sequential);
        let out = draw(&config, |w| w.cpu_graph(1, &history()));
        assert_eq!(out, "\none\n\n");
    }

    #[test]
    fn refresh_rows() {
        let config = config(DisplayMode::Refresh);
        let out = draw(&config, |w| w.cpu_graph(1, &history()));
        assert_eq!(out, "zero\none\n\n");
    }

    #[test]
    fn memory_caption() {
        let config = config(DisplayMode::Refresh);
        let out = draw(&config, |w| w.memory(0, &history()));
        assert_eq!(
            out,
            "### Memory ### (Phys.Used/Tot -- Virtual Used/Tot)\nzero\n\n\n"
        );
    }

    #[test]
    fn sessions_are_filtered() {
        let records = [
            SessionRecord {
                kind: SessionKind::BootTime,
                user: "reboot".to_owned(),
                line: "~".to_owned(),
                host: "6.1.0".to_owned(),
            },
            SessionRecord {
                kind: SessionKind::UserProcess,
                user: "kate".to_owned(),
                line: "tty1".to_owned(),
                host: String::new(),
            },
            SessionRecord {
                kind: SessionKind::UserProcess,
                user: "kate".to_owned(),
                line: "pts/1".to_owned(),
                host: "laptop".to_owned(),
            },
        ];

        let config = config(DisplayMode::Refresh);
        let out = draw(&config, |w| w.sessions(&records));
        assert_eq!(
            out,
            "### Sessions/users ###\n kate\ttty1\t\n kate\tpts/1\t(laptop)\n"
        );
    }

    #[test]
    fn cpu_lines() {
        let config = config(DisplayMode::Refresh);
        let out = draw(&config, |w| {
            w.cores(8)?;
            w.cpu_usage(12.5)
        });
        assert_eq!(out, "Number of cores: 8\n total cpu use: 12.50%\n");
    }

    #[test]
    fn identity() {
        let identity = Identity {
            system_name: "Linux".to_owned(),
            node_name: "box".to_owned(),
            version: "#1 SMP".to_owned(),
            release: "6.1.0".to_owned(),
            machine: "x86_64".to_owned(),
        };
        let config = config(DisplayMode::Sequential);
        let out = draw(&config, |w| w.identity(&identity));
        assert_eq!(
            out,
            "### System Information ###\n System Name = Linux\n Machine Name = box\n \
             Version = #1 SMP\n Release = 6.1.0\n Architecture = x86_64\n"
        );
    }
}
