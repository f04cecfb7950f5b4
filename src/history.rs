/// rows of rendered text, one per tick.
///
/// the buffer is sized once, when the run begins. a row is written once, during its own tick,
/// and may be appended to within that tick.
#[derive(Clone, Debug)]
pub struct History {
    rows: Vec<String>,
}

/// the pair of histories kept over a run.
#[derive(Clone, Debug)]
pub struct Histories {
    pub memory: History,
    pub cpu: History,
}

// === impl History ===

impl History {
    pub fn new(len: usize) -> Self {
        Self {
            rows: vec![String::new(); len],
        }
    }

    /// the number of rows, written or not.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// writes the row for the given tick.
    ///
    /// # panics
    ///
    /// panics if `tick` is past the end of the history.
    pub fn write(&mut self, tick: usize, row: String) {
        self.rows[tick] = row;
    }

    /// appends text to the row for the given tick.
    ///
    /// # panics
    ///
    /// panics if `tick` is past the end of the history.
    pub fn append(&mut self, tick: usize, text: &str) {
        self.rows[tick].push_str(text);
    }

    /// returns the row for the given tick, if it is within the history.
    pub fn get(&self, tick: usize) -> Option<&str> {
        self.rows.get(tick).map(String::as_str)
    }

    /// returns the rows up to and including the given tick.
    pub fn through(&self, tick: usize) -> &[String] {
        let end = tick.saturating_add(1).min(self.rows.len());
        &self.rows[..end]
    }
}

// === impl Histories ===

impl Histories {
    pub fn new(len: usize) -> Self {
        Self {
            memory: History::new(len),
            cpu: History::new(len),
        }
    }
}
