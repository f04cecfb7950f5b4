use std::fmt::{self, Display};

/// the kind of a login accounting record.
///
/// see `utmp(5)` for more information.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionKind {
    Empty,
    RunLevel,
    BootTime,
    NewTime,
    OldTime,
    InitProcess,
    LoginProcess,
    /// a normal process, belonging to a logged in user.
    UserProcess,
    DeadProcess,
    Accounting,
    Unknown(i16),
}

/// a record of the login accounting database.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionRecord {
    pub kind: SessionKind,
    pub user: String,
    /// the terminal device, without its `/dev/` prefix.
    pub line: String,
    /// the remote host, which is empty for local logins.
    pub host: String,
}

// === impl SessionKind ===

impl From<i16> for SessionKind {
    fn from(kind: i16) -> Self {
        use SessionKind::*;

        match kind {
            0 => Empty,
            1 => RunLevel,
            2 => BootTime,
            3 => NewTime,
            4 => OldTime,
            5 => InitProcess,
            6 => LoginProcess,
            7 => UserProcess,
            8 => DeadProcess,
            9 => Accounting,
            other => Unknown(other),
        }
    }
}

// === impl SessionRecord ===

impl SessionRecord {
    /// returns true if this record is a logged in user.
    pub fn is_active(&self) -> bool {
        self.kind == SessionKind::UserProcess
    }
}

/// formats the record as a line of the session listing.
impl Display for SessionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            kind: _,
            user,
            line,
            host,
        } = self;

        write!(f, " {user}\t{line}\t")?;
        if !host.is_empty() {
            write!(f, "({host})")?;
        }

        Ok(())
    }
}
