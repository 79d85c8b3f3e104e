use super::ResultSet;

/// Summary of a statement that produced no result set (INSERT, UPDATE, DELETE, DDL).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub affected_rows: u64,
    /// `AUTO_INCREMENT` value generated by the statement, if any.
    pub last_insert_id: Option<u64>,
    pub warnings: u16,
}

/// The first element of a driver response: rows for statements that return a
/// result set, a [`WriteSummary`] otherwise. Column metadata is not kept.
#[derive(Debug, Clone)]
pub enum ExecOutcome {
    Rows(ResultSet),
    Write(WriteSummary),
}

impl ExecOutcome {
    #[must_use]
    pub fn rows(&self) -> Option<&ResultSet> {
        match self {
            ExecOutcome::Rows(rs) => Some(rs),
            ExecOutcome::Write(_) => None,
        }
    }

    /// Take the rows, or an empty set for write statements.
    #[must_use]
    pub fn into_rows(self) -> ResultSet {
        match self {
            ExecOutcome::Rows(rs) => rs,
            ExecOutcome::Write(_) => ResultSet::default(),
        }
    }

    #[must_use]
    pub fn write_summary(&self) -> Option<&WriteSummary> {
        match self {
            ExecOutcome::Write(summary) => Some(summary),
            ExecOutcome::Rows(_) => None,
        }
    }

    /// Affected rows for writes; returned row count for reads.
    #[must_use]
    pub fn affected_rows(&self) -> u64 {
        match self {
            ExecOutcome::Write(summary) => summary.affected_rows,
            ExecOutcome::Rows(rs) => rs.len() as u64,
        }
    }

    #[must_use]
    pub fn last_insert_id(&self) -> Option<u64> {
        self.write_summary().and_then(|s| s.last_insert_id)
    }
}
