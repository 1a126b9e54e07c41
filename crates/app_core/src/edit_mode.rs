//! Inline rename state of a rendered node

/// Whether a node label is displayed or being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Read,
    Write,
}

/// Outcome of leaving write mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Commit the new label
    Submitted(String),
    Cancelled,
    /// Submit/cancel while not editing
    Ignored,
}

impl EditMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditMode::Read => "read",
            EditMode::Write => "write",
        }
    }

    pub fn is_write(&self) -> bool {
        *self == EditMode::Write
    }

    /// Enter write mode (re-entering is a no-op)
    pub fn begin(&mut self) {
        *self = EditMode::Write;
    }

    /// Leave write mode committing `value`
    pub fn submit(&mut self, value: &str) -> EditOutcome {
        match self {
            EditMode::Write => {
                *self = EditMode::Read;
                EditOutcome::Submitted(value.to_string())
            }
            EditMode::Read => EditOutcome::Ignored,
        }
    }

    /// Leave write mode without committing
    pub fn cancel(&mut self) -> EditOutcome {
        match self {
            EditMode::Write => {
                *self = EditMode::Read;
                EditOutcome::Cancelled
            }
            EditMode::Read => EditOutcome::Ignored,
        }
    }
}
