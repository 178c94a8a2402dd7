//! Status snapshot of a completion cell

/// Lifecycle status of a completion cell.
///
/// A cell starts `Pending` and moves exactly once into one of the three
/// terminal statuses:
/// - Succeeded: a value was published
/// - Failed: an application error was published
/// - Canceled: the cell was canceled before either happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FutureStatus {
    /// No outcome yet
    Pending,
    /// Completed with a value
    Succeeded,
    /// Completed with an application error
    Failed,
    /// Canceled before completion
    Canceled,
}

impl FutureStatus {
    /// Check if the cell has not reached a terminal status
    pub fn is_pending(&self) -> bool {
        matches!(self, FutureStatus::Pending)
    }

    /// Check if the cell is in any terminal status, including `Canceled`
    pub fn is_completed(&self) -> bool {
        !self.is_pending()
    }

    /// Check if the cell was canceled
    pub fn is_canceled(&self) -> bool {
        matches!(self, FutureStatus::Canceled)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FutureStatus::Pending => "Pending",
            FutureStatus::Succeeded => "Succeeded",
            FutureStatus::Failed => "Failed",
            FutureStatus::Canceled => "Canceled",
        }
    }
}

impl std::fmt::Display for FutureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
