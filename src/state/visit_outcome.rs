/// Terminal states for thread visits
///
/// Every candidate thread URL handed to the coordinator ends in exactly one
/// of these states. There is no transition out of a terminal state: a URL is
/// never retried or revisited within a run.
use std::fmt;

/// Represents how the coordinator finished with one thread URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitOutcome {
    /// Thread was assembled, archived and its links explored
    Archived,

    /// First page could not be fetched or no original poster was found
    Abandoned,

    /// Thread was reached beyond the maximum depth; marked visited only
    DepthExceeded,

    /// Thread had already been dispatched earlier in the run
    Skipped,
}

impl VisitOutcome {
    /// Short label used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Archived => "archived",
            Self::Abandoned => "abandoned",
            Self::DepthExceeded => "depth_exceeded",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for VisitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
