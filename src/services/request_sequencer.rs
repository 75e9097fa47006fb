/// The two request tracks the orchestrator issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Keystroke-driven suggestion lookups
    Search,
    /// Resolution of a picked suggestion
    Resolve,
}

/// Hands out monotonically increasing request numbers and remembers the
/// latest one per track. Only a response carrying the latest number of its
/// track may touch session state.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    next: u64,
    latest_search: Option<u64>,
    latest_resolve: Option<u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, kind: RequestKind) -> u64 {
        self.next += 1;
        *self.slot(kind) = Some(self.next);
        self.next
    }

    pub fn is_current(&self, kind: RequestKind, seq: u64) -> bool {
        let latest = match kind {
            RequestKind::Search => self.latest_search,
            RequestKind::Resolve => self.latest_resolve,
        };
        latest == Some(seq)
    }

    /// Mark the track's response as consumed; later duplicates are stale
    pub fn complete(&mut self, kind: RequestKind, seq: u64) {
        if self.is_current(kind, seq) {
            *self.slot(kind) = None;
        }
    }

    /// Drop whatever is in flight on this track
    pub fn invalidate(&mut self, kind: RequestKind) {
        *self.slot(kind) = None;
    }

    pub fn in_flight(&self, kind: RequestKind) -> bool {
        match kind {
            RequestKind::Search => self.latest_search.is_some(),
            RequestKind::Resolve => self.latest_resolve.is_some(),
        }
    }

    fn slot(&mut self, kind: RequestKind) -> &mut Option<u64> {
        match kind {
            RequestKind::Search => &mut self.latest_search,
            RequestKind::Resolve => &mut self.latest_resolve,
        }
    }
}
