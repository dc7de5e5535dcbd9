use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitState {
    #[default]
    Idle,
    /// A commit is requested at `deadline` unless a new stroke starts first.
    Pending { deadline: Instant },
}

impl CommitState {
    pub fn is_pending(&self) -> bool {
        matches!(self, CommitState::Pending { .. })
    }
}
