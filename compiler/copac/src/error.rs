use copa_graph::GraphError;

/// Failure of a whole pass. Per-directive problems are diagnostics, not this.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum PassError {
    /// Cancellation was observed; every unit produced so far was discarded.
    #[error("generation pass was cancelled")]
    Cancelled,
}

impl From<GraphError> for PassError {
    fn from(error: GraphError) -> Self {
        match error {
            GraphError::Cancelled => PassError::Cancelled,
        }
    }
}
