/// Failure of a graph traversal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("dependency analysis was cancelled")]
    Cancelled,
}
