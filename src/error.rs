/// Errors returned by [`AvlgTree`](crate::AvlgTree).
///
/// A key that is simply not present is not an error; lookups report it as `Ok(None)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    /// The tree was constructed with a maximum imbalance below 1.
    #[error("maximum imbalance must be at least 1, got {0}")]
    InvalidBalance(i32),
    /// The operation needs at least one stored key.
    #[error("operation requires a non-empty tree")]
    EmptyTree,
}
