/// Process-wide loading signal.
///
/// The coordinator calls `start` and `done` at most once per loading
/// transition, but implementations must tolerate overlapping pairs coming
/// from other parts of the application.
pub trait LoadingIndicator: Send + Sync {
    /// A refresh entered the loading state.
    fn start(&self);

    /// The refresh settled (success or failure).
    fn done(&self);
}
