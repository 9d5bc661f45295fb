use std::fmt;

/// Proof that at least one error was emitted.
///
/// Only the diagnostic queue can mint one, so a function returning
/// `Result<T, ErrorGuaranteed>` cannot fail without having reported why.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ErrorGuaranteed(());

impl ErrorGuaranteed {
    pub(crate) fn new() -> Self {
        ErrorGuaranteed(())
    }

    /// Recover a guarantee from an error count reported elsewhere.
    ///
    /// Returns `None` when the count is zero.
    pub fn from_error_count(count: usize) -> Option<Self> {
        (count > 0).then(ErrorGuaranteed::new)
    }
}

impl fmt::Display for ErrorGuaranteed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error(s) emitted")
    }
}

impl std::error::Error for ErrorGuaranteed {}
