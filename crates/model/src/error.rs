/// The kind of error that occurred.
///
/// The loop treats every kind as terminal for the current request; the
/// kind exists so callers can log and report the failure precisely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request or response was refused by a content filter.
    Moderated,
    /// The model backend is rate limited.
    RateLimitExceeded,
    /// Any other failure of the model capability.
    Other,
}
