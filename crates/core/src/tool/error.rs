use std::borrow::Cow;
use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested tool is not in the registry.
    NotFound,
    /// The input provided to the tool was invalid.
    InvalidInput,
    /// Error occurred while executing the tool.
    ExecutionError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "unknown tool"),
            ErrorKind::InvalidInput => write!(f, "invalid arguments"),
            ErrorKind::ExecutionError => write!(f, "tool execution failed"),
        }
    }
}

/// Describes a tool call error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    kind: ErrorKind,
    reason: Option<String>,
}

impl Error {
    /// Creates a new error with the `NotFound` kind.
    #[inline]
    pub fn not_found() -> Self {
        Self {
            kind: ErrorKind::NotFound,
            reason: None,
        }
    }

    /// Creates a new error with the `InvalidInput` kind.
    #[inline]
    pub fn invalid_input() -> Self {
        Self {
            kind: ErrorKind::InvalidInput,
            reason: None,
        }
    }

    /// Creates a new error with the `ExecutionError` kind.
    #[inline]
    pub fn execution_error() -> Self {
        Self {
            kind: ErrorKind::ExecutionError,
            reason: None,
        }
    }

    /// Attaches a reason to the error.
    #[inline]
    pub fn with_reason<S: Into<String>>(self, reason: S) -> Self {
        Self {
            kind: self.kind,
            reason: Some(reason.into()),
        }
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the full reason for the error, for logging.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match self.reason.as_deref() {
            Some(reason) => Cow::Borrowed(reason),
            None => Cow::Owned(format!("{}", self.kind)),
        }
    }

    /// Returns the message that may be surfaced to the model and the
    /// user.
    ///
    /// `NotFound` and `InvalidInput` reasons carry implementation
    /// detail (dispatch internals, serde messages), so only the generic
    /// kind text is surfaced for them. `ExecutionError` reasons are
    /// authored by the tool itself and are considered user-safe.
    pub fn user_message(&self) -> String {
        match self.kind {
            ErrorKind::NotFound | ErrorKind::InvalidInput => {
                self.kind.to_string()
            }
            ErrorKind::ExecutionError => self.reason().into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_internal_detail() {
        let err = Error::invalid_input()
            .with_reason("missing field `year` at line 1 column 2");
        assert_eq!(err.user_message(), "invalid arguments");
        assert!(err.reason().contains("missing field"));
    }

    #[test]
    fn test_user_message_keeps_tool_authored_reason() {
        let err =
            Error::execution_error().with_reason("the data source is down");
        assert_eq!(err.user_message(), "the data source is down");
    }
}
