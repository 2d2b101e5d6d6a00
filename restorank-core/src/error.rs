//! Classification shared by every error that crosses the core boundary.
//!
//! Transport layers map an [`ErrorKind`] onto their own status vocabulary
//! instead of inspecting error messages.

use std::fmt;

/// Broad category of a failure.
///
/// # Examples
/// ```
/// use restorank_core::ErrorKind;
///
/// assert_eq!(ErrorKind::InvalidInput.status_code(), 400);
/// assert_eq!(ErrorKind::NotFound.to_string(), "not found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller supplied a value that can never succeed as given.
    InvalidInput,
    /// The referenced record does not exist.
    NotFound,
    /// A backing resource could not be reached or opened.
    Unavailable,
    /// The backing data or driver misbehaved.
    Internal,
}

impl ErrorKind {
    /// HTTP status code a transport layer should answer with.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::NotFound => 404,
            Self::Unavailable => 503,
            Self::Internal => 500,
        }
    }

    /// Whether the failure is the caller's fault.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        matches!(self, Self::InvalidInput | Self::NotFound)
    }

    /// Return the kind as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid input",
            Self::NotFound => "not found",
            Self::Unavailable => "unavailable",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
