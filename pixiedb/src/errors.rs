use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for PixieDB operations.
///
/// Codec and model errors are always surfaced to the caller. The store façade
/// isolates per-file decode errors during directory scans and reports them in a
/// [`crate::store::ScanReport`] instead of failing the whole scan.
///
/// # Examples
///
/// ```rust
/// use pixiedb::errors::{ErrorKind, PixieError, PixieResult};
///
/// fn example() -> PixieResult<()> {
///     Err(PixieError::new("Collection not found", ErrorKind::NotFound))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::NotFound);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Encode errors
    /// A value that cannot be represented on the wire (non-string map key,
    /// unrecognized native type)
    UnsupportedValueType,
    /// A value is too large for its 4-byte length prefix
    EncodingError,

    // Decode errors
    /// Type tag byte is unknown or reserved
    UnknownTypeTag,
    /// A read ran past the end of the input
    TruncatedInput,
    /// Input is structurally invalid (bad UTF-8, length prefix mismatch, bad magic, ...)
    MalformedInput,
    /// File header carries a format version this build cannot read
    UnsupportedFormatVersion,

    // Model and store errors
    /// Attempt to persist a collection that is owned by a document
    OwnershipViolation,
    /// The requested collection was not found
    NotFound,
    /// The operation is not valid in the current context
    InvalidOperation,

    // IO errors
    /// Generic IO error
    IOError,
    /// The file was not found
    FileNotFound,
    /// Permission denied for file operation
    PermissionDenied,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::UnsupportedValueType => write!(f, "Unsupported value type"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::UnknownTypeTag => write!(f, "Unknown type tag"),
            ErrorKind::TruncatedInput => write!(f, "Truncated input"),
            ErrorKind::MalformedInput => write!(f, "Malformed input"),
            ErrorKind::UnsupportedFormatVersion => write!(f, "Unsupported format version"),
            ErrorKind::OwnershipViolation => write!(f, "Ownership violation"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom PixieDB error type.
///
/// `PixieError` carries a message, an [ErrorKind] and an optional cause. The
/// backtrace of the error site is captured for `Debug` output.
///
/// ```rust
/// use pixiedb::errors::{ErrorKind, PixieError};
///
/// let cause = PixieError::new("unexpected end of input", ErrorKind::TruncatedInput);
/// let err = PixieError::new_with_cause("Failed to load users", ErrorKind::TruncatedInput, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct PixieError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<PixieError>>,
    backtrace: Atomic<Backtrace>,
}

impl PixieError {
    /// Creates a new `PixieError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        PixieError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `PixieError` wrapping the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: PixieError) -> Self {
        PixieError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&PixieError> {
        self.cause.as_deref()
    }
}

impl Display for PixieError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for PixieError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for PixieError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for PixieDB operations.
pub type PixieResult<T> = Result<T, PixieError>;

impl From<std::io::Error> for PixieError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IOError,
        };
        PixieError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<std::string::FromUtf8Error> for PixieError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        PixieError::new(
            &format!("Invalid UTF-8 sequence: {}", err),
            ErrorKind::MalformedInput,
        )
    }
}

impl From<std::str::Utf8Error> for PixieError {
    fn from(err: std::str::Utf8Error) -> Self {
        PixieError::new(
            &format!("Invalid UTF-8 sequence: {}", err),
            ErrorKind::MalformedInput,
        )
    }
}
