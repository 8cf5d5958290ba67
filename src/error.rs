use std::{error, fmt, io, result};

/// The error type used by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
}

/// The kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The source does not start with the archive signature.
    BadMagic,
    /// The source ended part way through a member header.
    TruncatedHeader,
    /// A member header does not end with the header terminator.
    BadHeaderTrailer,
    /// A numeric or extended name field could not be parsed.
    MalformedField,
    /// A GNU extended name was used before any names table.
    MissingNameTable,
    /// A GNU extended name offset does not refer to an entry in the names table.
    NameOffsetOutOfRange,
    /// The source ended before the end of a member's data.
    TruncatedMember,
    /// A member of a streamed archive was read out of order, or opened twice.
    OutOfOrderAccess,
    /// A member header does not belong to the archive, or no member has the requested name.
    UnknownMember,
    /// A seek or read extended beyond the end of a member.
    ///
    /// Reads are truncated at the end of a member, so this is only reported for seeks.
    ReadPastEnd,
    /// An I/O error occurred while reading the source.
    Io(io::ErrorKind),
}

impl Error {
    #[inline]
    pub(crate) fn new(kind: ErrorKind, message: &'static str) -> Self {
        Error { kind, message }
    }

    /// Get the kind of error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Recover an archive error that was returned through a `std::io::Read` implementation.
    ///
    /// Member readers report archive errors as `io::Error`s wrapping this type.
    pub fn from_io(error: &io::Error) -> Option<&Error> {
        error.get_ref()?.downcast_ref::<Error>()
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Io(kind) => write!(f, "{}: {}", self.message, io::Error::from(kind)),
            _ => f.write_str(self.message),
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        if let Some(inner) = Error::from_io(&error) {
            return inner.clone();
        }
        match error.kind() {
            io::ErrorKind::UnexpectedEof => {
                Error::new(ErrorKind::TruncatedMember, "Unexpected end of archive")
            }
            kind => Error::new(ErrorKind::Io(kind), "Failed to read archive"),
        }
    }
}

impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        let kind = match error.kind {
            ErrorKind::Io(kind) => kind,
            ErrorKind::TruncatedMember | ErrorKind::TruncatedHeader => {
                io::ErrorKind::UnexpectedEof
            }
            ErrorKind::ReadPastEnd => io::ErrorKind::InvalidInput,
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, error)
    }
}

/// The result type used within this crate.
pub type Result<T> = result::Result<T, Error>;

pub(crate) trait ReadError<T> {
    fn read_error(self, kind: ErrorKind, message: &'static str) -> Result<T>;
}

impl<T> ReadError<T> for result::Result<T, ()> {
    fn read_error(self, kind: ErrorKind, message: &'static str) -> Result<T> {
        self.map_err(|()| Error::new(kind, message))
    }
}

impl<T> ReadError<T> for Option<T> {
    fn read_error(self, kind: ErrorKind, message: &'static str) -> Result<T> {
        self.ok_or(Error::new(kind, message))
    }
}
