//! Member name decoding.
//!
//! The 16 byte name field of a member header either holds the name itself, or
//! indicates where the name can be found. GNU archives store long names in a
//! names table member and refer to them by offset. BSD archives store long
//! names at the start of the member data.

use std::convert::TryFrom;

use crate::archive;
use crate::error::{Error, ErrorKind, ReadError, Result};
use crate::read::source::{Cursor, Source};
use crate::read::util::{parse_u64_digits, trim_spaces};

/// The way that a member name is encoded in its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameEncoding {
    /// The name is stored in the header, optionally terminated by `/`.
    Inline,
    /// The name is stored in the GNU names table at the given offset.
    GnuTableRef(u64),
    /// The member is the GNU names table.
    GnuTableSelf,
    /// The member is a GNU symbol table (`/` or `/SYM64/`).
    GnuSymbolTable,
    /// The name is stored at the start of the member data, with the given length.
    BsdInline(u64),
}

impl NameEncoding {
    /// Classify the raw name field of a member header.
    pub fn classify(name: &[u8; 16]) -> Result<NameEncoding> {
        let trimmed = trim_spaces(name);
        if trimmed == archive::GNU_NAMES {
            Ok(NameEncoding::GnuTableSelf)
        } else if trimmed == archive::GNU_SYMBOLS || trimmed == archive::GNU_SYMBOLS_64 {
            Ok(NameEncoding::GnuSymbolTable)
        } else if name[0] == b'/' && name[1].is_ascii_digit() {
            parse_u64_digits(&name[1..], 10)
                .map(NameEncoding::GnuTableRef)
                .read_error(ErrorKind::MalformedField, "Invalid GNU extended name offset")
        } else if name.starts_with(archive::BSD_NAME_PREFIX) {
            parse_u64_digits(&name[archive::BSD_NAME_PREFIX.len()..], 10)
                .map(NameEncoding::BsdInline)
                .read_error(ErrorKind::MalformedField, "Invalid BSD extended name length")
        } else {
            Ok(NameEncoding::Inline)
        }
    }

    /// Return true if the member holds a regular file rather than archive metadata.
    #[inline]
    pub fn is_file(self) -> bool {
        match self {
            NameEncoding::Inline | NameEncoding::GnuTableRef(_) | NameEncoding::BsdInline(_) => {
                true
            }
            NameEncoding::GnuTableSelf | NameEncoding::GnuSymbolTable => false,
        }
    }
}

/// The GNU extended names table of an archive.
///
/// This is empty until the names table member has been read.
#[derive(Debug, Default)]
pub(crate) struct NameTable {
    data: Option<Vec<u8>>,
}

impl NameTable {
    /// Look up the name starting at `offset`.
    ///
    /// The name ends at the next newline or NUL, and a trailing `/` is removed.
    pub(crate) fn name_at(&self, offset: u64) -> Result<&[u8]> {
        let data = self.data.as_deref().read_error(
            ErrorKind::MissingNameTable,
            "GNU extended name used without a names table",
        )?;
        let offset = usize::try_from(offset)
            .ok()
            .filter(|&offset| offset < data.len())
            .read_error(
                ErrorKind::NameOffsetOutOfRange,
                "GNU extended name offset is past the end of the names table",
            )?;
        if offset > 0 && !matches!(data[offset - 1], b'\n' | b'\0') {
            return Err(Error::new(
                ErrorKind::NameOffsetOutOfRange,
                "GNU extended name offset is not at the start of a name",
            ));
        }
        let name = &data[offset..];
        let name = match memchr::memchr2(b'\n', b'\0', name) {
            Some(end) => &name[..end],
            None => name,
        };
        Ok(name.strip_suffix(b"/").unwrap_or(name))
    }
}

/// A decoded member name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedName {
    pub name: Vec<u8>,
    /// The number of bytes of member data consumed while resolving the name.
    ///
    /// The member data starts this many bytes later than the end of the header,
    /// and is this many bytes shorter than the header size.
    pub consumed: u64,
}

/// Decode the name of a member whose header has just been read.
///
/// `cursor` must be positioned at the start of the member data, and `size` is
/// the data size given in the header. The names table member is loaded into `table`.
pub(crate) fn resolve<S: Source>(
    raw_name: &[u8; 16],
    encoding: NameEncoding,
    size: u64,
    cursor: &mut Cursor<S>,
    table: &mut NameTable,
) -> Result<ResolvedName> {
    match encoding {
        NameEncoding::Inline => Ok(ResolvedName {
            name: inline_name(raw_name).to_vec(),
            consumed: 0,
        }),
        NameEncoding::GnuSymbolTable => Ok(ResolvedName {
            name: trim_spaces(raw_name).to_vec(),
            consumed: 0,
        }),
        NameEncoding::GnuTableRef(offset) => Ok(ResolvedName {
            name: table.name_at(offset)?.to_vec(),
            consumed: 0,
        }),
        NameEncoding::GnuTableSelf => {
            let data = read_exact(cursor, size, "GNU names table is truncated")?;
            table.data = Some(data);
            Ok(ResolvedName {
                name: archive::GNU_NAMES.to_vec(),
                consumed: size,
            })
        }
        NameEncoding::BsdInline(len) => {
            if len > size {
                return Err(Error::new(
                    ErrorKind::MalformedField,
                    "BSD extended name is longer than the member",
                ));
            }
            let mut name = read_exact(cursor, len, "BSD extended name is truncated")?;
            // Names are padded with NULs for alignment.
            let end = memchr::memchr(b'\0', &name).unwrap_or(name.len());
            name.truncate(end);
            Ok(ResolvedName {
                name,
                consumed: len,
            })
        }
    }
}

/// Trim the padding and GNU `/` terminator from a name stored in the header.
fn inline_name(raw_name: &[u8; 16]) -> &[u8] {
    let name = trim_spaces(raw_name);
    name.strip_suffix(b"/").unwrap_or(name)
}

fn read_exact<S: Source>(
    cursor: &mut Cursor<S>,
    len: u64,
    message: &'static str,
) -> Result<Vec<u8>> {
    let data = cursor.read_to_vec(len)?;
    if data.len() as u64 != len {
        return Err(Error::new(ErrorKind::TruncatedMember, message));
    }
    Ok(data)
}
