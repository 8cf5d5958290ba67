use crate::archive::{self, Header};
use crate::error::{Error, ErrorKind, ReadError, Result};
use crate::read::names::NameEncoding;
use crate::read::source::{Cursor, Source};
use crate::read::util::parse_u64_digits;

/// Read the next member header.
///
/// Returns `Ok(None)` if the source ends exactly at the header boundary.
pub(crate) fn parse_header<S: Source>(cursor: &mut Cursor<S>) -> Result<Option<Header>> {
    let mut bytes = [0; archive::HEADER_SIZE];
    match cursor.fill(&mut bytes)? {
        0 => return Ok(None),
        archive::HEADER_SIZE => {}
        _ => {
            return Err(Error::new(
                ErrorKind::TruncatedHeader,
                "Archive member header is truncated",
            ))
        }
    }
    let header = Header::from_bytes(&bytes);
    if !header.is_terminated() {
        return Err(Error::new(
            ErrorKind::BadHeaderTrailer,
            "Invalid archive member terminator",
        ));
    }
    Ok(Some(header))
}

/// Parse the data size from a member header.
pub(crate) fn parse_size(header: &Header) -> Result<u64> {
    parse_u64_digits(&header.size, 10)
        .read_error(ErrorKind::MalformedField, "Invalid archive member size")
}

/// Check that the metadata fields of a file member are numeric.
pub(crate) fn check_metadata(header: &Header) -> Result<()> {
    let fields: [(&[u8], u32, &'static str); 4] = [
        (&header.date, 10, "Invalid archive member timestamp"),
        (&header.uid, 10, "Invalid archive member user ID"),
        (&header.gid, 10, "Invalid archive member group ID"),
        (&header.mode, 8, "Invalid archive member mode"),
    ];
    for &(digits, radix, message) in fields.iter() {
        parse_u64_digits(digits, radix).read_error(ErrorKind::MalformedField, message)?;
    }
    Ok(())
}

/// The resolved header of an archive member.
///
/// The header identifies a single member, even when several members have
/// the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberHeader {
    pub(crate) raw: Header,
    pub(crate) encoding: NameEncoding,
    pub(crate) name: Vec<u8>,
    pub(crate) index: usize,
    pub(crate) header_offset: u64,
    pub(crate) content_offset: u64,
    pub(crate) size: u64,
}

impl MemberHeader {
    /// Return the raw header.
    #[inline]
    pub fn raw(&self) -> &Header {
        &self.raw
    }

    /// Return the way the name was encoded in the header.
    #[inline]
    pub fn encoding(&self) -> NameEncoding {
        self.encoding
    }

    /// Return the decoded member name.
    ///
    /// This may be an extended name.
    #[inline]
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Return the position of this member among the members of the archive.
    ///
    /// The names table is not counted.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Return the offset of the header from the start of the archive.
    #[inline]
    pub fn header_offset(&self) -> u64 {
        self.header_offset
    }

    /// Return the offset of the member data from the start of the archive.
    ///
    /// For BSD extended names, this is after the name.
    #[inline]
    pub fn content_offset(&self) -> u64 {
        self.content_offset
    }

    /// Return the size of the member data.
    ///
    /// For BSD extended names, this excludes the name.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Return true if this is a symbol table rather than a file.
    pub fn is_symbol_table(&self) -> bool {
        match self.encoding {
            NameEncoding::GnuSymbolTable => true,
            NameEncoding::Inline | NameEncoding::BsdInline(_) => {
                let name = &*self.name;
                archive::BSD_SYMBOLS
                    .iter()
                    .chain(archive::BSD_SYMBOLS_64.iter())
                    .any(|&symbols| symbols == name)
            }
            _ => false,
        }
    }

    /// Parse the file modification timestamp from the header.
    #[inline]
    pub fn date(&self) -> Option<u64> {
        parse_u64_digits(&self.raw.date, 10)
    }

    /// Parse the user ID from the header.
    #[inline]
    pub fn uid(&self) -> Option<u64> {
        parse_u64_digits(&self.raw.uid, 10)
    }

    /// Parse the group ID from the header.
    #[inline]
    pub fn gid(&self) -> Option<u64> {
        parse_u64_digits(&self.raw.gid, 10)
    }

    /// Parse the file mode from the header.
    #[inline]
    pub fn mode(&self) -> Option<u64> {
        parse_u64_digits(&self.raw.mode, 8)
    }
}
