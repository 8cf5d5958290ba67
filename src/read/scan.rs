#[cfg(feature = "logging")]
use log::{debug, trace};

use crate::archive;
use crate::error::{Error, ErrorKind, Result};
use crate::read::header::{check_metadata, parse_header, parse_size, MemberHeader};
use crate::read::names::{resolve, NameEncoding, NameTable};
use crate::read::source::{Cursor, Source};
use crate::read::util::pad2;

/// The kind of archive format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ArchiveKind {
    /// There are no special members that indicate the archive format.
    Unknown,
    /// The GNU (or System V) archive format.
    Gnu,
    /// The GNU (or System V) archive format with 64-bit symbol table.
    Gnu64,
    /// The BSD archive format.
    Bsd,
    /// The BSD archive format with 64-bit symbol table.
    ///
    /// This is used for Darwin.
    Bsd64,
}

/// Options for reading an archive.
#[derive(Debug, Default, Clone)]
#[non_exhaustive]
pub struct Options {
    /// Omit symbol tables from the members of the archive.
    ///
    /// This applies to the GNU `/` and `/SYM64/` members, and the BSD
    /// `__.SYMDEF` family of members.
    pub skip_symbol_tables: bool,
    /// Accept members with an invalid timestamp, user ID, group ID or mode.
    ///
    /// The size field is always validated.
    pub lenient_metadata: bool,
}

/// Reads member headers in the order they appear in the source.
///
/// This owns the archive scoped state needed to resolve names.
#[derive(Debug)]
pub(crate) struct Scanner<S> {
    cursor: Cursor<S>,
    options: Options,
    names: NameTable,
    kind: ArchiveKind,
    /// Bounds the member data when the source length is known.
    len: Option<u64>,
    /// The offset of the end of the current member data.
    content_end: u64,
    next_index: usize,
    done: bool,
}

impl<S: Source> Scanner<S> {
    /// Check the archive magic and prepare to read the first header.
    pub(crate) fn new(source: S, len: Option<u64>, options: Options) -> Result<Self> {
        let mut cursor = Cursor::new(source);
        let mut magic = [0; archive::MAGIC.len()];
        if cursor.fill(&mut magic)? != magic.len() || magic != archive::MAGIC {
            return Err(Error::new(ErrorKind::BadMagic, "Unsupported archive identifier"));
        }
        Ok(Scanner {
            content_end: cursor.position(),
            cursor,
            options,
            names: NameTable::default(),
            kind: ArchiveKind::Unknown,
            len,
            next_index: 0,
            done: false,
        })
    }

    #[inline]
    pub(crate) fn kind(&self) -> ArchiveKind {
        self.kind
    }

    #[inline]
    pub(crate) fn cursor_mut(&mut self) -> &mut Cursor<S> {
        &mut self.cursor
    }

    pub(crate) fn into_cursor(self) -> Cursor<S> {
        self.cursor
    }

    /// Read the next member header, skipping over the data of the previous member.
    ///
    /// On success the cursor is positioned at the start of the member data.
    /// Returns `Ok(None)` at the end of the archive. After an error, this
    /// always returns `Ok(None)`.
    pub(crate) fn next_header(&mut self) -> Result<Option<MemberHeader>> {
        if self.done {
            return Ok(None);
        }
        let result = self.next_header_inner();
        if !matches!(result, Ok(Some(_))) {
            self.done = true;
        }
        result
    }

    fn next_header_inner(&mut self) -> Result<Option<MemberHeader>> {
        loop {
            self.skip_to_next_header()?;
            let header_offset = self.cursor.position();
            let raw = match parse_header(&mut self.cursor)? {
                Some(raw) => raw,
                None => return Ok(None),
            };
            let encoding = NameEncoding::classify(&raw.name)?;
            let size = parse_size(&raw)?;
            if encoding.is_file() && !self.options.lenient_metadata {
                check_metadata(&raw)?;
            }
            let content_start = self.cursor.position();
            if let Some(len) = self.len {
                if content_start.checked_add(size).map_or(true, |end| end > len) {
                    return Err(Error::new(
                        ErrorKind::TruncatedMember,
                        "Archive member size is too large",
                    ));
                }
            }
            self.content_end = content_start + size;

            let resolved = resolve(&raw.name, encoding, size, &mut self.cursor, &mut self.names)?;
            let member = MemberHeader {
                raw,
                encoding,
                name: resolved.name,
                index: self.next_index,
                header_offset,
                content_offset: content_start + resolved.consumed,
                size: size - resolved.consumed,
            };
            self.update_kind(&member);

            if encoding == NameEncoding::GnuTableSelf {
                #[cfg(feature = "logging")]
                debug!("Read GNU names table ({} bytes)", size);
                continue;
            }
            if self.options.skip_symbol_tables && member.is_symbol_table() {
                #[cfg(feature = "logging")]
                debug!(
                    "Skipping symbol table {}",
                    String::from_utf8_lossy(&member.name)
                );
                continue;
            }

            #[cfg(feature = "logging")]
            trace!(
                "Member {} {:?} at offset {} size {} ({:?})",
                member.index,
                String::from_utf8_lossy(&member.name),
                member.content_offset,
                member.size,
                member.encoding
            );
            self.next_index += 1;
            return Ok(Some(member));
        }
    }

    /// Move the cursor to the offset of the next header.
    ///
    /// The cursor may already be part way through the current member data.
    fn skip_to_next_header(&mut self) -> Result<()> {
        let next_header = pad2(self.content_end);
        let position = self.cursor.position();
        if position >= next_header {
            return Ok(());
        }
        self.cursor.skip(next_header - position)?;
        // The padding after the last member may be missing.
        if self.cursor.position() >= self.content_end {
            return Ok(());
        }
        Err(Error::new(
            ErrorKind::TruncatedMember,
            "Archive member data is truncated",
        ))
    }

    /// The first special member, or extended name, determines the archive kind.
    fn update_kind(&mut self, member: &MemberHeader) {
        if self.kind != ArchiveKind::Unknown {
            return;
        }
        self.kind = match member.encoding {
            NameEncoding::GnuSymbolTable if member.name == archive::GNU_SYMBOLS_64 => {
                ArchiveKind::Gnu64
            }
            NameEncoding::GnuSymbolTable
            | NameEncoding::GnuTableSelf
            | NameEncoding::GnuTableRef(_) => ArchiveKind::Gnu,
            NameEncoding::Inline | NameEncoding::BsdInline(_) => {
                if archive::BSD_SYMBOLS_64.contains(&&*member.name) {
                    ArchiveKind::Bsd64
                } else if archive::BSD_SYMBOLS.contains(&&*member.name)
                    || matches!(member.encoding, NameEncoding::BsdInline(_))
                {
                    ArchiveKind::Bsd
                } else {
                    ArchiveKind::Unknown
                }
            }
        };
    }
}
