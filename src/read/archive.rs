//! Support for archives stored in a seekable source.

use std::cell::RefCell;
use std::convert::TryFrom;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::slice;

use crate::error::{Error, ErrorKind, ReadError, Result};
use crate::read::header::MemberHeader;
use crate::read::scan::{ArchiveKind, Options, Scanner};
use crate::read::source::{Cursor, Seekable};

/// An archive whose members have all been indexed.
///
/// All member headers are read when the archive is parsed. Member data is
/// only read when requested, by seeking to it.
///
/// The source is released when this is dropped.
#[derive(Debug)]
pub struct ArchiveFile<R: Read + Seek> {
    cursor: RefCell<Cursor<Seekable<R>>>,
    kind: ArchiveKind,
    members: Vec<MemberHeader>,
}

impl ArchiveFile<BufReader<File>> {
    /// Open and parse the archive at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        ArchiveFile::parse(BufReader::new(file))
    }
}

impl<R: Read + Seek> ArchiveFile<R> {
    /// Parse the archive header and all member headers.
    ///
    /// The reader must be positioned at the start of the archive.
    pub fn parse(reader: R) -> Result<Self> {
        ArchiveFile::parse_with_options(reader, Options::default())
    }

    /// Parse the archive header and all member headers, using the given options.
    ///
    /// Fails on the first invalid header; no partial index is returned.
    pub fn parse_with_options(reader: R, options: Options) -> Result<Self> {
        let source = Seekable::new(reader)?;
        let len = source.len();
        let mut scanner = Scanner::new(source, Some(len), options)?;
        let mut members = Vec::new();
        while let Some(member) = scanner.next_header()? {
            members.push(member);
        }
        Ok(ArchiveFile {
            kind: scanner.kind(),
            cursor: RefCell::new(scanner.into_cursor()),
            members,
        })
    }

    /// Return the archive format.
    #[inline]
    pub fn kind(&self) -> ArchiveKind {
        self.kind
    }

    /// Return the headers of all members, in the order they appear in the archive.
    ///
    /// The GNU names table is not included.
    #[inline]
    pub fn members(&self) -> &[MemberHeader] {
        &self.members
    }

    /// Return the number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Return true if the archive has no members.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Return the headers of all members with the given name.
    ///
    /// Archives may contain multiple members with the same name.
    pub fn by_name<'a>(&'a self, name: &'a [u8]) -> impl Iterator<Item = &'a MemberHeader> + 'a {
        self.members.iter().filter(move |member| member.name() == name)
    }

    /// Return the header of the first member with the given name.
    pub fn member_by_name(&self, name: &[u8]) -> Option<&MemberHeader> {
        self.members.iter().find(|member| member.name() == name)
    }

    /// Open a member for reading.
    ///
    /// The header must be one returned by this archive.
    pub fn open_member(&self, header: &MemberHeader) -> Result<MemberReader<'_, R>> {
        let header = self
            .members
            .get(header.index())
            .filter(|member| *member == header)
            .read_error(ErrorKind::UnknownMember, "Member is not part of this archive")?;
        Ok(MemberReader::new(&self.cursor, header))
    }

    /// Open the first member with the given name for reading.
    pub fn open_by_name(&self, name: &[u8]) -> Result<MemberReader<'_, R>> {
        let header = self
            .member_by_name(name)
            .read_error(ErrorKind::UnknownMember, "No archive member has this name")?;
        Ok(MemberReader::new(&self.cursor, header))
    }

    /// Read all of the data of a member.
    pub fn data(&self, header: &MemberHeader) -> Result<Vec<u8>> {
        let mut reader = self.open_member(header)?;
        let capacity = usize::try_from(header.size()).unwrap_or(0);
        let mut data = Vec::with_capacity(capacity);
        reader.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Iterate over the members, in the order they appear in the archive.
    #[inline]
    pub fn iter(&self) -> Members<'_, R> {
        Members {
            cursor: &self.cursor,
            iter: self.members.iter(),
        }
    }

    /// Release the archive and return the underlying reader.
    pub fn into_inner(self) -> R {
        self.cursor.into_inner().into_source().into_inner()
    }
}

impl<'a, R: Read + Seek> IntoIterator for &'a ArchiveFile<R> {
    type Item = (&'a MemberHeader, MemberReader<'a, R>);
    type IntoIter = Members<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the members of an [`ArchiveFile`].
///
/// Yields each member header together with a reader for its data.
#[derive(Debug)]
pub struct Members<'a, R: Read + Seek> {
    cursor: &'a RefCell<Cursor<Seekable<R>>>,
    iter: slice::Iter<'a, MemberHeader>,
}

impl<'a, R: Read + Seek> Iterator for Members<'a, R> {
    type Item = (&'a MemberHeader, MemberReader<'a, R>);

    fn next(&mut self) -> Option<Self::Item> {
        let header = self.iter.next()?;
        Some((header, MemberReader::new(self.cursor, header)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// A reader for the data of a single member of an [`ArchiveFile`].
///
/// Reads never extend past the end of the member. Several readers for the
/// same archive may be used alternately; each seeks to its own position
/// before reading.
#[derive(Debug)]
pub struct MemberReader<'a, R: Read + Seek> {
    cursor: &'a RefCell<Cursor<Seekable<R>>>,
    offset: u64,
    size: u64,
    position: u64,
}

impl<'a, R: Read + Seek> MemberReader<'a, R> {
    fn new(cursor: &'a RefCell<Cursor<Seekable<R>>>, header: &MemberHeader) -> Self {
        MemberReader {
            cursor,
            offset: header.content_offset(),
            size: header.size(),
            position: 0,
        }
    }

    /// Return the size of the member data.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Return the current position within the member data.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<'a, R: Read + Seek> Read for MemberReader<'a, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.size.saturating_sub(self.position);
        let len = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        if len == 0 {
            return Ok(0);
        }
        let mut cursor = self.cursor.borrow_mut();
        cursor.seek_to(self.offset + self.position)?;
        let read = cursor.read(&mut buf[..len])?;
        if read == 0 {
            return Err(Error::new(
                ErrorKind::TruncatedMember,
                "Archive member data is truncated",
            )
            .into());
        }
        self.position += read as u64;
        Ok(read)
    }
}

impl<'a, R: Read + Seek> Seek for MemberReader<'a, R> {
    /// Seek within the member data.
    ///
    /// Positions before the start or after the end of the member are invalid.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let position = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => offset_by(self.position, delta),
            SeekFrom::End(delta) => offset_by(self.size, delta),
        };
        match position {
            Some(position) if position <= self.size => {
                self.position = position;
                Ok(position)
            }
            _ => Err(Error::new(
                ErrorKind::ReadPastEnd,
                "Seek to a position outside the archive member",
            )
            .into()),
        }
    }
}

fn offset_by(base: u64, delta: i64) -> Option<u64> {
    if delta < 0 {
        base.checked_sub(delta.unsigned_abs())
    } else {
        base.checked_add(delta as u64)
    }
}
