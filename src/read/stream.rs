//! Support for archives read from a source that cannot seek.

use std::cell::RefCell;
use std::convert::TryFrom;
use std::io::{self, Read};

use crate::error::{Error, ErrorKind, Result};
use crate::read::header::MemberHeader;
use crate::read::scan::{ArchiveKind, Options, Scanner};
use crate::read::source::Streaming;

/// An archive that is read in a single forward pass.
///
/// Each member header is returned as soon as it has been read. The data of a
/// member can only be read before the next header is requested, and only by
/// a single reader.
///
/// The source is released when this is dropped.
#[derive(Debug)]
pub struct ArchiveStream<R: Read> {
    state: RefCell<StreamState<R>>,
}

#[derive(Debug)]
struct StreamState<R: Read> {
    scanner: Scanner<Streaming<R>>,
    /// The member whose data the source is positioned in.
    current: Option<Current>,
}

#[derive(Debug, Clone, Copy)]
struct Current {
    index: usize,
    header_offset: u64,
    opened: bool,
}

impl<R: Read> ArchiveStream<R> {
    /// Read the archive header.
    pub fn new(reader: R) -> Result<Self> {
        ArchiveStream::new_with_options(reader, Options::default())
    }

    /// Read the archive header, using the given options for the member headers.
    pub fn new_with_options(reader: R, options: Options) -> Result<Self> {
        let scanner = Scanner::new(Streaming::new(reader), None, options)?;
        Ok(ArchiveStream {
            state: RefCell::new(StreamState {
                scanner,
                current: None,
            }),
        })
    }

    /// Return the archive format, as determined from the members read so far.
    pub fn kind(&self) -> ArchiveKind {
        self.state.borrow().scanner.kind()
    }

    /// Read the next member header.
    ///
    /// Any unread data of the previous member is skipped, and can no longer be read.
    /// Returns `Ok(None)` at the end of the archive, and after any error.
    pub fn next_header(&self) -> Result<Option<MemberHeader>> {
        let mut state = self.state.borrow_mut();
        state.current = None;
        let header = state.scanner.next_header()?;
        state.current = header.as_ref().map(|header| Current {
            index: header.index(),
            header_offset: header.header_offset(),
            opened: false,
        });
        Ok(header)
    }

    /// Open a member for reading.
    ///
    /// This must be the member most recently returned by `next_header`,
    /// and it must not have been opened already.
    pub fn open(&self, header: &MemberHeader) -> Result<StreamMember<'_, R>> {
        let mut state = self.state.borrow_mut();
        match &mut state.current {
            Some(current)
                if current.index == header.index()
                    && current.header_offset == header.header_offset()
                    && !current.opened =>
            {
                current.opened = true;
            }
            _ => {
                return Err(Error::new(
                    ErrorKind::OutOfOrderAccess,
                    "Archive member is not the current member of the stream",
                ))
            }
        }
        Ok(StreamMember {
            archive: self,
            header: header.clone(),
            position: 0,
        })
    }

    /// Read the next member header and open the member for reading.
    pub fn next_member(&self) -> Result<Option<StreamMember<'_, R>>> {
        match self.next_header()? {
            Some(header) => self.open(&header).map(Some),
            None => Ok(None),
        }
    }

    /// Iterate over the members, in the order they appear in the archive.
    ///
    /// Requesting the next member ends the previous one.
    #[inline]
    pub fn members(&self) -> StreamMembers<'_, R> {
        StreamMembers { archive: self }
    }

    /// Release the archive and return the underlying reader.
    ///
    /// The reader is positioned wherever reading of the archive stopped.
    pub fn into_inner(self) -> R {
        self.state
            .into_inner()
            .scanner
            .into_cursor()
            .into_source()
            .into_inner()
    }
}

/// An iterator over the members of an [`ArchiveStream`].
#[derive(Debug)]
pub struct StreamMembers<'a, R: Read> {
    archive: &'a ArchiveStream<R>,
}

impl<'a, R: Read> Iterator for StreamMembers<'a, R> {
    type Item = Result<StreamMember<'a, R>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.archive.next_member().transpose()
    }
}

/// A member of an [`ArchiveStream`], and a reader for its data.
///
/// Reading fails with [`ErrorKind::OutOfOrderAccess`] once the stream has
/// moved on to a later member.
#[derive(Debug)]
pub struct StreamMember<'a, R: Read> {
    archive: &'a ArchiveStream<R>,
    header: MemberHeader,
    position: u64,
}

impl<'a, R: Read> StreamMember<'a, R> {
    /// Return the member header.
    #[inline]
    pub fn header(&self) -> &MemberHeader {
        &self.header
    }

    /// Return the current position within the member data.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<'a, R: Read> Read for StreamMember<'a, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut state = self.archive.state.borrow_mut();
        match state.current {
            Some(current) if current.index == self.header.index() => {}
            _ => {
                return Err(Error::new(
                    ErrorKind::OutOfOrderAccess,
                    "Archive member data has already been skipped",
                )
                .into())
            }
        }
        let remaining = self.header.size().saturating_sub(self.position);
        let len = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        if len == 0 {
            return Ok(0);
        }
        let read = state.scanner.cursor_mut().read(&mut buf[..len])?;
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
