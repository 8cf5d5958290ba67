use std::convert::TryFrom;
use std::io::{self, Read, Seek, SeekFrom};

/// A byte source that an archive is read from.
///
/// Sources are always read sequentially. Moving forward over data that is not
/// needed is delegated to the source so that seekable sources can avoid reading it.
pub trait Source: Read {
    /// Move forward by `count` bytes.
    ///
    /// Returns the number of bytes skipped, which is less than `count`
    /// only if the end of the source was reached.
    fn skip(&mut self, count: u64) -> io::Result<u64>;
}

/// A source that supports random access.
///
/// Used by [`ArchiveFile`](crate::read::ArchiveFile).
#[derive(Debug)]
pub struct Seekable<R> {
    inner: R,
    start: u64,
    len: u64,
}

impl<R: Read + Seek> Seekable<R> {
    /// Wrap a seekable reader, which must be positioned at the start of the archive.
    pub fn new(mut inner: R) -> io::Result<Self> {
        let start = inner.stream_position()?;
        let end = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(start))?;
        Ok(Seekable {
            inner,
            start,
            len: end.saturating_sub(start),
        })
    }

    /// The length of the archive in bytes.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Return true if the archive is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for Seekable<R> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Seek> Source for Seekable<R> {
    fn skip(&mut self, count: u64) -> io::Result<u64> {
        let offset = i64::try_from(count)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "skip is too large"))?;
        self.inner.seek(SeekFrom::Current(offset))?;
        Ok(count)
    }
}

/// A source that can only be read once, in order.
///
/// Data is skipped by reading and discarding it. Used by
/// [`ArchiveStream`](crate::read::ArchiveStream).
#[derive(Debug)]
pub struct Streaming<R> {
    inner: R,
}

impl<R: Read> Streaming<R> {
    /// Wrap a reader, which must be positioned at the start of the archive.
    pub fn new(inner: R) -> Self {
        Streaming { inner }
    }

    /// Return the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for Streaming<R> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read> Source for Streaming<R> {
    fn skip(&mut self, count: u64) -> io::Result<u64> {
        io::copy(&mut (&mut self.inner).take(count), &mut io::sink())
    }
}

/// A source together with the absolute offset of the next byte to be read.
#[derive(Debug)]
pub(crate) struct Cursor<S> {
    source: S,
    position: u64,
}

impl<S: Source> Cursor<S> {
    pub(crate) fn new(source: S) -> Self {
        Cursor {
            source,
            position: 0,
        }
    }

    #[inline]
    pub(crate) fn position(&self) -> u64 {
        self.position
    }

    pub(crate) fn into_source(self) -> S {
        self.source
    }

    /// Read until `buf` is full or the source ends.
    ///
    /// Returns the number of bytes read.
    pub(crate) fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.source.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }

    /// Read at most `buf.len()` bytes.
    pub(crate) fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.source.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    /// Read up to `len` bytes into a new buffer.
    ///
    /// The buffer grows with the data read, not with `len`.
    pub(crate) fn read_to_vec(&mut self, len: u64) -> io::Result<Vec<u8>> {
        let mut data = Vec::new();
        let n = (&mut self.source).take(len).read_to_end(&mut data)?;
        self.position += n as u64;
        Ok(data)
    }

    pub(crate) fn skip(&mut self, count: u64) -> io::Result<u64> {
        let skipped = self.source.skip(count)?;
        self.position += skipped;
        Ok(skipped)
    }
}

impl<R: Read + Seek> Cursor<Seekable<R>> {
    pub(crate) fn seek_to(&mut self, position: u64) -> io::Result<()> {
        if position != self.position {
            let start = self.source.start;
            self.source.inner.seek(SeekFrom::Start(start + position))?;
            self.position = position;
        }
        Ok(())
    }
}
