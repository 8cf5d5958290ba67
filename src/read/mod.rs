//! Interface for reading archives.
//!
//! There are two ways to read an archive, and the caller chooses between them
//! based on the source:
//!
//! - [`ArchiveFile`] requires a seekable source. All member headers are read
//!   up front, and members can then be looked up by name and read in any order.
//! - [`ArchiveStream`] accepts any reader. Members are returned one at a time
//!   in archive order, and each member can only be read before moving on to
//!   the next one.
//!
//! Both support the GNU and BSD variants of the format, including extended names.

mod util;

mod source;
pub use source::{Seekable, Source, Streaming};

mod names;
pub use names::NameEncoding;

mod header;
pub use header::MemberHeader;

mod scan;
pub use scan::{ArchiveKind, Options};

mod archive;
pub use archive::{ArchiveFile, MemberReader, Members};

mod stream;
pub use stream::{ArchiveStream, StreamMember, StreamMembers};

pub use crate::error::{Error, ErrorKind, Result};
