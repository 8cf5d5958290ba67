//! # `arfile`
//!
//! The `arfile` crate reads `ar` archives, the container format used for
//! static libraries, in both the GNU (System V) and BSD variants.
//!
//! Member headers are parsed and extended names are resolved, but member data
//! is never loaded until it is requested. Archives can be read from a seekable
//! source with random access to the members, or from any reader in a single
//! forward pass.
//!
//! ## Example
//! ```no_run
//! use std::io::Read;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let archive = arfile::ArchiveFile::open("path/to/libfoo.a")?;
//!     for (header, mut reader) in &archive {
//!         let mut data = Vec::new();
//!         reader.read_to_end(&mut data)?;
//!         println!("{}: {} bytes", String::from_utf8_lossy(header.name()), data.len());
//!     }
//!
//!     let stream = arfile::ArchiveStream::new(std::io::stdin().lock())?;
//!     while let Some(member) = stream.next_member()? {
//!         println!("{}", String::from_utf8_lossy(member.header().name()));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `logging`: emit `log` records while reading member headers.

#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod archive;

mod error;
pub use error::{Error, ErrorKind, Result};

pub mod read;
pub use read::{
    ArchiveFile, ArchiveKind, ArchiveStream, MemberHeader, MemberReader, NameEncoding, Options,
    StreamMember,
};
