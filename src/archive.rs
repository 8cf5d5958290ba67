//! Archive definitions.
//!
//! These definitions are independent of read support, and describe the on-disk
//! layout shared by the GNU and BSD variants of the format.

/// File identification bytes stored at the beginning of the file.
pub const MAGIC: [u8; 8] = *b"!<arch>\n";

/// The terminator for each archive member header.
pub const TERMINATOR: [u8; 2] = *b"`\n";

/// The size in bytes of a member header.
pub const HEADER_SIZE: usize = 60;

/// The name of the GNU extended names table member.
pub const GNU_NAMES: &[u8] = b"//";

/// The name of the GNU symbol table member.
pub const GNU_SYMBOLS: &[u8] = b"/";

/// The name of the GNU 64-bit symbol table member.
pub const GNU_SYMBOLS_64: &[u8] = b"/SYM64/";

/// The prefix of a BSD extended name.
///
/// The decimal length of the name follows the prefix, and the name itself
/// is stored at the start of the member data.
pub const BSD_NAME_PREFIX: &[u8] = b"#1/";

/// The names used by BSD symbol table members.
pub const BSD_SYMBOLS: [&[u8]; 2] = [b"__.SYMDEF", b"__.SYMDEF SORTED"];

/// The names used by BSD 64-bit symbol table members.
pub const BSD_SYMBOLS_64: [&[u8]; 2] = [b"__.SYMDEF_64", b"__.SYMDEF_64 SORTED"];

/// The header at the start of an archive member.
///
/// All fields are fixed width ASCII, padded with spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// The file name.
    pub name: [u8; 16],
    /// File modification timestamp in decimal.
    pub date: [u8; 12],
    /// User ID in decimal.
    pub uid: [u8; 6],
    /// Group ID in decimal.
    pub gid: [u8; 6],
    /// File mode in octal.
    pub mode: [u8; 8],
    /// File size in decimal.
    pub size: [u8; 10],
    /// Must be equal to `TERMINATOR`.
    pub terminator: [u8; 2],
}

impl Header {
    /// Split the raw bytes of a member header into its fields.
    ///
    /// This performs no validation.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let mut offset = 0;
        Header {
            name: field(bytes, &mut offset),
            date: field(bytes, &mut offset),
            uid: field(bytes, &mut offset),
            gid: field(bytes, &mut offset),
            mode: field(bytes, &mut offset),
            size: field(bytes, &mut offset),
            terminator: field(bytes, &mut offset),
        }
    }

    /// Return true if the header ends with `TERMINATOR`.
    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.terminator == TERMINATOR
    }
}

fn field<const N: usize>(bytes: &[u8; HEADER_SIZE], offset: &mut usize) -> [u8; N] {
    let mut out = [0; N];
    out.copy_from_slice(&bytes[*offset..*offset + N]);
    *offset += N;
    out
}
