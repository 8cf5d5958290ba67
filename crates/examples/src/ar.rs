use std::io::{self, Read, Seek, Write};

use anyhow::{Context, Result};
use arfile::read::{ArchiveFile, ArchiveStream, MemberHeader};

/// What to do with each selected member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Print the member names.
    List,
    /// Print the member names with their metadata.
    ListVerbose,
    /// Copy the member data to the output.
    Print,
}

impl Operation {
    pub fn parse(op: &str) -> Option<Operation> {
        match op {
            "t" => Some(Operation::List),
            "tv" | "v" => Some(Operation::ListVerbose),
            "p" => Some(Operation::Print),
            _ => None,
        }
    }
}

/// Members are selected by name. All members are selected if no names are given.
fn selected(header: &MemberHeader, names: &[Vec<u8>]) -> bool {
    names.is_empty() || names.iter().any(|name| &**name == header.name())
}

pub fn print_file<R: Read + Seek, W: Write>(
    w: &mut W,
    archive: &ArchiveFile<R>,
    op: Operation,
    names: &[Vec<u8>],
) -> Result<()> {
    for (header, mut reader) in archive {
        if !selected(header, names) {
            continue;
        }
        print_member(w, header, &mut reader, op)?;
    }
    Ok(())
}

pub fn print_stream<R: Read, W: Write>(
    w: &mut W,
    archive: &ArchiveStream<R>,
    op: Operation,
    names: &[Vec<u8>],
) -> Result<()> {
    while let Some(header) = archive.next_header().context("Failed to read member header")? {
        if !selected(&header, names) {
            continue;
        }
        let mut reader = archive.open(&header)?;
        print_member(w, &header, &mut reader, op)?;
    }
    Ok(())
}

fn print_member<W: Write, R: Read>(
    w: &mut W,
    header: &MemberHeader,
    reader: &mut R,
    op: Operation,
) -> Result<()> {
    let name = String::from_utf8_lossy(header.name());
    match op {
        Operation::List => writeln!(w, "{}", name)?,
        Operation::ListVerbose => {
            writeln!(
                w,
                "{} {}/{} {:>8} {} {}",
                mode_string(header.mode()),
                field(header.uid()),
                field(header.gid()),
                header.size(),
                field(header.date()),
                name
            )?;
        }
        Operation::Print => {
            io::copy(reader, w).with_context(|| format!("Failed to read member '{}'", name))?;
        }
    }
    Ok(())
}

fn field(value: Option<u64>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "?".to_string(),
    }
}

/// Format the permission bits in the style of `ls -l`.
fn mode_string(mode: Option<u64>) -> String {
    let mode = match mode {
        Some(mode) => mode,
        None => return "?????????".to_string(),
    };
    let mut s = String::with_capacity(9);
    for shift in [6, 3, 0].iter() {
        let bits = (mode >> shift) & 0o7;
        s.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        s.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        s.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    s
}
