use std::io::Cursor;

use arfile::read::{ArchiveFile, ArchiveStream, ErrorKind, Options};

use super::{header, Builder, NonSeekable};

fn parse_error(data: &[u8]) -> ErrorKind {
    ArchiveFile::parse(Cursor::new(data)).unwrap_err().kind()
}

fn stream_error(data: &[u8]) -> ErrorKind {
    let archive = match ArchiveStream::new(NonSeekable(data)) {
        Ok(archive) => archive,
        Err(err) => return err.kind(),
    };
    loop {
        match archive.next_header() {
            Ok(Some(_)) => {}
            Ok(None) => panic!("archive parsed without error"),
            Err(err) => return err.kind(),
        }
    }
}

fn both_error(data: &[u8]) -> ErrorKind {
    let kind = parse_error(data);
    assert_eq!(stream_error(data), kind);
    kind
}

#[test]
fn bad_magic() {
    assert_eq!(both_error(b""), ErrorKind::BadMagic);
    assert_eq!(both_error(b"!<archive\n"), ErrorKind::BadMagic);
    assert_eq!(both_error(b"!<thin>\n"), ErrorKind::BadMagic);
}

#[test]
fn bad_trailer() {
    let mut data = Builder::new().gnu(b"a.o", b"aa").build();
    let mut bad = header(b"b.o/", 2);
    bad[58..].copy_from_slice(b"``");
    data.extend(bad);
    data.extend_from_slice(b"bb");
    assert_eq!(both_error(&data), ErrorKind::BadHeaderTrailer);
}

#[test]
fn truncated_header() {
    let mut data = Builder::new().gnu(b"a.o", b"aa").build();
    data.extend_from_slice(&header(b"b.o/", 2)[..30]);
    assert_eq!(both_error(&data), ErrorKind::TruncatedHeader);
}

#[test]
fn malformed_size() {
    let mut bad = header(b"a.o/", 2);
    bad[48..51].copy_from_slice(b"2x ");
    let mut data = Builder::new().build();
    data.extend(bad);
    data.extend_from_slice(b"aa");
    assert_eq!(both_error(&data), ErrorKind::MalformedField);

    let mut options = Options::default();
    options.lenient_metadata = true;
    let err = ArchiveFile::parse_with_options(Cursor::new(&data), options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedField);
}

#[test]
fn malformed_metadata() {
    let mut bad = header(b"a.o/", 2);
    bad[16..19].copy_from_slice(b"abc");
    let mut data = Builder::new().build();
    data.extend(bad);
    data.extend_from_slice(b"aa");
    assert_eq!(both_error(&data), ErrorKind::MalformedField);

    let mut bad = header(b"a.o/", 2);
    bad[40..48].copy_from_slice(b"100699  ");
    let mut data = Builder::new().build();
    data.extend(bad);
    data.extend_from_slice(b"aa");
    assert_eq!(both_error(&data), ErrorKind::MalformedField);

    let mut options = Options::default();
    options.lenient_metadata = true;
    let archive = ArchiveFile::parse_with_options(Cursor::new(&data), options).unwrap();
    let member = &archive.members()[0];
    assert_eq!(member.name(), b"a.o");
    assert_eq!(member.mode(), None);
    assert_eq!(member.date(), Some(1297730011));
    assert_eq!(archive.data(member).unwrap(), b"aa");
}

#[test]
fn truncated_names_table() {
    let mut data = Builder::new().build();
    data.extend(header(b"//", 10));
    data.extend_from_slice(b"abc");
    assert_eq!(both_error(&data), ErrorKind::TruncatedMember);
}

#[test]
fn names_table_offset() {
    let (builder, _) = Builder::new().gnu_names(&[&b"long_name_number_one.o"[..]]);
    let data = builder.raw(b"/90", b"x").build();
    assert_eq!(both_error(&data), ErrorKind::NameOffsetOutOfRange);

    let (builder, _) = Builder::new().gnu_names(&[&b"long_name_number_one.o"[..]]);
    let data = builder.raw(b"/3", b"x").build();
    assert_eq!(both_error(&data), ErrorKind::NameOffsetOutOfRange);

    let data = Builder::new()
        .raw(b"//", b"")
        .raw(b"/9", b"x")
        .build();
    assert_eq!(both_error(&data), ErrorKind::NameOffsetOutOfRange);
}

#[test]
fn missing_names_table() {
    let data = Builder::new()
        .gnu(b"a.o", b"a")
        .raw(b"/0", b"x")
        .build();
    assert_eq!(both_error(&data), ErrorKind::MissingNameTable);
}

#[test]
fn malformed_name_reference() {
    let data = Builder::new().raw(b"/12x", b"x").build();
    assert_eq!(both_error(&data), ErrorKind::MalformedField);

    let data = Builder::new().raw(b"#1/x", b"x").build();
    assert_eq!(both_error(&data), ErrorKind::MalformedField);
}

#[test]
fn truncated_member() {
    let mut data = Builder::new()
        .gnu(b"a.o", b"aaaa")
        .gnu(b"b.o", b"bbbbbbbb")
        .build();
    data.truncate(data.len() - 1);
    assert_eq!(parse_error(&data), ErrorKind::TruncatedMember);
}

#[test]
fn bsd_name_too_long() {
    let mut data = Builder::new().build();
    data.extend(header(b"#1/20", 4));
    data.extend_from_slice(b"name");
    assert_eq!(both_error(&data), ErrorKind::MalformedField);
}

#[test]
fn unknown_member() {
    let data = Builder::new().gnu(b"a.o", b"a").build();
    let archive = ArchiveFile::parse(Cursor::new(&data)).unwrap();
    let err = archive.open_by_name(b"missing.o").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownMember);

    let other = Builder::new().gnu(b"b.o", b"b").build();
    let other = ArchiveFile::parse(Cursor::new(&other)).unwrap();
    let err = archive.open_member(&other.members()[0]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownMember);
}
