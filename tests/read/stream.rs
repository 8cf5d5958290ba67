use std::io::Read;

use arfile::read::{ArchiveKind, ArchiveStream, Error, ErrorKind, Options};

use super::{header, read_all, Builder, NonSeekable};

fn three_members() -> Vec<u8> {
    let (builder, offsets) = Builder::new().gnu_names(&[&b"a_name_longer_than_sixteen_bytes.o"[..]]);
    builder
        .gnu(b"one.o", b"first")
        .raw(format!("/{}", offsets[0]).as_bytes(), b"second")
        .gnu(b"three.o", b"third")
        .build()
}

#[test]
fn stream_in_order() {
    let data = three_members();
    let archive = ArchiveStream::new(NonSeekable(&data[..])).unwrap();
    let mut members = Vec::new();
    for member in archive.members() {
        let member = member.unwrap();
        let name = member.header().name().to_vec();
        members.push((name, read_all(member)));
    }
    assert_eq!(
        members,
        [
            (b"one.o".to_vec(), b"first".to_vec()),
            (b"a_name_longer_than_sixteen_bytes.o".to_vec(), b"second".to_vec()),
            (b"three.o".to_vec(), b"third".to_vec()),
        ]
    );
    assert_eq!(archive.kind(), ArchiveKind::Gnu);
}

#[test]
fn stream_reopen_fails() {
    let data = three_members();
    let archive = ArchiveStream::new(NonSeekable(&data[..])).unwrap();

    let first = archive.next_header().unwrap().unwrap();
    assert_eq!(read_all(archive.open(&first).unwrap()), b"first");

    let second = archive.next_header().unwrap().unwrap();
    let err = archive.open(&first).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfOrderAccess);

    let mut reader = archive.open(&second).unwrap();
    let mut buf = [0; 3];
    reader.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"sec");
    let err = archive.open(&second).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfOrderAccess);
}

#[test]
fn stream_skip_unread() {
    let data = three_members();
    let archive = ArchiveStream::new(NonSeekable(&data[..])).unwrap();
    let mut names = Vec::new();
    while let Some(header) = archive.next_header().unwrap() {
        names.push(header.name().to_vec());
    }
    assert_eq!(names.len(), 3);
    assert_eq!(names[2], b"three.o");
}

#[test]
fn stream_stale_reader() {
    let data = three_members();
    let archive = ArchiveStream::new(NonSeekable(&data[..])).unwrap();
    let mut first = archive.next_member().unwrap().unwrap();
    let _second = archive.next_member().unwrap().unwrap();

    let mut buf = [0; 4];
    let err = first.read(&mut buf).unwrap_err();
    let err = Error::from_io(&err).unwrap();
    assert_eq!(err.kind(), ErrorKind::OutOfOrderAccess);
}

#[test]
fn stream_error_after_valid_members() {
    let mut data = Builder::new().gnu(b"good.o", b"ok").build();
    let mut bad = header(b"bad.o/", 2);
    bad[58..].copy_from_slice(b"xx");
    data.extend(bad);
    data.extend_from_slice(b"zz");

    let archive = ArchiveStream::new(NonSeekable(&data[..])).unwrap();
    let good = archive.next_member().unwrap().unwrap();
    assert_eq!(good.header().name(), b"good.o");
    assert_eq!(read_all(good), b"ok");

    let err = archive.next_member().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadHeaderTrailer);
    assert!(archive.next_member().unwrap().is_none());
}

#[test]
fn stream_truncated_member() {
    let mut data = Builder::new()
        .gnu(b"a.o", b"aaaa")
        .gnu(b"b.o", b"bbbbbbbb")
        .build();
    data.truncate(data.len() - 3);

    let archive = ArchiveStream::new(NonSeekable(&data[..])).unwrap();
    let _a = archive.next_member().unwrap().unwrap();
    let mut b = archive.next_member().unwrap().unwrap();
    let mut content = Vec::new();
    let err = b.read_to_end(&mut content).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    assert_eq!(content, b"bbbbb");

    let archive = ArchiveStream::new(NonSeekable(&data[..])).unwrap();
    archive.next_header().unwrap().unwrap();
    archive.next_header().unwrap().unwrap();
    let err = archive.next_header().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TruncatedMember);
}

#[test]
fn stream_bsd() {
    let data = Builder::new()
        .bsd(b"a_long_bsd_member_name.o", b"bsd!")
        .bsd(b"x", b"y")
        .build();
    let archive = ArchiveStream::new(NonSeekable(&data[..])).unwrap();
    let member = archive.next_member().unwrap().unwrap();
    assert_eq!(member.header().name(), b"a_long_bsd_member_name.o");
    assert_eq!(member.header().size(), 4);
    assert_eq!(read_all(member), b"bsd!");
    let member = archive.next_member().unwrap().unwrap();
    assert_eq!(read_all(member), b"y");
    assert_eq!(archive.kind(), ArchiveKind::Bsd);

    let rest = archive.into_inner();
    assert!(rest.0.is_empty());
}

#[test]
fn stream_huge_declared_size() {
    for name in [&b"//"[..], b"#1/9999999999"].iter() {
        let mut data = Builder::new().gnu(b"good.o", b"ok").build();
        data.extend(header(name, 9_999_999_999));
        data.extend_from_slice(b"abc");

        let archive = ArchiveStream::new(NonSeekable(&data[..])).unwrap();
        let good = archive.next_member().unwrap().unwrap();
        assert_eq!(read_all(good), b"ok");
        let err = archive.next_header().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TruncatedMember);
        assert!(archive.next_header().unwrap().is_none());
    }
}

#[test]
fn stream_options() {
    let mut data = Builder::new()
        .raw(b"/", b"\0\0\0\0")
        .gnu(b"a.o", b"aa")
        .build();
    let mut bad = header(b"b.o/", 2);
    bad[16..19].copy_from_slice(b"abc");
    data.extend(bad);
    data.extend_from_slice(b"bb");

    let mut options = Options::default();
    options.skip_symbol_tables = true;
    options.lenient_metadata = true;
    let archive = ArchiveStream::new_with_options(NonSeekable(&data[..]), options).unwrap();
    let a = archive.next_member().unwrap().unwrap();
    assert_eq!(a.header().name(), b"a.o");
    assert_eq!(a.header().index(), 0);
    assert_eq!(read_all(a), b"aa");
    let b = archive.next_member().unwrap().unwrap();
    assert_eq!(b.header().date(), None);
    assert_eq!(read_all(b), b"bb");
    assert!(archive.next_member().unwrap().is_none());
    assert_eq!(archive.kind(), ArchiveKind::Gnu);

    let archive = ArchiveStream::new(NonSeekable(&data[..])).unwrap();
    let symbols = archive.next_header().unwrap().unwrap();
    assert!(symbols.is_symbol_table());
    archive.next_header().unwrap().unwrap();
    let err = archive.next_header().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedField);
}
