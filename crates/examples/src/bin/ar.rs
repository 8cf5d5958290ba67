use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use arfile::read::{ArchiveFile, ArchiveStream, Options};
use arfile_examples::ar::{self, Operation};
use clap::{command, Arg, ArgAction};

fn main() -> Result<()> {
    let matches = command!()
        .max_term_width(100)
        .args(&[
            Arg::new("operation")
                .required(true)
                .value_parser(["t", "tv", "v", "p"])
                .help("List names (t), list with metadata (tv), or print member data (p)"),
            Arg::new("archive")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("The archive file, or - to read a stream from stdin"),
            Arg::new("member")
                .value_parser(clap::value_parser!(String))
                .action(ArgAction::Append)
                .help("Only operate on the named members"),
            Arg::new("skip-symbols")
                .long("skip-symbols")
                .action(ArgAction::SetTrue)
                .help("Omit symbol table members"),
            Arg::new("lenient")
                .long("lenient")
                .action(ArgAction::SetTrue)
                .help("Accept members with invalid timestamp, owner or mode fields"),
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        ])
        .get_matches();

    if matches.get_flag("verbose") {
        env_logger::builder()
            .format_level(false)
            .format_target(false)
            .filter_module("arfile", log::LevelFilter::Trace)
            .init();
    }

    let op = matches
        .get_one::<String>("operation")
        .and_then(|op| Operation::parse(op))
        .ok_or_else(|| anyhow!("Missing operation"))?;
    let names: Vec<Vec<u8>> = matches
        .get_many::<String>("member")
        .unwrap_or_default()
        .map(|name| name.as_bytes().to_vec())
        .collect();
    let mut options = Options::default();
    options.skip_symbol_tables = matches.get_flag("skip-symbols");
    options.lenient_metadata = matches.get_flag("lenient");

    let path = matches
        .get_one::<PathBuf>("archive")
        .ok_or_else(|| anyhow!("Missing archive"))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if path.as_os_str() == "-" {
        let archive = ArchiveStream::new_with_options(io::stdin().lock(), options)
            .context("Failed to parse archive from stdin")?;
        ar::print_stream(&mut out, &archive, op, &names)?;
    } else {
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open archive '{}'", path.display()))?;
        let data = unsafe { memmap2::Mmap::map(&file) }
            .with_context(|| format!("Failed to map archive '{}'", path.display()))?;
        let archive = ArchiveFile::parse_with_options(io::Cursor::new(&*data), options)
            .with_context(|| format!("Failed to parse archive '{}'", path.display()))?;
        ar::print_file(&mut out, &archive, op, &names)?;
    }
    out.flush()?;
    Ok(())
}
