//! Reader and writer for ciphered message text archives.
//!
//! An archive holds a 16-byte header, one section with a line table, and the
//! text of every line as XOR-ciphered 16-bit code units. Lines are exchanged
//! as UTF-8 strings where inline commands use `[MNEMONIC(p1)(p2)]` markup.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Size of the archive header (in bytes)
pub const HEADER_SIZE: usize = 16;
/// Size of a line table entry (in bytes)
pub const LINE_ENTRY_SIZE: usize = 8;

pub mod cipher;
mod converter;
pub mod error;
pub mod markup;
pub mod reader;
pub mod stream;
pub mod tables;
pub mod wide;
pub mod writer;

pub use error::{Error, FormatError, MarkupError};
pub use reader::{decode, Archive, ArchiveHeader, LineEntry, ReadOptions};
pub use writer::{encode, encode_with, UnknownCommandPolicy, WriteOptions};

pub type Result<T> = core::result::Result<T, Error>;

/// Read an archive from disk and decode all of its lines
pub fn load_path(path: impl AsRef<Path>, strict: bool) -> Result<Vec<String>> {
    let path = path.as_ref();
    let result = fs::read(path)
        .map_err(Error::from)
        .and_then(|bytes| decode(&bytes, strict));
    if let Err(error) = &result {
        log::warn!("failed to load text file ({}): {error}", path.display());
    }
    result
}

/// Encode lines with default options and write the archive to disk
pub fn save_path<S: AsRef<str>>(path: impl AsRef<Path>, lines: &[S]) -> Result<()> {
    save_path_with(path, lines, &WriteOptions::default())
}

pub fn save_path_with<S: AsRef<str>>(
    path: impl AsRef<Path>,
    lines: &[S],
    opts: &WriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let result = encode_with(lines, opts).and_then(|bytes| write_atomic(path, &bytes));
    if let Err(error) = &result {
        log::warn!("failed to save text file ({}): {error}", path.display());
    }
    result
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("text");
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp_path = parent.join(format!(
        ".{}.tmp.{}.{}",
        file_name,
        std::process::id(),
        unix_time_nanos()
    ));
    let file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&tmp_path)?;

    if let Err(error) = persist(file, content, &tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error.into());
    }
    Ok(())
}

fn persist(mut file: File, content: &[u8], from: &Path, to: &Path) -> std::io::Result<()> {
    file.write_all(content)?;
    file.sync_all()?;
    drop(file);

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) if to.exists() => {
            fs::remove_file(to)?;
            fs::rename(from, to)
        }
        Err(error) => Err(error),
    }
}

fn unix_time_nanos() -> u128 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration.as_nanos(),
        Err(_) => 0,
    }
}
