use crate::cipher::LineCipher;
use crate::error::FormatError;
use crate::markup::render_command;
use crate::stream::ByteStream;
use crate::tables::{glyph_for, mnemonic_for, COMMAND_HEADER, TERMINATOR};
use crate::wide::{char_to_wide, wide_to_utf8};
use crate::{converter, Result, HEADER_SIZE, LINE_ENTRY_SIZE};

/// Validation applied while reading an archive
#[derive(Clone, Debug, Default)]
pub struct ReadOptions {
    /// Also reject section count and section offset/length inconsistencies
    pub strict: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArchiveHeader {
    /// Number of text sections
    pub sections: u16,
    /// Number of lines
    pub line_count: u16,
    /// Size of the data following the header (in bytes)
    pub total_length: u32,
    /// Stored key, always zero
    pub initial_key: u32,
    /// Absolute position of the section
    pub section_offset: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineEntry {
    /// Position relative to the section start
    pub offset: u32,
    /// Length in 16-bit code units
    pub length: u32,
}

/// Parsed archive with a validated header and line table
#[derive(Debug)]
pub struct Archive {
    stream: ByteStream,
    header: ArchiveHeader,
    entries: Vec<LineEntry>,
}

impl Archive {
    pub fn parse(bytes: impl Into<ByteStream>, opts: &ReadOptions) -> Result<Self> {
        let stream = bytes.into();
        let header = read_header(&stream)?;
        check_header(&header, stream.len(), opts)?;

        let section_offset = converter::u32_to_usize(header.section_offset)?;
        let section_length = stream.read_u32(section_offset)?;
        if section_length != header.total_length {
            return Err(FormatError::SectionLengthMismatch {
                header: header.total_length,
                section: section_length,
            }
            .into());
        }

        let mut entries = Vec::with_capacity(usize::from(header.line_count));
        for index in 0..usize::from(header.line_count) {
            let entry = read_line_entry(&stream, section_offset, index)?;
            line_span(&stream, section_offset, &entry)?;
            entries.push(entry);
        }

        log::debug!(
            "text archive: {} line(s), {} section(s), {} byte(s) of section data",
            header.line_count,
            header.sections,
            header.total_length
        );

        Ok(Self {
            stream,
            header,
            entries,
        })
    }

    pub fn header(&self) -> &ArchiveHeader {
        &self.header
    }

    pub fn entries(&self) -> &[LineEntry] {
        &self.entries
    }

    pub fn line_count(&self) -> usize {
        self.entries.len()
    }

    /// Decode a single line into markup text
    pub fn line(&self, index: usize) -> Result<String> {
        let Some(entry) = self.entries.get(index) else {
            return Err(FormatError::OutOfBounds {
                offset: index,
                size: 1,
                length: self.entries.len(),
            }
            .into());
        };
        let section_offset = converter::u32_to_usize(self.header.section_offset)?;
        let (start, end) = line_span(&self.stream, section_offset, entry)?;

        let mut units = LineUnits {
            stream: &self.stream,
            offset: start,
            end,
            cipher: LineCipher::for_line(converter::usize_to_u16(index)?),
        };
        let mut wide: Vec<u16> = Vec::with_capacity(converter::u32_to_usize(entry.length)?);

        while let Some(unit) = units.next_unit()? {
            if unit == TERMINATOR {
                break;
            }

            if let Some(glyph) = glyph_for(unit) {
                let mut buf = [0u16; 2];
                wide.extend_from_slice(char_to_wide(glyph, &mut buf));
                continue;
            }

            if unit == COMMAND_HEADER {
                let opcode = units.require(index)?;
                let count = units.require(index)?;
                let mut params = Vec::with_capacity(usize::from(count));
                for _ in 0..count {
                    params.push(units.require(index)?);
                }

                let mnemonic = mnemonic_for(opcode).unwrap_or_else(|| {
                    log::debug!("line {index}: unknown command opcode {opcode:#06x}");
                    ""
                });
                wide.extend(render_command(mnemonic, &params).encode_utf16());
                continue;
            }

            wide.push(unit);
        }

        Ok(wide_to_utf8(&wide))
    }

    /// Decode every line in declared order
    pub fn lines(&self) -> Result<Vec<String>> {
        (0..self.entries.len()).map(|index| self.line(index)).collect()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.stream.into_inner()
    }
}

/// Decode an archive into its lines
pub fn decode(bytes: &[u8], strict: bool) -> Result<Vec<String>> {
    Archive::parse(bytes, &ReadOptions { strict })?.lines()
}

struct LineUnits<'a> {
    stream: &'a ByteStream,
    offset: usize,
    end: usize,
    cipher: LineCipher,
}

impl LineUnits<'_> {
    fn next_unit(&mut self) -> core::result::Result<Option<u16>, FormatError> {
        if self.offset >= self.end {
            return Ok(None);
        }
        let raw = self.stream.read_u16(self.offset)?;
        self.offset += 2;
        Ok(Some(self.cipher.apply(raw)))
    }

    fn require(&mut self, line: usize) -> core::result::Result<u16, FormatError> {
        self.next_unit()?
            .ok_or(FormatError::TruncatedCommand { line })
    }
}

fn read_header(stream: &ByteStream) -> Result<ArchiveHeader> {
    if stream.is_empty() {
        return Err(FormatError::Empty.into());
    }
    if stream.len() < HEADER_SIZE {
        return Err(FormatError::TooSmall {
            expected: HEADER_SIZE,
            received: stream.len(),
        }
        .into());
    }

    Ok(ArchiveHeader {
        sections: stream.read_u16(0)?,
        line_count: stream.read_u16(2)?,
        total_length: stream.read_u32(4)?,
        initial_key: stream.read_u32(8)?,
        section_offset: stream.read_u32(12)?,
    })
}

fn check_header(header: &ArchiveHeader, file_length: usize, opts: &ReadOptions) -> Result<()> {
    if header.initial_key != 0 {
        return Err(FormatError::InvalidInitialKey {
            received: header.initial_key,
        }
        .into());
    }

    if header.line_count == 0 {
        return Err(FormatError::NoLines.into());
    }

    if opts.strict {
        let end = u64::from(header.section_offset) + u64::from(header.total_length);
        let actual = converter::usize_to_u64(file_length)?;
        if end != actual || header.sections != 1 {
            return Err(FormatError::StrictLayout {
                sections: header.sections,
                section_offset: header.section_offset,
                total_length: header.total_length,
                file_length,
            }
            .into());
        }
    }

    Ok(())
}

fn read_line_entry(stream: &ByteStream, section_offset: usize, index: usize) -> Result<LineEntry> {
    let base = index
        .checked_mul(LINE_ENTRY_SIZE)
        .and_then(|value| value.checked_add(section_offset))
        .and_then(|value| value.checked_add(4))
        .ok_or(out_of_bounds(section_offset, stream.len()))?;

    Ok(LineEntry {
        offset: stream.read_u32(base)?,
        length: stream.read_u32(base + 4)?,
    })
}

fn line_span(
    stream: &ByteStream,
    section_offset: usize,
    entry: &LineEntry,
) -> Result<(usize, usize)> {
    let start = converter::u32_to_usize(entry.offset)?
        .checked_add(section_offset)
        .ok_or(out_of_bounds(section_offset, stream.len()))?;
    let size = converter::u32_to_usize(entry.length)?
        .checked_mul(2)
        .ok_or(out_of_bounds(start, stream.len()))?;

    match start.checked_add(size) {
        Some(end) if end <= stream.len() => Ok((start, end)),
        _ => Err(FormatError::OutOfBounds {
            offset: start,
            size,
            length: stream.len(),
        }
        .into()),
    }
}

fn out_of_bounds(offset: usize, length: usize) -> FormatError {
    FormatError::OutOfBounds {
        offset,
        size: 0,
        length,
    }
}
