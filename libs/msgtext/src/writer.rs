use crate::cipher::LineCipher;
use crate::error::{Error, MarkupError};
use crate::markup::{Token, Tokenizer};
use crate::stream::ByteStream;
use crate::tables::{glyph_for, opcode_for, sentinel_for, COMMAND_HEADER, TERMINATOR};
use crate::wide::char_to_wide;
use crate::{converter, Result, HEADER_SIZE, LINE_ENTRY_SIZE};

/// What to do with a command whose mnemonic is not in the command table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownCommandPolicy {
    /// Write nothing for the command and carry on
    #[default]
    Drop,
    /// Fail with [`MarkupError::UnknownCommand`]
    Reject,
}

#[derive(Clone, Debug, Default)]
pub struct WriteOptions {
    pub unknown_commands: UnknownCommandPolicy,
}

/// Encode lines into an archive with default options
pub fn encode<S: AsRef<str>>(lines: &[S]) -> Result<Vec<u8>> {
    encode_with(lines, &WriteOptions::default())
}

/// Encode lines into an archive
pub fn encode_with<S: AsRef<str>>(lines: &[S], opts: &WriteOptions) -> Result<Vec<u8>> {
    if lines.is_empty() {
        return Err(Error::NoLines);
    }
    let line_count = converter::usize_to_u16(lines.len()).map_err(|_| Error::TooManyLines {
        max: usize::from(u16::MAX),
        received: lines.len(),
    })?;

    let table_size = lines.len() * LINE_ENTRY_SIZE;
    let text_size: usize = lines.iter().map(|line| line.as_ref().len() + 1).sum();
    let mut stream = ByteStream::with_capacity(HEADER_SIZE + 4 + table_size + text_size * 2);

    stream.push_u16(1);
    stream.push_u16(line_count);
    stream.push_u32(u32::MAX); // total length
    stream.push_u32(0);
    stream.push_u32(converter::usize_to_u32(HEADER_SIZE)?);
    stream.push_u32(u32::MAX); // section length
    for _ in 0..lines.len() {
        stream.push_u32(u32::MAX); // offset
        stream.push_u32(u32::MAX); // length
    }

    for (index, line) in lines.iter().enumerate() {
        let units = line_units(line.as_ref(), index, opts)?;
        let offset = converter::usize_to_u32(stream.len() - HEADER_SIZE)?;
        let length = converter::usize_to_u32(units.len())?;

        let mut cipher = LineCipher::for_line(converter::usize_to_u16(index)?);
        for unit in units {
            stream.push_u16(cipher.apply(unit));
        }

        let entry = HEADER_SIZE + 4 + index * LINE_ENTRY_SIZE;
        stream.replace_u32(entry, offset)?;
        stream.replace_u32(entry + 4, length)?;
    }

    let total_length = converter::usize_to_u32(stream.len() - HEADER_SIZE)?;
    stream.replace_u32(4, total_length)?;
    stream.replace_u32(HEADER_SIZE, total_length)?;

    log::debug!(
        "encoded {} line(s) into {} byte(s)",
        lines.len(),
        stream.len()
    );

    Ok(stream.into_inner())
}

/// Plain (not yet ciphered) code units of a line, terminator included
fn line_units(line: &str, index: usize, opts: &WriteOptions) -> Result<Vec<u16>> {
    let mut units = Vec::with_capacity(line.len() + 1);

    for token in Tokenizer::new(line, index) {
        match token? {
            Token::Literal(character) => {
                if let Some(sentinel) = sentinel_for(character) {
                    units.push(sentinel);
                    continue;
                }

                let mut buf = [0u16; 2];
                let wide = char_to_wide(character, &mut buf);
                if let [code @ (TERMINATOR | COMMAND_HEADER)] = wide {
                    return Err(MarkupError::ReservedCodePoint {
                        line: index,
                        code: *code,
                    }
                    .into());
                }
                // A sentinel read back as its glyph, not as this character
                if let [code] = wide {
                    if glyph_for(*code).is_some() {
                        return Err(MarkupError::ReservedCodePoint {
                            line: index,
                            code: *code,
                        }
                        .into());
                    }
                }
                units.extend_from_slice(wide);
            }
            Token::Command {
                mnemonic,
                params,
                position,
            } => {
                let Some(opcode) = opcode_for(mnemonic) else {
                    match opts.unknown_commands {
                        UnknownCommandPolicy::Drop => {
                            log::warn!(
                                "line {index}: unknown command {mnemonic:?} at {position} dropped"
                            );
                            continue;
                        }
                        UnknownCommandPolicy::Reject => {
                            return Err(MarkupError::UnknownCommand {
                                line: index,
                                position,
                                mnemonic: mnemonic.to_string(),
                            }
                            .into());
                        }
                    }
                };

                units.push(COMMAND_HEADER);
                units.push(opcode);
                units.push(converter::usize_to_u16(params.len())?);
                units.extend_from_slice(&params);
            }
        }
    }

    units.push(TERMINATOR);
    Ok(units)
}
