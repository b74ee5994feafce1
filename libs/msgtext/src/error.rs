extern crate miette;
extern crate thiserror;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConverterError {
    #[error("error converting an value")]
    #[diagnostic(code(libmsgtext::try_from_int_error))]
    TryFromIntError(#[from] std::num::TryFromIntError),
}

#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("text archive is empty")]
    #[diagnostic(code(libmsgtext::empty_file))]
    Empty,

    #[error("file is too small (must be at least {expected:?} bytes, received {received:?} bytes)")]
    #[diagnostic(code(libmsgtext::file_size_error))]
    TooSmall { expected: usize, received: usize },

    #[error("text archive declares no lines")]
    #[diagnostic(code(libmsgtext::no_lines))]
    NoLines,

    #[error("invalid initial key (expected 0, received {received:#x})")]
    #[diagnostic(code(libmsgtext::initial_key_error))]
    InvalidInitialKey { received: u32 },

    #[error(
        "invalid layout (sections {sections}, section offset {section_offset} + total length {total_length} != file length {file_length})"
    )]
    #[diagnostic(
        code(libmsgtext::strict_layout_error),
        help("the file may come from a tool with minor layout deviations, retry without strict mode")
    )]
    StrictLayout {
        sections: u16,
        section_offset: u32,
        total_length: u32,
        file_length: usize,
    },

    #[error("section size and overall size do not match (header {header:?}, section {section:?})")]
    #[diagnostic(code(libmsgtext::section_size_error))]
    SectionLengthMismatch { header: u32, section: u32 },

    #[error("read out of bounds (offset {offset:?}, size {size:?}, file length {length:?})")]
    #[diagnostic(code(libmsgtext::out_of_bounds))]
    OutOfBounds {
        offset: usize,
        size: usize,
        length: usize,
    },

    #[error("line {line} ends inside a command")]
    #[diagnostic(code(libmsgtext::truncated_command))]
    TruncatedCommand { line: usize },
}

#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum MarkupError {
    #[error("line {line}: command opened at {position} is never closed")]
    #[diagnostic(code(libmsgtext::unclosed_command))]
    UnclosedCommand { line: usize, position: usize },

    #[error("line {line}: parameter opened at {position} is never closed")]
    #[diagnostic(code(libmsgtext::unclosed_parameter))]
    UnclosedParameter { line: usize, position: usize },

    #[error("line {line}: '[' at {position} inside another command")]
    #[diagnostic(code(libmsgtext::nested_command))]
    NestedCommand { line: usize, position: usize },

    #[error("line {line}: unexpected {found:?} at {position} after a parameter")]
    #[diagnostic(code(libmsgtext::unexpected_character))]
    UnexpectedCharacter {
        line: usize,
        position: usize,
        found: char,
    },

    #[error("line {line}: invalid parameter {text:?} at {position}")]
    #[diagnostic(
        code(libmsgtext::invalid_parameter),
        help("parameters are decimal numbers from 0 to 65535")
    )]
    InvalidParameter {
        line: usize,
        position: usize,
        text: String,
    },

    #[error("line {line}: command at {position} has too many parameters")]
    #[diagnostic(code(libmsgtext::too_many_parameters))]
    TooManyParameters { line: usize, position: usize },

    #[error("line {line}: unknown command {mnemonic:?} at {position}")]
    #[diagnostic(code(libmsgtext::unknown_command))]
    UnknownCommand {
        line: usize,
        position: usize,
        mnemonic: String,
    },

    #[error("line {line}: reserved code point {code:#06x} in text")]
    #[diagnostic(code(libmsgtext::reserved_code_point))]
    ReservedCodePoint { line: usize, code: u16 },
}

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(code(libmsgtext::convert_error))]
    Convert(#[from] ConverterError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Markup(#[from] MarkupError),

    #[error("text archive i/o error: {0}")]
    #[diagnostic(code(libmsgtext::io_error))]
    Io(#[from] std::io::Error),

    #[error("no lines to write")]
    #[diagnostic(code(libmsgtext::no_lines_to_write))]
    NoLines,

    #[error("too many lines (at most {max:?}, received {received:?})")]
    #[diagnostic(code(libmsgtext::too_many_lines))]
    TooManyLines { max: usize, received: usize },
}
