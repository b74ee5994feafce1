//! Bracketed command markup.
//!
//! A line is a sequence of `LITERAL | '[' MNEMONIC ('(' NUMBER ')')* ']'`.
//! Positions reported in errors are byte offsets into the line.

use std::fmt::Write as _;
use std::str::CharIndices;

use crate::error::MarkupError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Literal(char),
    Command {
        mnemonic: &'a str,
        params: Vec<u16>,
        position: usize,
    },
}

pub struct Tokenizer<'a> {
    text: &'a str,
    chars: CharIndices<'a>,
    line: usize,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str, line: usize) -> Self {
        Self {
            text,
            chars: text.char_indices(),
            line,
            failed: false,
        }
    }

    fn command(&mut self, start: usize) -> Result<Token<'a>, MarkupError> {
        let text = self.text;
        let name_start = start + 1;
        let mut params = Vec::new();

        let (mnemonic, mut open) = loop {
            match self.chars.next() {
                None => return Err(self.unclosed_command(start)),
                Some((position, '[')) => return Err(self.nested(position)),
                Some((position, ']')) => {
                    return Ok(Token::Command {
                        mnemonic: &text[name_start..position],
                        params,
                        position: start,
                    })
                }
                Some((position, '(')) => break (&text[name_start..position], position),
                Some(_) => {}
            }
        };

        loop {
            params.push(self.parameter(open)?);
            if params.len() > usize::from(u16::MAX) {
                return Err(MarkupError::TooManyParameters {
                    line: self.line,
                    position: start,
                });
            }

            match self.chars.next() {
                None => return Err(self.unclosed_command(start)),
                Some((position, '(')) => open = position,
                Some((_, ']')) => break,
                Some((position, '[')) => return Err(self.nested(position)),
                Some((position, found)) => {
                    return Err(MarkupError::UnexpectedCharacter {
                        line: self.line,
                        position,
                        found,
                    })
                }
            }
        }

        Ok(Token::Command {
            mnemonic,
            params,
            position: start,
        })
    }

    fn parameter(&mut self, open: usize) -> Result<u16, MarkupError> {
        let close = loop {
            match self.chars.next() {
                None | Some((_, ']')) => {
                    return Err(MarkupError::UnclosedParameter {
                        line: self.line,
                        position: open,
                    })
                }
                Some((position, '[')) => return Err(self.nested(position)),
                Some((position, ')')) => break position,
                Some(_) => {}
            }
        };

        let text = &self.text[open + 1..close];
        let digits = !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit());
        match text.parse::<u16>() {
            Ok(value) if digits => Ok(value),
            _ => Err(MarkupError::InvalidParameter {
                line: self.line,
                position: open + 1,
                text: text.to_string(),
            }),
        }
    }

    fn unclosed_command(&self, position: usize) -> MarkupError {
        MarkupError::UnclosedCommand {
            line: self.line,
            position,
        }
    }

    fn nested(&self, position: usize) -> MarkupError {
        MarkupError::NestedCommand {
            line: self.line,
            position,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, MarkupError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let (position, character) = self.chars.next()?;
        if character != '[' {
            return Some(Ok(Token::Literal(character)));
        }
        let token = self.command(position);
        self.failed = token.is_err();
        Some(token)
    }
}

/// Render a command as `[MNEMONIC(p1)(p2)...]`.
pub fn render_command(mnemonic: &str, params: &[u16]) -> String {
    let mut out = String::with_capacity(mnemonic.len() + 2 + params.len() * 4);
    out.push('[');
    out.push_str(mnemonic);
    for param in params {
        // Writing into a String cannot fail
        let _ = write!(out, "({param})");
    }
    out.push(']');
    out
}
