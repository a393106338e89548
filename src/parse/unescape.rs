// vcskit: uniform version-control backend layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Decoding of C-style quoted paths.
//!
//! ```text
//! "caf\303\251 menu.txt"  --> café menu.txt
//! "tab\there"             --> tab<TAB>here
//! plain/path.txt          --> plain/path.txt   (unquoted: verbatim)
//! ```
//!
//! Input is fed to a small state machine in fixed-size chunks; an escape
//! sequence split across a chunk boundary carries over in the decoder state.

/// Bytes decoded per step.
pub const UNESCAPE_CHUNK: usize = 16 * 1024;

/// Removes the tool's quoting and decodes escapes.
///
/// Returns `None` when the escaped form is malformed or not valid UTF-8.
#[must_use]
pub fn unescape_path(raw: &str) -> Option<String> {
    let Some(inner) = strip_quotes(raw) else {
        return Some(raw.to_string());
    };

    let mut decoder = EscapeDecoder::default();
    let mut out = Vec::with_capacity(inner.len());
    for chunk in inner.as_bytes().chunks(UNESCAPE_CHUNK) {
        decoder.feed(chunk, &mut out)?;
    }
    decoder.finish(&mut out)?;
    String::from_utf8(out).ok()
}

fn strip_quotes(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 && bytes[0] == bytes[bytes.len() - 1] && matches!(bytes[0], b'"' | b'\'')
    {
        Some(&raw[1..raw.len() - 1])
    } else {
        None
    }
}

#[derive(Debug, Default, Clone, Copy)]
enum DecodeState {
    #[default]
    Literal,
    Backslash,
    Octal {
        value: u16,
        digits: u8,
    },
    Hex {
        value: u8,
        digits: u8,
    },
}

#[derive(Debug, Default)]
struct EscapeDecoder {
    state: DecodeState,
}

impl EscapeDecoder {
    fn feed(&mut self, chunk: &[u8], out: &mut Vec<u8>) -> Option<()> {
        for &byte in chunk {
            self.step(byte, out)?;
        }
        Some(())
    }

    fn step(&mut self, byte: u8, out: &mut Vec<u8>) -> Option<()> {
        self.state = match self.state {
            DecodeState::Literal => {
                if byte == b'\\' {
                    DecodeState::Backslash
                } else {
                    out.push(byte);
                    DecodeState::Literal
                }
            }
            DecodeState::Backslash => match byte {
                b'0'..=b'7' => DecodeState::Octal {
                    value: u16::from(byte - b'0'),
                    digits: 1,
                },
                b'x' => DecodeState::Hex { value: 0, digits: 0 },
                _ => {
                    out.push(simple_escape(byte)?);
                    DecodeState::Literal
                }
            },
            DecodeState::Octal { value, digits } => {
                if matches!(byte, b'0'..=b'7') && digits < 3 {
                    let value = value * 8 + u16::from(byte - b'0');
                    if digits + 1 == 3 {
                        out.push(u8::try_from(value).ok()?);
                        DecodeState::Literal
                    } else {
                        DecodeState::Octal {
                            value,
                            digits: digits + 1,
                        }
                    }
                } else {
                    out.push(u8::try_from(value).ok()?);
                    self.state = DecodeState::Literal;
                    return self.step(byte, out);
                }
            }
            DecodeState::Hex { value, digits } => {
                let nibble = char::from(byte).to_digit(16)?;
                let value = value * 16 + u8::try_from(nibble).ok()?;
                if digits + 1 == 2 {
                    out.push(value);
                    DecodeState::Literal
                } else {
                    DecodeState::Hex {
                        value,
                        digits: digits + 1,
                    }
                }
            }
        };
        Some(())
    }

    fn finish(self, out: &mut Vec<u8>) -> Option<()> {
        match self.state {
            DecodeState::Literal => Some(()),
            DecodeState::Octal { value, .. } => {
                out.push(u8::try_from(value).ok()?);
                Some(())
            }
            DecodeState::Backslash | DecodeState::Hex { .. } => None,
        }
    }
}

const fn simple_escape(byte: u8) -> Option<u8> {
    Some(match byte {
        b'a' => 0x07,
        b'b' => 0x08,
        b't' => b'\t',
        b'n' => b'\n',
        b'v' => 0x0b,
        b'f' => 0x0c,
        b'r' => b'\r',
        b'"' => b'"',
        b'\'' => b'\'',
        b'\\' => b'\\',
        _ => return None,
    })
}
