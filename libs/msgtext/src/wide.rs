//! Conversion between UTF-8 strings and 16-bit code units.

/// Convert wide code units to UTF-8, replacing unpaired surrogates.
pub fn wide_to_utf8(units: &[u16]) -> String {
    let mut out = String::with_capacity(units.len());
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(character) => out.push(character),
            Err(error) => {
                log::warn!(
                    "unpaired surrogate {:#06x} replaced",
                    error.unpaired_surrogate()
                );
                out.push(char::REPLACEMENT_CHARACTER);
            }
        }
    }
    out
}

/// Code units of a single character (one, or a surrogate pair).
pub fn char_to_wide(character: char, buf: &mut [u16; 2]) -> &[u16] {
    character.encode_utf16(buf)
}
