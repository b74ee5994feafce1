/// Key of the first line in every archive
pub const BASE_KEY: u16 = 0x7C89;
/// Key increment between consecutive lines
pub const LINE_KEY_STEP: u16 = 0x2983;

/// XOR one code unit with `key` and advance the key schedule.
///
/// The transform is its own inverse, so it serves both reading and writing.
pub fn transform(unit: u16, key: u16) -> (u16, u16) {
    (unit ^ key, key.rotate_left(3))
}

/// Cipher state for a single line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineCipher {
    key: u16,
}

impl LineCipher {
    /// Create the cipher state for line `index`
    pub fn for_line(index: u16) -> Self {
        Self {
            key: BASE_KEY.wrapping_add(index.wrapping_mul(LINE_KEY_STEP)),
        }
    }

    /// Current key, before the next unit is consumed
    pub fn key(&self) -> u16 {
        self.key
    }

    /// Transform a single unit and update state
    pub fn apply(&mut self, unit: u16) -> u16 {
        let (out, next) = transform(unit, self.key);
        self.key = next;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_schedule_rotates_left_by_three() {
        assert_eq!(transform(0, 0x8001), (0x8001, 0x000C));
        assert_eq!(transform(0x1234, 0x1234), (0, 0x91A0));
    }

    #[test]
    fn line_keys_step_and_wrap() {
        assert_eq!(LineCipher::for_line(0).key(), 0x7C89);
        assert_eq!(LineCipher::for_line(1).key(), 0xA60C);
        assert_eq!(LineCipher::for_line(2).key(), 0xCF8F);
        assert_eq!(LineCipher::for_line(3).key(), 0xF912);
        assert_eq!(LineCipher::for_line(4).key(), 0x2295);
    }

    #[test]
    fn applying_twice_restores_the_unit() {
        let mut writer = LineCipher::for_line(9);
        let mut reader = LineCipher::for_line(9);
        for unit in [0x0048u16, 0xF000, 0xFFFF, 0x246D, 0] {
            assert_eq!(reader.apply(writer.apply(unit)), unit);
        }
        assert_eq!(writer, reader);
    }
}
