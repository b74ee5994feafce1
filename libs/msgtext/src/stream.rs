use byteorder::{ByteOrder, LittleEndian};

use crate::error::FormatError;

/// Growable little-endian byte storage addressed by absolute offsets.
#[derive(Clone, Debug, Default)]
pub struct ByteStream {
    data: Vec<u8>,
}

impl ByteStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16, FormatError> {
        Ok(LittleEndian::read_u16(self.span(offset, 2)?))
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32, FormatError> {
        Ok(LittleEndian::read_u32(self.span(offset, 4)?))
    }

    pub fn push_u16(&mut self, value: u16) {
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, value);
        self.data.extend_from_slice(&buf);
    }

    pub fn push_u32(&mut self, value: u32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, value);
        self.data.extend_from_slice(&buf);
    }

    pub fn replace_u32(&mut self, offset: usize, value: u32) -> Result<(), FormatError> {
        let length = self.data.len();
        let slot = offset
            .checked_add(4)
            .and_then(|end| self.data.get_mut(offset..end))
            .ok_or(FormatError::OutOfBounds {
                offset,
                size: 4,
                length,
            })?;
        LittleEndian::write_u32(slot, value);
        Ok(())
    }

    fn span(&self, offset: usize, size: usize) -> Result<&[u8], FormatError> {
        offset
            .checked_add(size)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(FormatError::OutOfBounds {
                offset,
                size,
                length: self.data.len(),
            })
    }
}

impl From<Vec<u8>> for ByteStream {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl From<&[u8]> for ByteStream {
    fn from(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_patches_in_place() {
        let mut stream = ByteStream::new();
        stream.push_u16(1);
        stream.push_u32(u32::MAX);
        stream.replace_u32(2, 0xDEAD_BEEF).expect("replace failed");

        assert_eq!(stream.read_u16(0), Ok(1));
        assert_eq!(stream.read_u32(2), Ok(0xDEAD_BEEF));
        assert_eq!(stream.as_slice(), &[1, 0, 0xEF, 0xBE, 0xAD, 0xDE]);
    }

    #[test]
    fn reads_past_the_end_are_rejected() {
        let stream = ByteStream::from(vec![0u8; 5]);
        assert_eq!(
            stream.read_u32(2),
            Err(FormatError::OutOfBounds {
                offset: 2,
                size: 4,
                length: 5
            })
        );
        assert!(stream.read_u16(usize::MAX).is_err());
    }

    #[test]
    fn replace_past_the_end_is_rejected() {
        let mut stream = ByteStream::with_capacity(8);
        stream.push_u16(7);
        assert!(stream.replace_u32(0, 1).is_err());
        assert_eq!(stream.len(), 2);
    }
}
