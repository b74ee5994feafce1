use crate::error::ConverterError;

/// Method for converting u32 to usize.
pub fn u32_to_usize(value: u32) -> Result<usize, ConverterError> {
    Ok(usize::try_from(value)?)
}

/// Method for converting usize to u16.
pub fn usize_to_u16(value: usize) -> Result<u16, ConverterError> {
    Ok(u16::try_from(value)?)
}

/// Method for converting usize to u32.
pub fn usize_to_u32(value: usize) -> Result<u32, ConverterError> {
    Ok(u32::try_from(value)?)
}

/// Method for converting usize to u64.
pub fn usize_to_u64(value: usize) -> Result<u64, ConverterError> {
    Ok(u64::try_from(value)?)
}
