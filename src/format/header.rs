use crate::format::FormatError;

pub const MAGIC: u16 = 0x601a;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: u16,
    pub text_length: u32,
    pub data_length: u32,
    pub bss_length: u32,
    pub symbol_table_length: u32,
    pub flag: u16,
    pub reserved: u16,
}

impl Header {
    /// Bytes of the header the viewer decodes. The on-disk header runs to
    /// 0x1c where the text section starts; the last six bytes carry no field
    /// this tool reads.
    pub const SIZE: usize = 0x16;
}

/// Decodes the fixed TOS header from the start of the file.
///
/// # Errors
/// Returns `TooShort` when fewer than [`Header::SIZE`] bytes are available,
/// `BadMagic` when the magic word is not 0x601a.
pub fn parse_header(input: &[u8]) -> Result<Header, FormatError> {
    if input.len() < Header::SIZE {
        return Err(FormatError::TooShort);
    }
    let mut reader = Reader::new(input);
    let magic = reader.read_u16_be()?;
    if magic != MAGIC {
        return Err(FormatError::BadMagic(magic));
    }
    Ok(Header {
        magic,
        text_length: reader.read_u32_be()?,
        data_length: reader.read_u32_be()?,
        bss_length: reader.read_u32_be()?,
        symbol_table_length: reader.read_u32_be()?,
        flag: reader.read_u16_be()?,
        reserved: reader.read_u16_be()?,
    })
}

struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn read_u16_be(&mut self) -> Result<u16, FormatError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32_be(&mut self) -> Result<u32, FormatError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_bytes(&mut self, size: usize) -> Result<&'a [u8], FormatError> {
        if self.pos + size > self.input.len() {
            return Err(FormatError::TooShort);
        }
        let begin = self.pos;
        self.pos += size;
        Ok(&self.input[begin..self.pos])
    }
}
