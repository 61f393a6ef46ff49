use crate::format::header::Header;
use crate::format::FormatError;

/// File offset where the text section starts, directly after the on-disk
/// header.
pub const PROGRAM_START_OFFSET: u32 = 0x1c;

/// Assumed load address when none is given. A tooling convention, not the
/// true runtime address.
pub const DEFAULT_BASE_ADDRESS: u32 = 0x10000;

/// Base-relative addresses of the program sections plus the file offsets the
/// walker needs for value lookups. Derived once per load, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLayout {
    pub base_address: u32,
    pub program_start: u32,
    pub text_end: u32,
    pub data_end: u32,
    pub relocation_table_start: u32,
    /// File offset where the relocation table begins.
    pub program_end_offset: u32,
    /// File offset bounding the patchable text + data region.
    pub text_data_end_offset: u32,
}

impl SectionLayout {
    /// Computes the layout for a decoded header and base address.
    ///
    /// # Errors
    /// Returns `Truncated` when the file cannot hold the declared text, data
    /// and symbol table sections.
    pub fn compute(
        header: &Header,
        base_address: u32,
        file_length: usize,
    ) -> Result<Self, FormatError> {
        let total_program_length = header
            .text_length
            .saturating_add(header.data_length)
            .saturating_add(header.symbol_table_length);
        let program_end_offset = PROGRAM_START_OFFSET.saturating_add(total_program_length);
        if (file_length as u64) < u64::from(program_end_offset) {
            return Err(FormatError::Truncated);
        }

        let program_start = base_address.saturating_add(PROGRAM_START_OFFSET);
        let text_end = program_start.saturating_add(header.text_length);
        let data_end = text_end.saturating_add(header.data_length);
        Ok(Self {
            base_address,
            program_start,
            text_end,
            data_end,
            relocation_table_start: base_address.saturating_add(program_end_offset),
            program_end_offset,
            text_data_end_offset: PROGRAM_START_OFFSET
                .saturating_add(header.text_length)
                .saturating_add(header.data_length),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{SectionLayout, DEFAULT_BASE_ADDRESS};
    use crate::format::header::Header;
    use crate::format::FormatError;

    fn mk_header(text: u32, data: u32, symbols: u32) -> Header {
        Header {
            magic: 0x601a,
            text_length: text,
            data_length: data,
            bss_length: 0,
            symbol_table_length: symbols,
            flag: 0,
            reserved: 0,
        }
    }

    #[test]
    fn computes_base_relative_section_addresses() {
        let header = mk_header(0x40, 0x10, 0x20);
        let layout = SectionLayout::compute(&header, DEFAULT_BASE_ADDRESS, 0x1c + 0x70)
            .expect("layout should succeed");

        assert_eq!(layout.program_start, 0x1001c);
        assert_eq!(layout.text_end, 0x1005c);
        assert_eq!(layout.data_end, 0x1006c);
        assert_eq!(layout.relocation_table_start, 0x1008c);
        assert_eq!(layout.program_end_offset, 0x8c);
        assert_eq!(layout.text_data_end_offset, 0x6c);
    }

    #[test]
    fn honours_a_custom_base_address() {
        let header = mk_header(0x10, 0, 0);
        let layout =
            SectionLayout::compute(&header, 0x2000, 0x1c + 0x10).expect("layout should succeed");
        assert_eq!(layout.program_start, 0x201c);
        assert_eq!(layout.text_end, 0x202c);
        assert_eq!(layout.relocation_table_start, 0x202c);
    }

    #[test]
    fn rejects_files_shorter_than_the_declared_sections() {
        let header = mk_header(0x40, 0x10, 0x20);
        let err = SectionLayout::compute(&header, DEFAULT_BASE_ADDRESS, 0x1c + 0x6f)
            .expect_err("layout must reject truncated files");
        assert_eq!(err, FormatError::Truncated);
    }

    #[test]
    fn accepts_a_file_that_ends_exactly_at_the_symbol_table() {
        // Legal even though no relocation table follows; the walker reports
        // that separately.
        let header = mk_header(0x40, 0x10, 0x20);
        let layout = SectionLayout::compute(&header, DEFAULT_BASE_ADDRESS, 0x1c + 0x70)
            .expect("layout should succeed");
        assert_eq!(layout.program_end_offset as usize, 0x1c + 0x70);
    }
}
