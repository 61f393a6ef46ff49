use crate::format::{EntryError, FormatError};
use crate::layout::{SectionLayout, PROGRAM_START_OFFSET};

/// Raw bytes an entry was decoded from. Entry #0 comes from the 32-bit first
/// offset word; every later entry from a single control byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawField {
    FirstOffset(u32),
    ControlByte(u8),
}

/// One address a loader would patch, or the failure that prevented reading
/// its value. `index` is the byte offset of the entry within the relocation
/// table, not a running count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocationEntry {
    pub index: usize,
    pub raw: RawField,
    pub current_address: u32,
    pub original_value: Option<u32>,
    pub relocated_value: Option<u32>,
    pub error: Option<EntryError>,
}

/// Whether a faulty entry stops the walk. The default keeps walking so the
/// report lists every reachable address; `AbortOnError` emulates a loader
/// that would refuse the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkPolicy {
    #[default]
    Continue,
    AbortOnError,
}

/// Walks the relocation byte stream and reconstructs the patch sequence.
///
/// `table` is the file tail starting at the relocation table; `file` is the
/// whole file, used to read the 32-bit values at each patched address. The
/// walk ends at the 0x00 terminator or, failing that, at the end of the
/// buffer.
///
/// # Errors
/// Returns `TruncatedRelocationTable` when the table cannot hold the first
/// offset word, and `RelocationFault` for the first faulty entry under
/// `WalkPolicy::AbortOnError`.
pub fn walk_relocations(
    table: &[u8],
    layout: &SectionLayout,
    file: &[u8],
    policy: WalkPolicy,
) -> Result<Vec<RelocationEntry>, FormatError> {
    if table.len() < 4 {
        return Err(FormatError::TruncatedRelocationTable);
    }
    let first_offset = u32::from_be_bytes([table[0], table[1], table[2], table[3]]);
    let mut current = layout.base_address.saturating_add(first_offset);

    let mut entries = Vec::new();
    // Entry #0 is emitted unconditionally, even for a first offset of 0.
    push_entry(
        &mut entries,
        probe_address(layout, file, 0, RawField::FirstOffset(first_offset), current),
        policy,
    )?;

    let mut index = 4;
    while index < table.len() {
        match table[index] {
            0 => break,
            1 => current = current.saturating_add(254),
            step => {
                current = current.saturating_add(u32::from(step));
                let raw = RawField::ControlByte(step);
                let entry = if current % 2 != 0 {
                    RelocationEntry {
                        index,
                        raw,
                        current_address: current,
                        original_value: None,
                        relocated_value: None,
                        error: Some(EntryError::Misaligned),
                    }
                } else {
                    probe_address(layout, file, index, raw, current)
                };
                push_entry(&mut entries, entry, policy)?;
            }
        }
        index += 1;
    }

    Ok(entries)
}

/// Bounds-checks `current` against the patchable text + data region and, when
/// inside it, reads the value the loader would relocate.
fn probe_address(
    layout: &SectionLayout,
    file: &[u8],
    index: usize,
    raw: RawField,
    current: u32,
) -> RelocationEntry {
    let file_offset =
        u64::from(current - layout.base_address) + u64::from(PROGRAM_START_OFFSET);
    if file_offset + 4 > u64::from(layout.text_data_end_offset) {
        return RelocationEntry {
            index,
            raw,
            current_address: current,
            original_value: None,
            relocated_value: None,
            error: Some(EntryError::OutOfBounds),
        };
    }

    // In bounds implies inside the file: the layout already verified the file
    // covers text + data + symbol table.
    let at = file_offset as usize;
    let original = u32::from_be_bytes([file[at], file[at + 1], file[at + 2], file[at + 3]]);
    RelocationEntry {
        index,
        raw,
        current_address: current,
        original_value: Some(original),
        relocated_value: Some(original.wrapping_add(layout.base_address)),
        error: None,
    }
}

fn push_entry(
    entries: &mut Vec<RelocationEntry>,
    entry: RelocationEntry,
    policy: WalkPolicy,
) -> Result<(), FormatError> {
    if policy == WalkPolicy::AbortOnError {
        if let Some(kind) = entry.error {
            return Err(FormatError::RelocationFault {
                index: entry.index,
                kind,
            });
        }
    }
    entries.push(entry);
    Ok(())
}
