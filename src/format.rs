use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("file too short to contain a TOS header")]
    TooShort,
    #[error("invalid magic number: {0:#06x}")]
    BadMagic(u16),
    #[error("file too short for declared text + data + symbol sections")]
    Truncated,
    #[error("relocation table too short")]
    TruncatedRelocationTable,
    #[error("relocation entry at table offset {index} failed: {kind}")]
    RelocationFault { index: usize, kind: EntryError },
}

/// Per-entry failure attached to one relocation entry. Never fatal under the
/// default walk policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("address not 16-bit aligned")]
    Misaligned,
    #[error("address beyond text + data sections")]
    OutOfBounds,
}

pub mod header;
