use crate::format::header::Header;
use crate::format::EntryError;
use crate::layout::SectionLayout;
use crate::walker::{RawField, RelocationEntry};

/// Everything one load produced: header, layout, the ordered entry sequence
/// and its summary counts. Immutable once built; rendering never touches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationReport {
    pub header: Header,
    pub layout: SectionLayout,
    pub entries: Vec<RelocationEntry>,
    pub total_entries: usize,
    pub error_count: usize,
}

#[must_use]
pub fn build_report(
    header: Header,
    layout: SectionLayout,
    entries: Vec<RelocationEntry>,
) -> RelocationReport {
    let total_entries = entries.len();
    let error_count = entries.iter().filter(|e| e.error.is_some()).count();
    RelocationReport {
        header,
        layout,
        entries,
        total_entries,
        error_count,
    }
}

/// Renders the report in the tool's historical text export layout. The exact
/// column widths and error strings are load-bearing: downstream consumers
/// diff these files.
#[must_use]
pub fn render_text(report: &RelocationReport) -> String {
    let mut out = String::new();

    out.push_str("TOS File Header Information:\n");
    for (label, value) in header_rows(report) {
        out.push_str(&format!("{label:<25}: {value}\n"));
    }

    out.push_str("\nRelocation Entries:\n");
    out.push_str(&format!(
        "{:<8}{:<15}{:<20}{:<20}{:<20}{:<25}\n",
        "Index", "Byte Value", "Current Address", "Original Value", "Relocated Value", "Error"
    ));
    out.push_str(&"=".repeat(100));
    out.push('\n');

    for entry in &report.entries {
        out.push_str(&format!(
            "{:<8}{:<15}{:<20}{:<20}{:<20}{:<25}\n",
            entry.index,
            byte_value_cell(entry),
            format!("0x{:08x}", entry.current_address),
            value_cell(entry.original_value),
            value_cell(entry.relocated_value),
            error_cell(entry),
        ));
    }

    out
}

fn header_rows(report: &RelocationReport) -> Vec<(&'static str, String)> {
    let header = &report.header;
    let layout = &report.layout;
    vec![
        ("Magic number", format!("0x{:04x}", header.magic)),
        ("Text length", format!("{} bytes", header.text_length)),
        ("Data length", format!("{} bytes", header.data_length)),
        ("BSS length", format!("{} bytes", header.bss_length)),
        (
            "Symbol table length",
            format!("{} bytes", header.symbol_table_length),
        ),
        ("Flag", format!("0x{:04x}", header.flag)),
        ("Reserved", format!("0x{:04x}", header.reserved)),
        ("Program Start", format!("0x{:08x}", layout.program_start)),
        ("Text End", format!("0x{:08x}", layout.text_end)),
        ("Data End", format!("0x{:08x}", layout.data_end)),
        (
            "Relocation Table Start",
            format!("0x{:08x}", layout.relocation_table_start),
        ),
        ("Relocation Entries", format!("{}", report.total_entries)),
        ("Errors", format!("{}", report.error_count)),
    ]
}

fn byte_value_cell(entry: &RelocationEntry) -> String {
    match entry.raw {
        RawField::FirstOffset(offset) => format!("0x{offset:08x}"),
        RawField::ControlByte(byte) => format!("{byte} (0x{byte:02x})"),
    }
}

fn value_cell(value: Option<u32>) -> String {
    value.map(|v| format!("0x{v:08x}")).unwrap_or_default()
}

fn error_cell(entry: &RelocationEntry) -> String {
    match entry.error {
        None => String::new(),
        Some(EntryError::Misaligned) => format!(
            "Address 0x{:08x} not 16-bit aligned.",
            entry.current_address
        ),
        Some(EntryError::OutOfBounds) => {
            format!("Address 0x{:08x} beyond text + data.", entry.current_address)
        }
    }
}
