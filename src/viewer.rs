use anyhow::Context;

use crate::cli::Args;
use crate::format::header::parse_header;
use crate::format::FormatError;
use crate::layout::{SectionLayout, DEFAULT_BASE_ADDRESS};
use crate::report::{build_report, render_text, RelocationReport};
use crate::walker::{walk_relocations, WalkPolicy};

/// Runs one load: whole-file read, decode, layout, walk, report, then either
/// a text export or a dump to stdout.
pub fn run(args: Args) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input))?;

    let base_address = args.base_address.unwrap_or(DEFAULT_BASE_ADDRESS);
    let policy = if args.strict {
        WalkPolicy::AbortOnError
    } else {
        WalkPolicy::Continue
    };

    let report = load_report(&bytes, base_address, policy)
        .with_context(|| format!("failed to decode {}", args.input))?;

    if args.verbose {
        println!(
            "header: text={} data={} bss={} symbols={}",
            report.header.text_length,
            report.header.data_length,
            report.header.bss_length,
            report.header.symbol_table_length
        );
        println!(
            "layout: program_start=0x{:08x} text_end=0x{:08x} data_end=0x{:08x} reloc=0x{:08x}",
            report.layout.program_start,
            report.layout.text_end,
            report.layout.data_end,
            report.layout.relocation_table_start
        );
        println!(
            "walk: {} entries, {} errors",
            report.total_entries, report.error_count
        );
    }

    let text = render_text(&report);
    if let Some(output) = &args.output {
        std::fs::write(output, &text).with_context(|| format!("failed to write {output}"))?;
        if !args.quiet {
            println!("wrote report: {output}");
        }
    } else {
        print!("{text}");
    }
    Ok(())
}

/// Decodes one TOS executable image into a relocation report. Every call
/// recomputes from scratch; nothing is shared between loads.
///
/// # Errors
/// Returns the first fatal `FormatError`; no report is produced for a file
/// that fails header, layout or pre-walk validation.
pub fn load_report(
    bytes: &[u8],
    base_address: u32,
    policy: WalkPolicy,
) -> Result<RelocationReport, FormatError> {
    let header = parse_header(bytes)?;
    let layout = SectionLayout::compute(&header, base_address, bytes.len())?;
    // The layout check guarantees this slice start is inside the file.
    let table = &bytes[layout.program_end_offset as usize..];
    let entries = walk_relocations(table, &layout, bytes, policy)?;
    Ok(build_report(header, layout, entries))
}
