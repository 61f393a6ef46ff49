use clap::Parser;

fn parse_u32_with_hex(input: &str) -> Result<u32, String> {
    let s = input.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("invalid hex value '{input}': {e}"))
    } else {
        s.parse::<u32>()
            .map_err(|e| format!("invalid decimal value '{input}': {e}"))
    }
}

#[derive(Debug, Parser)]
#[command(name = "tosreloc", version)]
pub struct Args {
    #[arg(value_name = "INPUT")]
    pub input: String,

    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    #[arg(short = 'b', long = "base", value_parser = parse_u32_with_hex)]
    pub base_address: Option<u32>,

    #[arg(long = "strict")]
    pub strict: bool,

    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,

    #[arg(long = "quiet", short = 'z')]
    pub quiet: bool,
}
