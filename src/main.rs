use clap::Parser;

fn main() {
    let args = tosreloc::cli::Args::parse();
    if let Err(err) = tosreloc::run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
