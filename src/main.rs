//Enable more cargo lint tests
#![warn(rust_2018_idioms)]
#![warn(clippy::disallowed_types)]

use huff::compression::compress::compress_file;
use huff::compression::decompress::decompress_file;
use huff::tools::cli::{huffopts_init, HuffOpts, Mode};

use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

fn main() {
    // Available log levels are Error, Warn, Info, Debug, Trace. The cli narrows this down.
    // Logs go to stderr so they never mix with archive data sent to stdout.
    if let Err(e) = TermLogger::init(
        LevelFilter::Trace,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("Could not start the logger: {}", e);
    }

    let options = huffopts_init();

    let failures = run(&options);
    info!("Done.\n");
    if failures > 0 {
        std::process::exit(1);
    }
}

/// Figure out what we need to do and go do it, one file at a time. Each failure is logged
/// once. Returns the number of files that failed.
fn run(options: &HuffOpts) -> usize {
    let mut failures = 0;
    for file in &options.files {
        let outcome = match options.op_mode {
            Mode::Zip => compress_file(options, file),
            Mode::Unzip | Mode::Test => decompress_file(options, file),
        };
        if let Err(e) = outcome {
            error!("{}: {}", file, e);
            failures += 1;
        }
    }
    failures
}
