use clap::Parser;
use log::{info, warn};
use std::{fmt::Display, fmt::Formatter};

/// Compress, Decompress, Test
#[derive(Debug, PartialEq, Eq)]
pub enum Mode {
    Zip,
    Unzip,
    Test,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Debug, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug)]
pub struct HuffOpts {
    /// Vec of names of files to read for input
    pub files: Vec<String>,
    /// Write an archive even if it is no smaller than the input
    pub force: bool,
    /// Compress/Decompress/Test
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Explicit output file name, only used with a single input file
    pub out_file: Option<String>,
}

impl HuffOpts {
    pub fn new() -> Self {
        Self {
            files: vec![],
            force: false,
            op_mode: Mode::Zip,
            output: Output::File,
            out_file: None,
        }
    }
}

impl Default for HuffOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Huffman coding file compressor",
    long_about = "
    Compresses each input with a single Huffman code tree built from the whole file.
    The tree is stored at the front of the archive, followed by the coded data.
    By default an archive is only written if it is smaller than the input."
)]
pub struct Args {
    /// Files to process
    #[clap(required = true)]
    files: Vec<String>,

    /// Compress the input files (the default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Decompress the input files
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Test archive integrity without writing anything
    #[clap(short = 't', long = "test")]
    test: bool,

    /// Write the archive even if it does not save space
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Output file name (single input file only)
    #[clap(short = 'o', long = "output")]
    output: Option<String>,

    /// Suppress everything but errors
    #[clap(short = 'q', long = "quiet")]
    quiet: bool,

    /// Be verbose (a 2nd -v gives more)
    #[clap(short = 'v', long = "verbose", parse(from_occurrences))]
    verbose: u64,
}

/// Put command line information from CLAP into our internal structure, set the log level
/// and report the settings.
pub fn huffopts_init() -> HuffOpts {
    opts_from_args(Args::parse())
}

fn opts_from_args(args: Args) -> HuffOpts {
    let mut opts = HuffOpts::new();

    // Decompress wins over compress, and test wins over both
    if args.compress {
        opts.op_mode = Mode::Zip
    };
    if args.decompress {
        opts.op_mode = Mode::Unzip
    };
    if args.test {
        opts.op_mode = Mode::Test
    };
    opts.force = args.force;
    if args.stdout {
        opts.output = Output::Stdout
    };
    opts.files = args.files;

    // Set the log level
    if args.quiet {
        log::set_max_level(log::LevelFilter::Error)
    } else {
        match args.verbose {
            0 => log::set_max_level(log::LevelFilter::Warn),
            1 => log::set_max_level(log::LevelFilter::Info),
            2 => log::set_max_level(log::LevelFilter::Debug),
            _ => log::set_max_level(log::LevelFilter::Trace),
        }
    };

    match args.output {
        Some(name) if opts.files.len() == 1 => opts.out_file = Some(name),
        Some(name) => warn!(
            "Ignoring output name {} because there is more than one input file",
            name
        ),
        None => {}
    }

    // Below we report initialization status to the user
    info!("---- Huff Initialization Start ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Sending output to {}", opts.output);
    if opts.force {
        info!("Forcing compression")
    };
    info!("---- Huff Initialization End ----\n");
    opts
}
