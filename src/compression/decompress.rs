use log::{error, info};

use crate::bitstream::bitreader::BitReader;
use crate::error::HuffError;
use crate::huffman_coding::header::read_header;
use crate::compression::compress::refuse_same_file;
use crate::huffman_coding::huffman::{HuffTree, NodeData};
use crate::huffman_coding::{BITS_PER_WORD, PSEUDO_EOF};
use crate::tools::cli::{HuffOpts, Mode, Output};

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
};

const ARCHIVE_EXTENSION: &str = ".hf";

/// Decompress an archive from input to output. Returns the number of bits written to the
/// output. Output written before an error is left in place.
pub fn decompress<R: Read, W: Write>(input: R, output: W) -> Result<usize, HuffError> {
    let mut br = BitReader::new(input);
    let tree = read_header(&mut br)?;
    decode_body(&mut br, &tree, output)
}

/// Walk the tree one bit at a time, writing a symbol at each leaf, until the end-of-stream
/// leaf. The header must already have been read from `br`.
fn decode_body<R: Read, W: Write>(
    br: &mut BitReader<R>,
    tree: &HuffTree,
    output: W,
) -> Result<usize, HuffError> {
    info!("Found a valid huff header.");
    let mut out = BufWriter::new(output);
    let mut written = 0;
    let mut node = &tree.root;

    loop {
        // Running out of bits before the end-of-stream code means the archive was cut short.
        let bit = match br.bool_bit()? {
            Some(bit) => bit,
            None => {
                error!("Fatal error: archive ended at {} before the end-of-stream code.", br.loc());
                out.flush()?;
                return Err(HuffError::UnexpectedEndOfInput);
            }
        };

        // Walk left on 0, right on 1
        node = match node.kids() {
            Some((left, right)) => {
                if bit {
                    right
                } else {
                    left
                }
            }
            None => return Err(HuffError::Format("walked off a leaf".to_string())),
        };

        if let NodeData::Leaf(symbol) = node.node_data {
            if symbol as usize == PSEUDO_EOF {
                break;
            }
            out.write_all(&[symbol as u8])?;
            written += BITS_PER_WORD;
            node = &tree.root;
        }
    }
    out.flush()?;
    info!("Decoded {} symbols.", written / BITS_PER_WORD);
    Ok(written)
}

/// Name of the file restored from an archive: the archive extension comes off, or if there
/// isn't one, ".out" goes on.
pub fn restored_name(path: &str) -> String {
    match path.strip_suffix(ARCHIVE_EXTENSION) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{}.out", path),
    }
}

/// Decompress one archive as directed by the options. In test mode the output is thrown
/// away and only the archive's integrity is checked.
pub fn decompress_file(opts: &HuffOpts, path: &str) -> Result<(), HuffError> {
    info!("Decompressing {}", path);
    let mut br = BitReader::new(File::open(path)?);
    // No output is opened until the header checks out
    let tree = read_header(&mut br)?;

    let written = match (&opts.op_mode, &opts.output) {
        (Mode::Test, _) => decode_body(&mut br, &tree, io::sink())?,
        (_, Output::Stdout) => decode_body(&mut br, &tree, io::stdout().lock())?,
        (_, Output::File) => {
            let fname = opts
                .out_file
                .clone()
                .unwrap_or_else(|| restored_name(path));
            refuse_same_file(path, &fname)?;
            let written = decode_body(&mut br, &tree, File::create(&fname)?)?;
            info!("Wrote {}", fname);
            written
        }
    };
    info!("{}: restored {} bytes.", path, written / BITS_PER_WORD);
    Ok(())
}
