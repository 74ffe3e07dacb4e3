use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Read, Seek, Write};
use std::path::Path;

use log::{debug, error, info, warn};

use crate::bitstream::bitreader::BitReader;
use crate::bitstream::bitwriter::BitWriter;
use crate::error::HuffError;
use crate::huffman_coding::model::HuffModel;
use crate::huffman_coding::{BITS_PER_WORD, PSEUDO_EOF};
use crate::tools::cli::{HuffOpts, Output};

/*
    Compression takes two passes over the input, so the input must be seekable.

    The first pass counts symbols, builds the tree and table, and works out how big the
    archive would be without writing any of it. Only if the caller forces it, or the
    archive would be smaller than the input, does the second pass rewind and write the
    header and body.
*/

/// Holds an input that has been through the first pass, ready to be written out.
pub struct Compressor<R: Read + Seek> {
    reader: BitReader<R>,
    model: HuffModel,
    projected_bits: usize,
}

impl<R: Read + Seek> Compressor<R> {
    /// First pass: count, build the tree and table, and size the archive.
    pub fn new(input: R) -> Result<Self, HuffError> {
        let mut reader = BitReader::new(input);
        let mut model = HuffModel::new();
        model.make_tree(&mut reader)?;
        model.make_table()?;

        // Size the header by writing it into the void
        let mut counter = BitWriter::new(io::sink());
        let mut projected_bits = model.write_header(&mut counter)?;

        // Every symbol costs its code length, once per occurrence
        for (symbol, count) in model.counts().symbols() {
            projected_bits += count * model.code(symbol as usize)?.len();
        }
        projected_bits += model.code(PSEUDO_EOF)?.len();

        debug!(
            "Header is {} bits, projected archive is {} bits, input is {} bits.",
            model.header_size(),
            projected_bits,
            model.uncompressed_size()
        );
        Ok(Self {
            reader,
            model,
            projected_bits,
        })
    }

    /// Size in bits the archive will have once written.
    pub fn projected_size(&self) -> usize {
        self.projected_bits
    }

    pub fn uncompressed_size(&self) -> usize {
        self.model.uncompressed_size()
    }

    pub fn header_size(&self) -> usize {
        self.model.header_size()
    }

    pub fn saves_space(&self) -> bool {
        self.projected_bits < self.model.uncompressed_size()
    }

    /// True if the archive should be written: forced, or smaller than the input.
    pub fn worth_writing(&self, force: bool) -> bool {
        force || self.saves_space()
    }

    pub fn model(&self) -> &HuffModel {
        &self.model
    }

    /// Second pass: rewind the input and write the header, one code per symbol, and the
    /// end-of-stream code. Returns the number of bits written, padding excluded.
    pub fn write_to<W: Write>(&mut self, output: W) -> Result<usize, HuffError> {
        self.reader.rewind()?;
        let mut bw = BitWriter::new(output);
        self.model.write_header(&mut bw)?;

        while let Some(symbol) = self.reader.bint(BITS_PER_WORD)? {
            for &bit in self.model.code(symbol)?.bits() {
                bw.out_bit(bit)?;
            }
        }
        for &bit in self.model.code(PSEUDO_EOF)?.bits() {
            bw.out_bit(bit)?;
        }
        bw.flush()?;

        let written = bw.bits_written();
        info!("Wrote {} bits, {} bytes padded.", written, (written + 7) / 8);
        Ok(written)
    }
}

/// Compress input to output. With `force` false nothing is written unless the archive is
/// smaller than the input. Either way the (projected) archive size in bits is returned.
pub fn compress<R: Read + Seek, W: Write>(
    input: R,
    output: W,
    force: bool,
) -> Result<usize, HuffError> {
    let mut compressor = Compressor::new(input)?;
    if compressor.worth_writing(force) {
        compressor.write_to(output)
    } else {
        warn!(
            "Compression skipped: {} bits would not beat the {} bit input.",
            compressor.projected_size(),
            compressor.uncompressed_size()
        );
        Ok(compressor.projected_size())
    }
}

/// Name of the archive written for an input file.
pub fn archive_name(path: &str) -> String {
    format!("{}.hf", path)
}

/// Compress one file as directed by the options. The output file is only created once we
/// know it will be written.
pub fn compress_file(opts: &HuffOpts, path: &str) -> Result<(), HuffError> {
    info!("Compressing {}", path);
    let mut compressor = Compressor::new(File::open(path)?)?;

    if !compressor.worth_writing(opts.force) {
        warn!(
            "{}: compression would not save space ({} >= {} bits). Use -f to force it.",
            path,
            compressor.projected_size(),
            compressor.uncompressed_size()
        );
        return Ok(());
    }

    let written = match opts.output {
        Output::Stdout => compressor.write_to(io::stdout().lock())?,
        Output::File => {
            let fname = opts
                .out_file
                .clone()
                .unwrap_or_else(|| archive_name(path));
            // Creating the output truncates it, and the second pass still has to read the input.
            refuse_same_file(path, &fname)?;
            let written = compressor.write_to(BufWriter::new(File::create(&fname)?))?;
            info!("Wrote {}", fname);
            written
        }
    };
    report(path, compressor.uncompressed_size(), written);
    Ok(())
}

/// Error out if `output` names the same file as `input`. An output that does not exist yet
/// can't be the input.
pub(crate) fn refuse_same_file(input: &str, output: &str) -> Result<(), HuffError> {
    if !Path::new(output).exists() {
        return Ok(());
    }
    if fs::canonicalize(input)? == fs::canonicalize(output)? {
        error!("Fatal error: {} would overwrite its own input.", output);
        return Err(HuffError::Io(io::Error::new(
            ErrorKind::InvalidInput,
            format!("output {} is the input file", output),
        )));
    }
    Ok(())
}

fn report(path: &str, original: usize, archive: usize) {
    if original == 0 {
        info!("{}: empty input, archive is {} bits.", path, archive);
        return;
    }
    info!(
        "{}: {} bits in, {} bits out, ratio {:.3}.",
        path,
        original,
        archive,
        archive as f64 / original as f64
    );
}
