//! BitReader: the read side of the huff I/O subsystem.
//!
//! Reads a packed, most-significant-bit-first bitstream from any source that supports read().
//! Sources that also support seek() can be rewound, which the encoder needs for its second pass.
//!

use std::io::{self, Read, Seek, SeekFrom};

const BUFFER_SIZE: usize = 64 * 1024;
const BIT_MASK: u8 = 0xff;

/// Reads a bitstream one bit, or up to 32 bits, at a time.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    bit_index: usize,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader (with a 64k buffer).
    pub fn new(source: R) -> Self {
        Self {
            buffer: Vec::with_capacity(BUFFER_SIZE),
            cursor: 0,
            bit_index: 0,
            source,
        }
    }

    /// Check (and refill) buffer. Returns true if we have data, false if there is no more
    fn have_data(&mut self) -> io::Result<bool> {
        // Only try to read more data when the buffer length is equal to the buffer cursor location
        if self.cursor == self.buffer.len() {
            self.buffer.resize(BUFFER_SIZE, 0);
            let size = loop {
                match self.source.read(&mut self.buffer) {
                    Ok(size) => break size,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                }
            };
            // Adjust the buffer to what we actually got and reset the cursor and bit index
            self.buffer.truncate(size);
            self.cursor = 0;
            self.bit_index = 0;
            // If nothing came back from our read attempt, then we have no more data.
            if size == 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Return bit as Option<usize> (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> io::Result<Option<usize>> {
        // If bit_index is == 0, check if we have a byte to read. Return None if we have no data
        if self.bit_index == 0 && !self.have_data()? {
            return Ok(None);
        }
        let bit = (self.buffer[self.cursor] >> (7 - self.bit_index)) & 1;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.cursor += 1;
        }
        Ok(Some(bit as usize))
    }

    /// Return Option<Bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bool_bit(&mut self) -> io::Result<Option<bool>> {
        Ok(self.bit()?.map(|bit| bit == 1))
    }

    /// Return Option<usize> of the next n bits (n <= 32), or None if the source runs out
    /// before all n bits are read.
    pub fn bint(&mut self, mut n: usize) -> io::Result<Option<usize>> {
        /*
        Take as many bits as we can from the current byte on each pass. A request that
        starts on a byte boundary with 8 or more bits still to go takes the whole byte.
        */
        debug_assert!(n <= 32);
        let mut result = 0_usize;

        while n > 0 {
            // Checking always for data when we start a fresh byte
            if self.bit_index == 0 && !self.have_data()? {
                return Ok(None);
            }
            let available = 8 - self.bit_index;
            let needed = n.min(available);

            // Mask off the bits already consumed, then drop the ones we don't need yet
            let byte = (self.buffer[self.cursor] & (BIT_MASK >> self.bit_index)) as usize;
            result = result << needed | byte >> (available - needed);

            self.bit_index += needed;
            if self.bit_index == 8 {
                self.bit_index = 0;
                self.cursor += 1;
            }
            n -= needed;
        }
        Ok(Some(result))
    }

    /// Returns a byte as an Option<u8>, or None if there is no more data to read. This is
    /// a convenience function, and calls bint(8).
    pub fn byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.bint(8)?.map(|byte| byte as u8))
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

impl<R: Read + Seek> BitReader<R> {
    /// Seek the source back to its start and drop anything buffered.
    pub fn rewind(&mut self) -> io::Result<()> {
        self.source.seek(SeekFrom::Start(0))?;
        self.buffer.clear();
        self.cursor = 0;
        self.bit_index = 0;
        Ok(())
    }
}
