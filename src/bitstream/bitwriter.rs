use std::io::{self, Write};

const BUFFER_SIZE: usize = 64 * 1024;

/// Writes a most-significant-bit-first bitstream for output. Bits are queued, packed into
/// bytes, staged in a buffer and handed to the writer once the buffer fills or on flush().
pub struct BitWriter<W: Write> {
    /// Output buffer used to stage packed bytes.
    output: Vec<u8>,
    /// Private queue to hold bits that are waiting to be put as bytes into the output buffer.
    queue: u64,
    /// Count of valid bits in the queue.
    q_bits: u8,
    /// Total bits accepted so far, padding excluded.
    written: usize,
    /// Handle to the output stream
    writer: W,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter around the output stream. Call flush() when done, or the
    /// last partial byte stays in the queue.
    pub fn new(writer: W) -> Self {
        Self {
            output: Vec::with_capacity(BUFFER_SIZE),
            queue: 0,
            q_bits: 0,
            written: 0,
            writer,
        }
    }

    /// Internal bitstream write function common to all out_* functions.
    fn push_queue(&mut self) -> io::Result<()> {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
        if self.output.len() >= BUFFER_SIZE {
            self.writer.write_all(&self.output)?;
            self.output.clear();
        }
        Ok(())
    }

    /// Writes the low `n` bits (0-32) of `data`, most significant of those bits first.
    pub fn out_bits(&mut self, n: u8, data: u32) -> io::Result<()> {
        debug_assert!(n <= 32);
        if n == 0 {
            return Ok(());
        }
        self.queue <<= n; //shift queue by bit length
        self.queue |= data as u64 & (u64::MAX >> (64 - n)); //add data portion to queue
        self.q_bits += n; //update depth of queue bits
        self.written += n as usize;
        self.push_queue()
    }

    /// Writes a single bit.
    pub fn out_bit(&mut self, bit: bool) -> io::Result<()> {
        self.out_bits(1, bit as u32)
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// significant bits, then hands everything buffered to the writer.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits = 8;
            self.push_queue()?;
        }
        self.writer.write_all(&self.output)?;
        self.output.clear();
        self.writer.flush()
    }

    /// Number of bits written so far, not counting padding.
    pub fn bits_written(&self) -> usize {
        self.written
    }

    /// Give back the writer. Anything not yet flushed is lost.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.written / 8, self.written % 8)
    }
}

#[cfg(test)]
mod test {
    use super::BitWriter;

    #[test]
    fn out8_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.out_bits(8, b'x' as u32).unwrap();
        bw.flush().unwrap();
        assert_eq!(bw.into_inner(), "x".as_bytes());
    }

    #[test]
    fn last_bits_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.out_bits(8, 255).unwrap();
        bw.out_bits(8, 1).unwrap();
        bw.out_bits(8, 128).unwrap();
        bw.out_bits(8, 255).unwrap();
        bw.out_bits(3, 7).unwrap();
        bw.flush().unwrap();
        assert_eq!(bw.bits_written(), 35);
        assert_eq!(bw.into_inner(), vec![255, 1, 128, 255, 224]);
    }

    #[test]
    fn odd_sizes_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.out_bit(true).unwrap();
        bw.out_bits(9, 0b1_0000_0000).unwrap();
        bw.out_bits(32, 0x1234_5678).unwrap();
        assert_eq!(bw.loc(), "[5.2]");
        bw.flush().unwrap();
        // 1 100000000 then the 32 bit word, padded to 48 bits
        assert_eq!(
            bw.into_inner(),
            vec![0b1100_0000, 0b0000_0100, 0x8d, 0x15, 0x9e, 0x00]
        );
    }

    #[test]
    fn masks_high_bits_test() {
        let mut bw = BitWriter::new(Vec::new());
        bw.out_bits(4, 0xffff_fff5).unwrap();
        bw.out_bits(4, 0).unwrap();
        bw.flush().unwrap();
        assert_eq!(bw.into_inner(), vec![0x50]);
    }

    #[test]
    fn large_output_test() {
        let mut bw = BitWriter::new(Vec::new());
        for i in 0..100_000_u32 {
            bw.out_bits(8, i).unwrap();
        }
        bw.flush().unwrap();
        let out = bw.into_inner();
        assert_eq!(out.len(), 100_000);
        assert_eq!(out[99_999], (99_999 % 256) as u8);
    }
}
