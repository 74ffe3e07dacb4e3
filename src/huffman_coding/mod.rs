//! The huffman_coding module builds the code tree and code table for huff, and reads and
//! writes the tree as the archive header.
//!
//! Codes are derived from a single tree per input. Frequencies are counted over the whole
//! input, the two lightest nodes are merged until one root remains, and every leaf's code is
//! the path to it from the root (0 = left, 1 = right). A pseudo end-of-stream symbol, one more
//! than the largest byte value, is always in the tree so the decoder knows where the body ends.
//!

pub mod header;
pub mod huffman;
pub mod model;

/// Bits in one uncompressed symbol.
pub const BITS_PER_WORD: usize = 8;
/// Number of ordinary symbols.
pub const ALPH_SIZE: usize = 1 << BITS_PER_WORD;
/// End-of-stream symbol. Needs BITS_PER_WORD + 1 bits in the header.
pub const PSEUDO_EOF: usize = ALPH_SIZE;
/// Width of the magic number field.
pub const BITS_PER_INT: usize = 32;
/// First 32 bits of every archive.
pub const MAGIC_NUMBER: u32 = 1234567873;
