//! Huffman coding file compressor.
//!
//! Provides compression and decompression of files (or any byte stream) with a single static
//! Huffman code tree per input.
//!
//! An archive is laid out as follows, bit packed, most significant bit first:
//! - A 32 bit magic number.
//! - The code tree, pre-order: `0` for an internal node, `1` plus a 9 bit symbol for a leaf.
//! - One code per input byte, then the code of the end-of-stream symbol (256).
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> huff -z test.txt`
//!
//! This will create the file test.txt.hf, provided it is smaller than test.txt (use `-f` to
//! write it regardless). `huff -d test.txt.hf` restores test.txt.
//!
//! From code:
//!
//! ```
//! use std::io::Cursor;
//!
//! let mut archive = Vec::new();
//! huff::compress(Cursor::new(b"teststring".to_vec()), &mut archive, true)?;
//! let mut restored = Vec::new();
//! huff::decompress(archive.as_slice(), &mut restored)?;
//! assert_eq!(restored, b"teststring");
//! # Ok::<(), huff::HuffError>(())
//! ```
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compress, Compressor};
pub use compression::decompress::decompress;
pub use error::HuffError;
